use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::result::ResultSummary;
use crate::session::timer::format_mm_ss;
use crate::ui::animate::count_up;
use crate::ui::theme::Theme;

pub const QUOTES: [&str; 5] = [
    "Every step forward makes you stronger.",
    "Great achievements begin with small efforts.",
    "You're improving, keep pushing!",
    "Success is built one answer at a time.",
    "Believe in yourself, you're capable of more!",
];

pub fn pick_quote<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}

pub struct ResultsCard<'a> {
    pub result: Option<&'a ResultSummary>,
    pub quote: &'a str,
    /// Time since the card was first shown; drives the count-up.
    pub elapsed: Duration,
    pub theme: &'a Theme,
}

impl<'a> ResultsCard<'a> {
    pub fn new(
        result: Option<&'a ResultSummary>,
        quote: &'a str,
        elapsed: Duration,
        theme: &'a Theme,
    ) -> Self {
        Self {
            result,
            quote,
            elapsed,
            theme,
        }
    }
}

impl Widget for ResultsCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [h/Enter] Return home  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Quit", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[6], buf);

        let Some(result) = self.result else {
            Paragraph::new(Line::from(Span::styled(
                "No result to show",
                Style::default().fg(colors.text_muted()),
            )))
            .alignment(Alignment::Center)
            .render(layout[1], buf);
            return;
        };

        let verdict_color = if result.percent >= 80 {
            colors.success()
        } else if result.percent >= 60 {
            colors.warning()
        } else {
            colors.error()
        };

        let percent_text = count_up(&format!("{}%", result.percent), self.elapsed);
        Paragraph::new(Line::from(Span::styled(
            percent_text,
            Style::default()
                .fg(verdict_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let detail = count_up(
            &format!("{} Out Of {}", result.score, result.total),
            self.elapsed,
        );
        Paragraph::new(Line::from(Span::styled(detail, Style::default().fg(colors.fg()))))
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        Paragraph::new(Line::from(Span::styled(
            result.verdict(),
            Style::default()
                .fg(verdict_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        let timing = match (result.timed_out, result.time_left) {
            (true, _) => Span::styled("Time is up!", Style::default().fg(colors.warning())),
            (false, Some(secs)) => Span::styled(
                format!("Finished with {} left", format_mm_ss(secs)),
                Style::default().fg(colors.text_muted()),
            ),
            (false, None) => Span::raw(""),
        };
        Paragraph::new(Line::from(timing))
            .alignment(Alignment::Center)
            .render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            self.quote,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[4], buf);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn rendered(card: ResultsCard<'_>) -> String {
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_pick_quote_is_one_of_the_quotes() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..10 {
            assert!(QUOTES.contains(&pick_quote(&mut rng)));
        }
    }

    #[test]
    fn test_renders_final_numbers_after_animation() {
        let theme = Theme::default();
        let summary = ResultSummary::new(12, 15, Some(120), false, Utc::now());
        let text = rendered(ResultsCard::new(
            Some(&summary),
            QUOTES[0],
            Duration::from_secs(5),
            &theme,
        ));
        assert!(text.contains("80%"));
        assert!(text.contains("12 Out Of 15"));
        assert!(text.contains("Excellent!"));
        assert!(text.contains("02:00 left"));
    }

    #[test]
    fn test_renders_placeholder_without_result() {
        let theme = Theme::default();
        let text = rendered(ResultsCard::new(None, QUOTES[1], Duration::ZERO, &theme));
        assert!(text.contains("No result to show"));
    }

    #[test]
    fn test_timed_out_note() {
        let theme = Theme::default();
        let summary = ResultSummary::new(5, 15, Some(0), true, Utc::now());
        let text = rendered(ResultsCard::new(
            Some(&summary),
            QUOTES[2],
            Duration::from_secs(5),
            &theme,
        ));
        assert!(text.contains("Time is up!"));
        assert!(text.contains("Keep Trying"));
    }
}
