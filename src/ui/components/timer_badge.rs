use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

/// Remaining exam time. Switches to the warning colour in low-time state.
pub struct TimerBadge<'a> {
    text: &'a str,
    low_time: bool,
    theme: &'a Theme,
}

impl<'a> TimerBadge<'a> {
    pub fn new(text: &'a str, low_time: bool, theme: &'a Theme) -> Self {
        Self {
            text,
            low_time,
            theme,
        }
    }
}

impl Widget for TimerBadge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let style = if self.low_time {
            Style::default()
                .fg(colors.error())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
        } else {
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD)
        };

        Paragraph::new(Line::from(vec![
            Span::styled(" Time ", Style::default().fg(colors.text_muted()).bg(colors.header_bg())),
            Span::styled(format!("{} ", self.text), style),
        ]))
        .alignment(Alignment::Right)
        .render(area, buf);
    }
}
