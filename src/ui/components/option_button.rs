use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::controller::{OptionMark, OptionSlot};
use crate::ui::theme::Theme;

const KEYS: [char; 4] = ['a', 'b', 'c', 'd'];

pub struct OptionButton<'a> {
    slot: &'a OptionSlot,
    index: usize,
    theme: &'a Theme,
}

impl<'a> OptionButton<'a> {
    pub fn new(slot: &'a OptionSlot, index: usize, theme: &'a Theme) -> Self {
        Self { slot, index, theme }
    }
}

impl Widget for OptionButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let (body, border) = match self.slot.mark {
            OptionMark::Correct => (
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.correct_bg())
                    .add_modifier(Modifier::BOLD),
                colors.correct_bg(),
            ),
            OptionMark::Incorrect => (
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.incorrect_bg())
                    .add_modifier(Modifier::BOLD),
                colors.incorrect_bg(),
            ),
            OptionMark::Plain if self.slot.enabled => {
                (Style::default().fg(colors.fg()), colors.border_focused())
            }
            OptionMark::Plain => (Style::default().fg(colors.text_muted()), colors.border()),
        };

        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(body);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.slot.label.is_empty() {
            return;
        }

        let key = KEYS.get(self.index).copied().unwrap_or(' ');
        let line = Line::from(vec![
            Span::styled(
                format!(" [{}/{key}] ", self.index + 1),
                body.remove_modifier(Modifier::BOLD),
            ),
            Span::styled(self.slot.label.as_str(), body),
        ]);
        Paragraph::new(line).render(inner, buf);
    }
}
