use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// Single-row bar showing how far through the quiz the user is.
pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            theme,
        }
    }

    pub fn for_question(position: usize, total: usize, theme: &'a Theme) -> Self {
        let ratio = if total == 0 {
            0.0
        } else {
            position as f64 / total as f64
        };
        Self::new(&format!("{position}/{total}"), ratio, theme)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let filled_width = (self.ratio * area.width as f64) as u16;
        for x in area.x..area.x + area.width {
            let style = if x < area.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, area.y)].set_style(style);
        }

        let label_x = area.x + (area.width.saturating_sub(self.label.len() as u16)) / 2;
        buf.set_string(label_x, area.y, &self.label, Style::default().fg(colors.fg()));
    }
}
