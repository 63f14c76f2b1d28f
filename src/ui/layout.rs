use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::bank::record::OPTION_SLOTS;
use crate::error::QuizError;

const MIN_WIDTH: u16 = 40;
const OPTION_HEIGHT: u16 = 3;
const MIN_QUESTION_HEIGHT: u16 = 3;

const OPTION_TARGETS: [&str; OPTION_SLOTS] = ["opt0", "opt1", "opt2", "opt3"];

/// Regions of the quiz screen. Every one of them must fit or the screen cannot be drawn.
#[derive(Clone, Copy, Debug)]
pub struct QuizLayout {
    pub header: Rect,
    pub progress: Option<Rect>,
    pub question: Rect,
    pub options: [Rect; OPTION_SLOTS],
    pub controls: Rect,
}

impl QuizLayout {
    pub fn new(area: Rect) -> Result<Self, QuizError> {
        let show_progress = area.height >= 24;

        let mut constraints = vec![Constraint::Length(1)];
        if show_progress {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(MIN_QUESTION_HEIGHT));
        constraints.extend([Constraint::Length(OPTION_HEIGHT); OPTION_SLOTS]);
        constraints.push(Constraint::Length(1));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut idx = 0;
        let mut next = || {
            let rect = rows[idx];
            idx += 1;
            rect
        };
        let header = next();
        let progress = show_progress.then(&mut next);
        let question = next();
        let options = [next(), next(), next(), next()];
        let controls = next();

        let layout = Self {
            header,
            progress,
            question,
            options,
            controls,
        };
        let missing = layout.missing_targets(area);
        if missing.is_empty() {
            Ok(layout)
        } else {
            Err(QuizError::MissingViewTarget { missing })
        }
    }

    fn missing_targets(&self, area: Rect) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let narrow = area.width < MIN_WIDTH;
        if narrow || self.header.height == 0 {
            missing.extend(["question-number", "timer"]);
        }
        if narrow || self.question.height < MIN_QUESTION_HEIGHT {
            missing.push("question-text");
        }
        for (rect, name) in self.options.iter().zip(OPTION_TARGETS) {
            if narrow || rect.height < OPTION_HEIGHT {
                missing.push(name);
            }
        }
        if narrow || self.controls.height == 0 {
            missing.push("controls");
        }
        missing
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
