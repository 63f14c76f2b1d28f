use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

pub const COUNT_UP_DURATION: Duration = Duration::from_millis(1500);

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(\.\d+)?").expect("number pattern is valid"));

/// Counts the first number inside a label up from zero, leaving the text around it alone.
#[derive(Clone, Debug)]
pub struct NumberAnimation {
    prefix: String,
    suffix: String,
    target: f64,
    decimals: usize,
    duration: Duration,
}

impl NumberAnimation {
    /// `None` when the text has no number to animate.
    pub fn new(text: &str, duration: Duration) -> Option<Self> {
        let text = text.trim();
        let m = NUMBER.find(text)?;
        let target: f64 = m.as_str().parse().ok()?;
        Some(Self {
            prefix: text[..m.start()].to_string(),
            suffix: text[m.end()..].to_string(),
            target,
            decimals: if m.as_str().contains('.') { 1 } else { 0 },
            duration,
        })
    }

    pub fn frame(&self, elapsed: Duration) -> String {
        let value = if self.is_done(elapsed) || self.duration.is_zero() {
            self.target
        } else {
            let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
            let eased = 1.0 - (1.0 - progress).powi(2);
            self.target * eased
        };
        format!(
            "{}{:.*}{}",
            self.prefix, self.decimals, value, self.suffix
        )
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// Render `text` at `elapsed` into its count-up animation, or unchanged when it has no number.
pub fn count_up(text: &str, elapsed: Duration) -> String {
    match NumberAnimation::new(text, COUNT_UP_DURATION) {
        Some(anim) => anim.frame(elapsed),
        None => text.to_string(),
    }
}
