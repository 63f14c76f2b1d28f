use std::time::{Duration, Instant};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::bank::record::OPTION_SLOTS;
use crate::bank::resolver::ResolvedBank;
use crate::bank::selector::{self, PreparedQuestion};
use crate::config::Config;
use crate::error::QuizError;
use crate::session::readiness::{GateStatus, ReadinessGate};
use crate::session::result::{FinalizeReason, ResultSummary};
use crate::session::timer::{Countdown, TimerSignal};

/// Input to the session state machine. Every UI action arrives as one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizMessage {
    OptionSelected(usize),
    NextRequested,
    SubmitRequested,
    ResetRequested,
    TimerExpired,
}

/// Work the controller hands back to the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Session finished: persist the summary and show results.
    Handoff(ResultSummary),
    /// Fetch a question bank and report it via [`SessionController::complete_load`].
    Reload(LoadRequest),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
}

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub question_count: usize,
    pub time_limit_secs: u32,
    pub low_time_secs: u32,
    pub readiness_timeout: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            question_count: config.question_count,
            time_limit_secs: config.time_limit_secs,
            low_time_secs: config.low_time_secs,
            readiness_timeout: Duration::from_secs(config.readiness_timeout_secs),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub questions: Vec<PreparedQuestion>,
    pub current_index: usize,
    pub score: u32,
    /// Option locked in for the current question.
    pub answered: Option<usize>,
}

impl SessionState {
    pub fn current(&self) -> Option<&PreparedQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    LoadFailed(String),
    Active,
    Finalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_index: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptionMark {
    #[default]
    Plain,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionSlot {
    pub label: String,
    pub enabled: bool,
    pub mark: OptionMark,
}

/// Everything the quiz screen shows, derived from the current state.
#[derive(Clone, Debug, Default)]
pub struct QuizView {
    pub number_label: String,
    pub question_text: String,
    pub options: [OptionSlot; OPTION_SLOTS],
    pub next_visible: bool,
    pub submit_visible: bool,
    pub reset_visible: bool,
    pub timer_text: String,
    pub timer_visible: bool,
    pub low_time: bool,
    pub position: usize,
    pub total: usize,
    pub score: u32,
}

pub struct SessionController {
    settings: SessionSettings,
    timer: Countdown,
    gate: Option<ReadinessGate>,
    phase: SessionPhase,
    state: SessionState,
    generation: u64,
    rng: SmallRng,
}

impl SessionController {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_rng(settings, SmallRng::from_entropy())
    }

    pub fn with_rng(settings: SessionSettings, rng: SmallRng) -> Self {
        let timer = Countdown::new(settings.time_limit_secs, settings.low_time_secs);
        Self {
            settings,
            timer,
            gate: None,
            phase: SessionPhase::Loading,
            state: SessionState::default(),
            generation: 0,
            rng,
        }
    }

    /// Begin a fresh session: everything from the previous one is dropped and the
    /// timer waits on the readiness gate.
    pub fn load_session(&mut self, now: Instant) -> LoadRequest {
        self.timer.reset();
        self.state = SessionState::default();
        self.phase = SessionPhase::Loading;
        self.gate = Some(ReadinessGate::arm(now, self.settings.readiness_timeout));
        self.generation += 1;
        log::debug!("Loading session (generation {})", self.generation);
        LoadRequest {
            generation: self.generation,
        }
    }

    pub fn complete_load(
        &mut self,
        generation: u64,
        outcome: Result<ResolvedBank, QuizError>,
        now: Instant,
    ) {
        if generation != self.generation || self.phase != SessionPhase::Loading {
            log::debug!("Dropping stale question load (generation {generation})");
            return;
        }

        match outcome {
            Ok(bank) => {
                let questions = selector::select_and_prepare(
                    &bank.records,
                    self.settings.question_count,
                    &mut self.rng,
                );
                log::info!(
                    "Using {} of {} questions from {}",
                    questions.len(),
                    bank.records.len(),
                    bank.source
                );
                self.state = SessionState {
                    questions,
                    ..SessionState::default()
                };
                self.phase = SessionPhase::Active;
                self.settle_gate(now);
            }
            Err(err) => {
                log::error!("Error loading questions: {err}");
                self.gate = None;
                self.phase = SessionPhase::LoadFailed(format!(
                    "Failed to load questions. {err}. Press [r] to retry."
                ));
            }
        }
    }

    pub fn restart(&mut self, now: Instant) -> LoadRequest {
        log::info!("Restarting quiz");
        self.load_session(now)
    }

    pub fn dispatch(&mut self, msg: QuizMessage, now: Instant) -> Option<Command> {
        match msg {
            QuizMessage::OptionSelected(idx) => {
                self.submit_answer(idx);
                None
            }
            QuizMessage::NextRequested => {
                self.advance();
                None
            }
            QuizMessage::SubmitRequested => {
                if !self.can_submit() {
                    return None;
                }
                self.finalize(FinalizeReason::Manual, now)
                    .map(Command::Handoff)
            }
            QuizMessage::ResetRequested => {
                if !self.can_reset() {
                    return None;
                }
                Some(Command::Reload(self.restart(now)))
            }
            QuizMessage::TimerExpired => self
                .finalize(FinalizeReason::TimedOut, now)
                .map(Command::Handoff),
        }
    }

    /// Advance the readiness gate and the countdown to `now`.
    pub fn tick(&mut self, now: Instant) -> Option<Command> {
        self.settle_gate(now);
        match self.timer.poll(now) {
            Some(TimerSignal::LowTime) => {
                log::info!("{} seconds left", self.timer.remaining_secs());
                None
            }
            Some(TimerSignal::Expired) => {
                log::warn!("Time is up");
                self.dispatch(QuizMessage::TimerExpired, now)
            }
            None => None,
        }
    }

    fn settle_gate(&mut self, now: Instant) {
        let Some(gate) = self.gate else {
            return;
        };
        let ready = self.phase == SessionPhase::Active && !self.state.questions.is_empty();
        match gate.check(ready, now) {
            GateStatus::Pending => {}
            GateStatus::Ready => {
                self.gate = None;
                self.timer.start(now);
                log::info!("Timer started with {}", self.timer.display());
            }
            GateStatus::Abandoned => {
                self.gate = None;
                log::warn!(
                    "Questions not ready within {}s; the timer will not start",
                    self.settings.readiness_timeout.as_secs()
                );
            }
        }
    }

    /// Lock in an answer for the current question. Only the first selection counts.
    pub fn submit_answer(&mut self, selected: usize) -> Option<AnswerOutcome> {
        if self.phase != SessionPhase::Active || self.state.answered.is_some() {
            return None;
        }
        let question = self.state.current()?;
        if selected >= question.options.len() {
            return None;
        }

        let outcome = AnswerOutcome {
            correct: question.is_correct(selected),
            correct_index: question.correct_index,
        };
        if question.correct_index.is_none() {
            log::debug!("Question {} has no correct option", question.id);
        }
        self.state.answered = Some(selected);
        if outcome.correct {
            self.state.score += 1;
        }
        Some(outcome)
    }

    pub fn advance(&mut self) -> bool {
        if self.phase != SessionPhase::Active
            || self.state.answered.is_none()
            || self.state.is_last()
        {
            return false;
        }
        self.state.current_index += 1;
        self.state.answered = None;
        true
    }

    /// End the session. The first call wins; later calls return `None`.
    pub fn finalize(&mut self, reason: FinalizeReason, _now: Instant) -> Option<ResultSummary> {
        if self.phase != SessionPhase::Active {
            log::debug!("Ignoring {reason:?} finalize in phase {:?}", self.phase);
            return None;
        }

        self.timer.stop();
        self.gate = None;
        let (time_left, timed_out) = match reason {
            FinalizeReason::TimedOut => (Some(0), true),
            FinalizeReason::Manual => (
                self.timer
                    .has_started()
                    .then(|| self.timer.remaining_secs()),
                false,
            ),
        };
        let summary = ResultSummary::new(
            self.state.score,
            self.state.questions.len() as u32,
            time_left,
            timed_out,
            Utc::now(),
        );
        log::info!(
            "Quiz finished ({reason:?}): {}/{} = {}%",
            summary.score,
            summary.total,
            summary.percent
        );
        self.phase = SessionPhase::Finalized;
        Some(summary)
    }

    pub fn can_submit(&self) -> bool {
        self.phase == SessionPhase::Active
            && (self.state.questions.is_empty()
                || (self.state.answered.is_some() && self.state.is_last()))
    }

    pub fn can_reset(&self) -> bool {
        self.can_submit() || matches!(self.phase, SessionPhase::LoadFailed(_))
    }

    pub fn view(&self) -> QuizView {
        let mut view = QuizView {
            timer_text: self.timer.display(),
            timer_visible: self.phase == SessionPhase::Active,
            low_time: self.timer.is_low_time(),
            position: self.state.current_index + 1,
            total: self.state.questions.len(),
            score: self.state.score,
            ..QuizView::default()
        };

        match &self.phase {
            SessionPhase::Loading => {
                view.question_text = "Loading questions...".to_string();
            }
            SessionPhase::LoadFailed(message) => {
                view.question_text = message.clone();
                view.reset_visible = true;
            }
            SessionPhase::Active | SessionPhase::Finalized => {
                let Some(question) = self.state.current() else {
                    view.question_text = "No question available.".to_string();
                    view.submit_visible = self.can_submit();
                    view.reset_visible = self.can_reset();
                    return view;
                };

                let open = self.phase == SessionPhase::Active && self.state.answered.is_none();
                view.number_label = format!("{}.", self.state.current_index + 1);
                view.question_text = question.question.clone();
                for (i, slot) in view.options.iter_mut().enumerate() {
                    let Some(label) = question.options.get(i) else {
                        continue;
                    };
                    slot.label = label.clone();
                    slot.enabled = open;
                    slot.mark = match self.state.answered {
                        Some(_) if question.correct_index == Some(i) => OptionMark::Correct,
                        Some(selected) if selected == i => OptionMark::Incorrect,
                        _ => OptionMark::Plain,
                    };
                }

                view.next_visible = self.phase == SessionPhase::Active
                    && self.state.answered.is_some()
                    && !self.state.is_last();
                view.submit_visible = self.can_submit();
                view.reset_visible = self.can_reset();
            }
        }
        view
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
