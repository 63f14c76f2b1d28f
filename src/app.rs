use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::bank::resolver::{self, Candidate, ResolvedBank};
use crate::config::Config;
use crate::error::QuizError;
use crate::event::AppEvent;
use crate::session::controller::{
    Command, LoadRequest, QuizMessage, SessionController, SessionSettings,
};
use crate::session::result::ResultSummary;
use crate::store::result_store::{self, ResultStore};
use crate::ui::components::results_card;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Quiz,
    Results,
}

pub struct App {
    pub screen: AppScreen,
    pub controller: SessionController,
    pub theme: &'static Theme,
    pub store: Option<ResultStore>,
    pub last_result: Option<ResultSummary>,
    pub quote: &'static str,
    pub results_shown_at: Option<Instant>,
    pub should_quit: bool,
    candidates: Vec<Candidate>,
    loader: Option<mpsc::Sender<AppEvent>>,
    rng: SmallRng,
}

impl App {
    pub fn new(
        config: &Config,
        candidates: Vec<Candidate>,
        store: Option<ResultStore>,
        theme: &'static Theme,
    ) -> Self {
        let controller = SessionController::new(SessionSettings::from_config(config));
        Self {
            screen: AppScreen::Quiz,
            controller,
            theme,
            store,
            last_result: None,
            quote: results_card::QUOTES[0],
            results_shown_at: None,
            should_quit: false,
            candidates,
            loader: None,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Load banks on a background thread, reporting through `tx`.
    /// Without a loader, banks are resolved inline.
    pub fn attach_loader(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.loader = Some(tx);
    }

    pub fn start_quiz(&mut self, now: Instant) {
        let request = self.controller.load_session(now);
        self.screen = AppScreen::Quiz;
        self.results_shown_at = None;
        self.request_load(request, now);
    }

    fn request_load(&mut self, request: LoadRequest, now: Instant) {
        let candidates = self.candidates.clone();
        match &self.loader {
            Some(tx) => {
                let tx = tx.clone();
                thread::spawn(move || {
                    let outcome = resolver::resolve(&candidates);
                    let _ = tx.send(AppEvent::QuestionsLoaded {
                        generation: request.generation,
                        outcome,
                    });
                });
            }
            None => {
                let outcome = resolver::resolve(&candidates);
                self.controller
                    .complete_load(request.generation, outcome, now);
            }
        }
    }

    /// Route one event from the loop. The countdown is polled on every event,
    /// so a burst of key presses cannot hold back a tick.
    pub fn handle_event(&mut self, event: AppEvent, now: Instant) {
        self.tick(now);
        match event {
            AppEvent::Key(key) => self.handle_key(key, now),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
            AppEvent::QuestionsLoaded {
                generation,
                outcome,
            } => self.questions_loaded(generation, outcome, now),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            AppScreen::Quiz => self.handle_quiz_key(key, now),
            AppScreen::Results => self.handle_results_key(key, now),
        }
    }

    fn handle_quiz_key(&mut self, key: KeyEvent, now: Instant) {
        let msg = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(ch @ '1'..='4') => QuizMessage::OptionSelected(ch as usize - '1' as usize),
            KeyCode::Char(ch @ 'a'..='d') => QuizMessage::OptionSelected(ch as usize - 'a' as usize),
            KeyCode::Char('n') => QuizMessage::NextRequested,
            KeyCode::Enter if self.controller.can_submit() => QuizMessage::SubmitRequested,
            KeyCode::Enter => QuizMessage::NextRequested,
            KeyCode::Char('s') => QuizMessage::SubmitRequested,
            KeyCode::Char('r') => QuizMessage::ResetRequested,
            _ => return,
        };
        self.send(msg, now);
    }

    fn handle_results_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Enter => self.return_home(now),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    pub fn questions_loaded(
        &mut self,
        generation: u64,
        outcome: Result<ResolvedBank, QuizError>,
        now: Instant,
    ) {
        self.controller.complete_load(generation, outcome, now);
    }

    pub fn send(&mut self, msg: QuizMessage, now: Instant) {
        if self.screen != AppScreen::Quiz {
            return;
        }
        if let Some(command) = self.controller.dispatch(msg, now) {
            self.run_command(command, now);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if self.screen != AppScreen::Quiz {
            return;
        }
        if let Some(command) = self.controller.tick(now) {
            self.run_command(command, now);
        }
    }

    fn run_command(&mut self, command: Command, now: Instant) {
        match command {
            Command::Handoff(summary) => self.show_results(summary, now),
            Command::Reload(request) => self.request_load(request, now),
        }
    }

    fn show_results(&mut self, summary: ResultSummary, now: Instant) {
        result_store::handoff(self.store.as_ref(), &summary);
        self.last_result = Some(summary);
        self.enter_results(now);
    }

    /// Results screen fed from the stored record instead of a live session.
    pub fn show_stored_result(&mut self, now: Instant) {
        self.last_result = self.store.as_ref().and_then(|s| s.load_last_result());
        self.enter_results(now);
    }

    fn enter_results(&mut self, now: Instant) {
        self.quote = results_card::pick_quote(&mut self.rng);
        self.results_shown_at = Some(now);
        self.screen = AppScreen::Results;
    }

    pub fn return_home(&mut self, now: Instant) {
        self.start_quiz(now);
    }

    pub fn results_elapsed(&self, now: Instant) -> Duration {
        self.results_shown_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default()
    }
}
