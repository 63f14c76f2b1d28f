use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use quizr::app::{App, AppScreen};
use quizr::bank::resolver::{self, BUNDLED_BANK, Candidate};
use quizr::config::Config;
use quizr::error::QuizError;
use quizr::session::controller::{
    Command, QuizMessage, SessionController, SessionPhase, SessionSettings,
};
use quizr::store::result_store::{LAST_RESULT_KEY, ResultStore};
use quizr::ui::theme::Theme;

fn write_pool(dir: &Path, name: &str, size: usize) -> PathBuf {
    let records: Vec<serde_json::Value> = (0..size)
        .map(|i| {
            serde_json::json!({
                "id": i + 1,
                "question": format!("What is item {i}?"),
                "options": [format!("item {i}"), "something else", "nothing", "all of the above"],
                "answer": format!("item {i}"),
            })
        })
        .collect();
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
    path
}

fn settings() -> SessionSettings {
    SessionSettings {
        question_count: 15,
        time_limit_secs: 900,
        low_time_secs: 30,
        readiness_timeout: Duration::from_secs(20),
    }
}

fn answer_current(ctl: &mut SessionController, correct: bool, now: Instant) -> Option<Command> {
    let right = ctl.state().current().unwrap().correct_index.unwrap();
    let choice = if correct { right } else { (right + 1) % 4 };
    ctl.dispatch(QuizMessage::OptionSelected(choice), now)
}

#[test]
fn test_full_quiz_twelve_of_fifteen() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(dir.path(), "questions.json", 20);
    let bank = resolver::resolve(&[Candidate::File(pool)]).unwrap();
    assert_eq!(bank.records.len(), 20);

    let t0 = Instant::now();
    let mut ctl = SessionController::with_rng(settings(), SmallRng::seed_from_u64(7));
    let req = ctl.load_session(t0);
    ctl.complete_load(req.generation, Ok(bank), t0);
    assert_eq!(ctl.state().questions.len(), 15);

    let mut now = t0;
    for i in 0..15 {
        now += Duration::from_secs(10);
        assert!(ctl.tick(now).is_none());
        assert!(answer_current(&mut ctl, i < 12, now).is_none());
        if i < 14 {
            assert!(ctl.view().next_visible);
            assert!(ctl.dispatch(QuizMessage::NextRequested, now).is_none());
        }
    }

    let view = ctl.view();
    assert!(view.submit_visible);
    assert!(view.reset_visible);
    assert!(!view.next_visible);

    let Some(Command::Handoff(summary)) = ctl.dispatch(QuizMessage::SubmitRequested, now) else {
        panic!("submit should finalize the session");
    };
    assert_eq!(summary.score, 12);
    assert_eq!(summary.total, 15);
    assert_eq!(summary.percent, 80);
    assert!(!summary.timed_out);
    assert_eq!(summary.time_left, Some(750));
    assert_eq!(summary.verdict(), "Excellent!");

    // Second submit and a late expiry are both no-ops.
    assert!(ctl.dispatch(QuizMessage::SubmitRequested, now).is_none());
    assert!(ctl.dispatch(QuizMessage::TimerExpired, now).is_none());
}

#[test]
fn test_expiry_mid_quiz_hands_off_partial_score() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(dir.path(), "questions.json", 20);
    let bank = resolver::resolve(&[Candidate::File(pool)]).unwrap();

    let t0 = Instant::now();
    let mut ctl = SessionController::with_rng(settings(), SmallRng::seed_from_u64(3));
    let req = ctl.load_session(t0);
    ctl.complete_load(req.generation, Ok(bank), t0);

    for _ in 0..5 {
        answer_current(&mut ctl, true, t0);
        ctl.dispatch(QuizMessage::NextRequested, t0);
    }

    let mut handoff = None;
    let mut now = t0;
    while handoff.is_none() && now < t0 + Duration::from_secs(1000) {
        now += Duration::from_millis(500);
        handoff = ctl.tick(now);
    }
    let Some(Command::Handoff(summary)) = handoff else {
        panic!("timer expiry should finalize the session");
    };
    assert_eq!(summary.score, 5);
    assert_eq!(summary.total, 15);
    assert_eq!(summary.percent, 33);
    assert!(summary.timed_out);
    assert_eq!(summary.time_left, Some(0));
    assert!(ctl.view().options.iter().all(|slot| !slot.enabled));
}

#[test]
fn test_all_candidates_fail_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let candidates: Vec<Candidate> = [
        "html_css_js_mcq_300.json",
        "html_mcq_100.json",
        "html_mcq_300.json",
        "html_mcq.json",
    ]
    .iter()
    .map(|name| Candidate::File(dir.path().join(name)))
    .collect();

    match resolver::resolve(&candidates) {
        Err(QuizError::NoQuestionSourceAvailable { tried }) => assert_eq!(tried.len(), 4),
        other => panic!("expected NoQuestionSourceAvailable, got {:?}", other.map(|b| b.source)),
    }

    let store = ResultStore::with_base_dir(dir.path().join("data")).unwrap();
    let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
    let mut app = App::new(&Config::default(), candidates, Some(store), theme);
    let now = Instant::now();
    app.start_quiz(now);

    assert!(matches!(app.controller.phase(), SessionPhase::LoadFailed(_)));
    let view = app.controller.view();
    assert!(view.question_text.starts_with("Failed to load questions."));
    assert!(!view.timer_visible);

    app.tick(now + Duration::from_secs(2000));
    app.send(QuizMessage::SubmitRequested, now);
    assert_eq!(app.screen, AppScreen::Quiz);
    assert!(app.store.as_ref().unwrap().load_last_result().is_none());
    assert!(!dir.path().join("data").join(format!("{LAST_RESULT_KEY}.json")).exists());
}

#[test]
fn test_later_candidate_is_used_when_earlier_ones_fail() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(dir.path(), "questions.json", 4);
    let candidates = vec![
        Candidate::File(dir.path().join("html_css_js_mcq.json")),
        Candidate::File(dir.path().join("mcq.json")),
        Candidate::File(pool.clone()),
    ];
    let bank = resolver::resolve(&candidates).unwrap();
    assert_eq!(bank.source, Candidate::File(pool));
    assert_eq!(bank.records.len(), 4);
}

#[test]
fn test_bundled_bank_loads_and_validates() {
    let bank = resolver::resolve(&[Candidate::Bundled(BUNDLED_BANK.to_string())]).unwrap();
    assert!(bank.records.len() >= 15);
    for record in &bank.records {
        assert!(record.validate().is_ok(), "bundled record {} is invalid", record.id);
    }
}

#[test]
fn test_result_reaches_store_and_results_screen() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(dir.path(), "questions.json", 2);
    let store = ResultStore::with_base_dir(dir.path().join("data")).unwrap();
    let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
    let mut app = App::new(
        &Config::default(),
        vec![Candidate::File(pool)],
        Some(store),
        theme,
    );

    let now = Instant::now();
    app.start_quiz(now);
    assert_eq!(app.controller.state().questions.len(), 2);

    let right = app.controller.state().current().unwrap().correct_index.unwrap();
    app.send(QuizMessage::OptionSelected(right), now);
    app.send(QuizMessage::NextRequested, now);
    let right = app.controller.state().current().unwrap().correct_index.unwrap();
    app.send(QuizMessage::OptionSelected((right + 1) % 4), now);
    app.send(QuizMessage::SubmitRequested, now);

    assert_eq!(app.screen, AppScreen::Results);
    let raw = fs::read_to_string(dir.path().join("data").join("lastQuizResult.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["score"], 1);
    assert_eq!(json["total"], 2);
    assert_eq!(json["percent"], 50);
    assert_eq!(json["timedOut"], false);
    assert!(json["timestamp"].is_i64());

    app.return_home(now);
    assert_eq!(app.screen, AppScreen::Quiz);
    assert_eq!(app.controller.state().score, 0);
}
