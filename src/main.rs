mod app;
mod bank;
mod config;
mod error;
mod event;
mod logging;
mod session;
mod store;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use app::{App, AppScreen};
use config::Config;
use error::QuizError;
use event::EventHandler;
use session::controller::{QuizView, SessionPhase};
use store::result_store::ResultStore;
use ui::components::option_button::OptionButton;
use ui::components::progress_bar::ProgressBar;
use ui::components::results_card::ResultsCard;
use ui::components::timer_badge::TimerBadge;
use ui::layout::QuizLayout;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "quizr", version, about = "Timed multiple-choice quiz for the terminal")]
struct Cli {
    #[arg(short, long = "source", help = "Question bank to try first (JSON file or bundled:NAME)")]
    source: Vec<String>,

    #[arg(short, long, help = "Number of questions per quiz")]
    questions: Option<usize>,

    #[arg(short = 'l', long, help = "Time limit in seconds")]
    time_limit: Option<u32>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Open the results screen for the last finished quiz")]
    last: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("Ignoring unreadable config: {err:#}");
        Config::default()
    });
    if let Some(count) = cli.questions {
        config.question_count = count;
    }
    if let Some(secs) = cli.time_limit {
        config.time_limit_secs = secs;
    }
    if let Some(name) = cli.theme.clone() {
        config.theme = name;
    }
    config.validate();

    match logging::init(&config.log_level) {
        Ok(path) => log::info!("quizr {} logging to {}", env!("CARGO_PKG_VERSION"), path.display()),
        Err(err) => eprintln!("Logging disabled: {err:#}"),
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!(
            "Unknown theme {:?}, available: {}",
            config.theme,
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let store = match ResultStore::new() {
        Ok(store) => Some(store),
        Err(err) => {
            log::warn!("Results will not be persisted: {err:#}");
            None
        }
    };

    let candidates = config.candidates(&cli.source);
    let mut app = App::new(&config, candidates, store, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    app.attach_loader(events.sender());

    let result = start(&mut terminal, &mut app, cli.last)
        .and_then(|()| run_app(&mut terminal, &mut app, &events));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }

    log::info!("Exiting");
    Ok(())
}

fn start(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    show_last: bool,
) -> Result<()> {
    let now = Instant::now();
    if show_last {
        app.show_stored_result(now);
        return Ok(());
    }

    let size = terminal.size()?;
    QuizLayout::new(Rect::new(0, 0, size.width, size.height))?;
    app.start_quiz(now);
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        app.handle_event(event, Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Results => render_results(frame, app),
    }
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = match QuizLayout::new(area) {
        Ok(layout) => layout,
        Err(err) => {
            render_too_small(frame, app, &err);
            return;
        }
    };
    let view = app.controller.view();

    let [title_area, timer_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(14)]).areas(layout.header);
    let mut title = vec![Span::styled(
        " quizr ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )];
    if !view.number_label.is_empty() {
        title.push(Span::styled(
            format!(" Question {} of {} ", view.position, view.total),
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ));
        title.push(Span::styled(
            format!("| Score {}/{}", view.score, view.total),
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(title)).style(Style::default().bg(colors.header_bg())),
        title_area,
    );
    if view.timer_visible {
        frame.render_widget(
            TimerBadge::new(&view.timer_text, view.low_time, app.theme),
            timer_area,
        );
    } else {
        frame.render_widget(
            Block::default().style(Style::default().bg(colors.header_bg())),
            timer_area,
        );
    }

    if let Some(progress_area) = layout.progress {
        let answered = view.position.saturating_sub(1)
            + usize::from(app.controller.state().answered.is_some());
        frame.render_widget(
            ProgressBar::for_question(answered.min(view.total), view.total, app.theme),
            progress_area,
        );
    }

    let text_style = match app.controller.phase() {
        SessionPhase::LoadFailed(_) => Style::default().fg(colors.error()),
        SessionPhase::Loading => Style::default().fg(colors.text_muted()),
        _ => Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
    };
    let question = Paragraph::new(view.question_text.as_str())
        .style(text_style)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(format!(" {} ", view.number_label))
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.bg())),
        );
    frame.render_widget(question, layout.question);

    for (i, (slot, rect)) in view.options.iter().zip(layout.options).enumerate() {
        frame.render_widget(OptionButton::new(slot, i, app.theme), rect);
    }

    frame.render_widget(controls_hint(&view, app.theme), layout.controls);
}

fn controls_hint<'a>(view: &QuizView, theme: &Theme) -> Paragraph<'a> {
    let colors = &theme.colors;
    let mut hints = Vec::new();
    if view.options.iter().any(|slot| slot.enabled) {
        hints.push(" [1-4/a-d] Answer ");
    }
    if view.next_visible {
        hints.push(" [n/Enter] Next ");
    }
    if view.submit_visible {
        hints.push(" [s/Enter] Submit ");
    }
    if view.reset_visible {
        hints.push(" [r] Reset ");
    }
    hints.push(" [q] Quit ");

    let spans: Vec<Span> = hints
        .into_iter()
        .map(|hint| Span::styled(hint, Style::default().fg(colors.accent())))
        .collect();
    Paragraph::new(Line::from(spans))
}

fn render_too_small(frame: &mut ratatui::Frame, app: &App, err: &QuizError) {
    let colors = &app.theme.colors;
    let notice = Paragraph::new(vec![
        Line::from(Span::styled(
            "Terminal too small",
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(colors.text_muted()),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(notice, frame.area());
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let centered = ui::layout::centered_rect(60, 70, area);
    let card = ResultsCard::new(
        app.last_result.as_ref(),
        app.quote,
        app.results_elapsed(Instant::now()),
        app.theme,
    );
    frame.render_widget(card, centered);
}
