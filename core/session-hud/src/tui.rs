//! `fx-hud tui`: terminal session tracker.
//!
//! The screen owns prompt dismissal. A prompt stays up for `prompts.display_secs`
//! and then disappears; that timer never feeds back into the prompt latches.

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
    Frame, Terminal,
};

use fx_session_core::{
    ChannelSink, CoachingPrompt, RuntimeConfig, SessionName, SessionRuntime, SessionRuntimeState,
    SessionStatus, Ticker,
};

use crate::error::{terminal, Result};

const EVENT_POLL: Duration = Duration::from_millis(200);

fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Open => Color::Green,
        SessionStatus::OpeningSoon => Color::Yellow,
        SessionStatus::Closed => Color::Red,
    }
}

struct Toast {
    prompt: CoachingPrompt,
    until: Instant,
}

struct App {
    runtime: Arc<SessionRuntime>,
    prompts: Receiver<CoachingPrompt>,
    display_for: Duration,
    queued: VecDeque<CoachingPrompt>,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(runtime: Arc<SessionRuntime>, prompts: Receiver<CoachingPrompt>, display_for: Duration) -> Self {
        Self {
            runtime,
            prompts,
            display_for,
            queued: VecDeque::new(),
            toast: None,
            should_quit: false,
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.queued.extend(self.prompts.try_iter());

        if self.toast.as_ref().is_some_and(|toast| now >= toast.until) {
            self.toast = None;
        }
        if self.toast.is_none() {
            if let Some(prompt) = self.queued.pop_front() {
                tracing::debug!(session = %prompt.session, "Showing coaching prompt");
                self.toast = Some(Toast {
                    prompt,
                    until: now + self.display_for,
                });
            }
        }
    }

    fn dismiss(&mut self) {
        self.toast = None;
    }

    fn on_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('d') => self.dismiss(),
            _ => {}
        }
    }
}

pub fn run(config: &RuntimeConfig) -> Result<()> {
    let engine = crate::build_engine(config)?;
    let runtime = Arc::new(SessionRuntime::with_system_clock(engine));
    let (sink, prompts) = ChannelSink::new();
    let ticker = Ticker::spawn(Arc::clone(&runtime), Arc::new(sink), config.ticker_config())?;

    let mut app = App::new(runtime, prompts, config.prompt_display());

    enable_raw_mode().map_err(terminal("enable raw mode"))?;
    let mut term = match open_terminal() {
        Ok(term) => term,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(err);
        }
    };

    let result = run_app(&mut term, &mut app);

    let _ = disable_raw_mode();
    let _ = execute!(term.backend_mut(), LeaveAlternateScreen);
    let _ = term.show_cursor();
    ticker.stop();

    result
}

fn open_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(terminal("enter alternate screen"))?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal("create terminal"))
}

fn run_app<B: Backend>(term: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.on_tick(Instant::now());
        let state = app.runtime.snapshot();
        term.draw(|f| ui(f, &state, app.toast.as_ref()))
            .map_err(terminal("draw frame"))?;

        if event::poll(EVENT_POLL).map_err(terminal("poll events"))? {
            if let Event::Key(key) = event::read().map_err(terminal("read event"))? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, state: &SessionRuntimeState, toast: Option<&Toast>) {
    let [header, sessions, prompt] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(SessionName::ALL.len() as u16 + 2),
        Constraint::Min(4),
    ])
    .areas(f.area());

    render_header(f, header, state);
    render_sessions(f, sessions, state);
    render_prompt(f, prompt, toast);
}

fn render_header(f: &mut Frame, area: Rect, state: &SessionRuntimeState) {
    let line = Line::from(vec![
        Span::styled(
            "Session Tracker",
            Style::default().fg(Color::Indexed(147)).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} ({})", state.local_time, state.viewer_zone),
            Style::default().fg(Color::Gray),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .padding(Padding::horizontal(1));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn session_line(session: SessionName, state: &SessionRuntimeState) -> Line<'static> {
    let status = *state.status.get(session);
    let color = status_color(status);
    Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(
            format!("{:<8}", session.as_str()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {:<22}", state.windows.get(session).to_string())),
        Span::styled(
            format!("{:>8}  ", state.session_local_time.get(session)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(status.label(), Style::default().fg(color)),
    ])
}

fn render_sessions(f: &mut Frame, area: Rect, state: &SessionRuntimeState) {
    let lines: Vec<Line> = SessionName::ALL
        .into_iter()
        .map(|session| session_line(session, state))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .padding(Padding::horizontal(1));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_prompt(f: &mut Frame, area: Rect, toast: Option<&Toast>) {
    let (text, border) = match toast {
        Some(toast) => (
            Line::from(toast.prompt.headline()),
            Style::default().fg(Color::Yellow),
        ),
        None => (
            Line::styled(
                "No active prompt. q quits, d dismisses.",
                Style::default().fg(Color::DarkGray),
            ),
            Style::default().fg(Color::DarkGray),
        ),
    };
    let block = Block::default()
        .title(" Coaching ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .padding(Padding::horizontal(1));
    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_session_core::{SessionEngine, SessionTable, ViewerZone};
    use std::sync::mpsc;

    fn app_with(display_for: Duration) -> (mpsc::Sender<CoachingPrompt>, App) {
        let engine = SessionEngine::new(SessionTable::standard(), ViewerZone::parse("UTC").unwrap());
        let runtime = Arc::new(SessionRuntime::with_system_clock(engine));
        let (tx, rx) = mpsc::channel();
        (tx, App::new(runtime, rx, display_for))
    }

    #[test]
    fn status_colors_match_tracker_legend() {
        assert_eq!(status_color(SessionStatus::Open), Color::Green);
        assert_eq!(status_color(SessionStatus::OpeningSoon), Color::Yellow);
        assert_eq!(status_color(SessionStatus::Closed), Color::Red);
    }

    #[test]
    fn toast_expires_after_display_duration() {
        let (tx, mut app) = app_with(Duration::from_secs(7));
        let start = Instant::now();

        tx.send(CoachingPrompt::for_session(SessionName::Tokyo)).unwrap();
        app.on_tick(start);
        assert_eq!(
            app.toast.as_ref().map(|t| t.prompt.session),
            Some(SessionName::Tokyo)
        );

        app.on_tick(start + Duration::from_secs(6));
        assert!(app.toast.is_some());

        app.on_tick(start + Duration::from_secs(7));
        assert!(app.toast.is_none());
    }

    #[test]
    fn queued_prompts_show_one_at_a_time() {
        let (tx, mut app) = app_with(Duration::from_secs(1));
        let start = Instant::now();

        tx.send(CoachingPrompt::for_session(SessionName::London)).unwrap();
        tx.send(CoachingPrompt::for_session(SessionName::NewYork)).unwrap();
        app.on_tick(start);
        assert_eq!(
            app.toast.as_ref().map(|t| t.prompt.session),
            Some(SessionName::London)
        );

        app.on_tick(start + Duration::from_secs(1));
        assert_eq!(
            app.toast.as_ref().map(|t| t.prompt.session),
            Some(SessionName::NewYork)
        );
    }

    #[test]
    fn keys_quit_and_dismiss() {
        let (tx, mut app) = app_with(Duration::from_secs(7));
        tx.send(CoachingPrompt::for_session(SessionName::Tokyo)).unwrap();
        app.on_tick(Instant::now());

        app.on_key(KeyCode::Char('d'));
        assert!(app.toast.is_none());
        assert!(!app.should_quit);

        app.on_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn session_line_shows_status_label() {
        let engine = SessionEngine::new(SessionTable::standard(), ViewerZone::parse("UTC").unwrap());
        let now = chrono::DateTime::parse_from_rfc3339("2024-03-04T11:45:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let state = SessionRuntime::new(engine, fx_session_core::FixedClock::new(now)).snapshot();

        let line = session_line(SessionName::NewYork, &state);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("NewYork"));
        assert!(text.contains("12:00 - 21:00 (Local)"));
        assert!(text.ends_with("Opening Soon"));
    }
}
