pub mod celebration;
pub mod client;
pub mod config;
pub mod encouragement;
pub mod history;
pub mod quotes;
pub mod runtime;
pub mod segment;
pub mod session;
pub mod tracker;
pub mod ui;

use crate::{
    celebration::Celebration,
    client::{CannedBackend, HttpBackend, MoodBackend, Quote},
    config::{Config, ConfigStore, FileConfigStore},
    encouragement::{Emotion, Encouragement, MoodReading},
    history::{
        submit_detached, CsvHistoryStore, HistoryRecord, HistoryStore, HttpHistoryStore,
    },
    quotes::QuoteRotation,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{FixedSessionProvider, SessionProvider},
    tracker::Transcription,
};
use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::Arc,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// mood journaling in the terminal: describe your day, receive a consoling
/// quotation, transcribe it
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Describe how your day went, let the backend classify the emotion and hand you a consoling quotation, then copy the quotation character by character while your accuracy, progress, and typing speed are tracked."
)]
pub struct Cli {
    /// base url of the emotion/quotation backend
    #[clap(short = 'b', long)]
    backend_url: Option<String>,

    /// user id attached to stored transcriptions (implies a signed-in session)
    #[clap(short = 'u', long)]
    user: Option<String>,

    /// run against built-in quotations instead of the backend
    #[clap(long)]
    offline: bool,

    /// custom quotation to transcribe, skipping the mood step (implies --offline)
    #[clap(short = 'q', long)]
    quote: Option<String>,

    /// POST finished transcriptions to this endpoint instead of the local csv log
    #[clap(long)]
    history_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    MoodEntry,
    Transcribing,
}

pub struct App {
    pub state: AppState,
    pub config: Config,
    /// Free text the user is composing on the mood screen.
    pub mood_input: String,
    /// One-line notice or error shown on the current screen.
    pub status: Option<String>,
    pub reading: Option<MoodReading>,
    pub transcription: Transcription,
    pub rotation: QuoteRotation,
    pub pool: Vec<Quote>,
    pub celebration: Celebration,
    backend: Box<dyn MoodBackend>,
    history: Arc<dyn HistoryStore>,
    session: Box<dyn SessionProvider>,
}

impl App {
    pub fn new(
        config: Config,
        backend: Box<dyn MoodBackend>,
        history: Arc<dyn HistoryStore>,
        session: Box<dyn SessionProvider>,
    ) -> Self {
        Self {
            state: AppState::MoodEntry,
            config,
            mood_input: String::new(),
            status: None,
            reading: None,
            transcription: Transcription::new(""),
            rotation: QuoteRotation::new(),
            pool: Vec::new(),
            celebration: Celebration::new(),
            backend,
            history,
            session,
        }
    }

    /// Whether the runner should wake on every tick: only while the timer is
    /// running or an animation is live. Finishing cancels the subscription.
    pub fn is_ticking(&self) -> bool {
        self.transcription.phase() == tracker::Phase::Running || self.celebration.is_active
    }

    /// Submit the composed mood text, load the returned quotation, and move
    /// to the transcription screen. Backend failures stay on this screen as
    /// a status line.
    pub fn submit_mood(&mut self) {
        match self.backend.analyze(&self.mood_input) {
            Ok(response) => {
                let reading = response.into_reading();
                self.start_transcription(reading);
            }
            Err(e) => {
                self.status = Some(e.to_string());
            }
        }
    }

    /// Install a fresh reading: fetch the rotation pool for its emotion and
    /// replace the reference wholesale.
    pub fn start_transcription(&mut self, reading: MoodReading) {
        self.pool = match self.backend.quotes_by_emotion(reading.emotion) {
            Ok(pool) => pool,
            Err(e) => {
                // the initial quotation still works without a pool
                warn!("could not fetch quotations for {}: {e}", reading.emotion);
                Vec::new()
            }
        };
        self.rotation.reset();
        self.rotation.mark_shown(reading.encouragement.sentence());
        self.transcription.load(reading.encouragement.sentence());
        self.celebration = Celebration::new();
        self.reading = Some(reading);
        self.status = None;
        self.state = AppState::Transcribing;
    }

    /// Swap in the next unseen quotation for the current emotion, or report
    /// exhaustion. Client-local only; a new mood submission starts over.
    pub fn next_sentence(&mut self) {
        let Some(reading) = self.reading.as_mut() else {
            return;
        };
        match self.rotation.next(&self.pool) {
            Some(quote) => {
                reading.encouragement = Encouragement::Structured {
                    sentence: quote.sentence.clone(),
                    source: quote.source(),
                };
                self.transcription.load(&quote.sentence);
                self.celebration = Celebration::new();
                self.status = None;
            }
            None => {
                self.status = Some("더 이상 새로운 문장이 없어요.".to_string());
            }
        }
    }

    /// Runs once per finished quotation: start the celebration and, when a
    /// session is present, hand the record to the detached persistence path.
    pub fn on_completion(&mut self, width: u16, height: u16) {
        if !self.transcription.take_completion() {
            return;
        }
        self.celebration.start(width, height);

        if let Some(session) = self.session.current() {
            let emotion = self
                .reading
                .as_ref()
                .map(|r| r.emotion)
                .unwrap_or(Emotion::Unknown);
            submit_detached(
                Arc::clone(&self.history),
                HistoryRecord {
                    content: self.transcription.reference_text().to_owned(),
                    user_id: session.user_id,
                    emotion: emotion.label().to_owned(),
                    recorded_at: Local::now(),
                },
            );
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(url) = cli.backend_url.clone() {
        config.backend_url = url;
    }
    if let Some(url) = cli.history_url.clone() {
        config.history_url = Some(url);
    }
    if cli.user.is_some() {
        config.user_id = cli.user.clone();
    }

    let offline = cli.offline || cli.quote.is_some();
    let backend: Box<dyn MoodBackend> = if offline {
        Box::new(CannedBackend)
    } else {
        Box::new(HttpBackend::new(&config.backend_url)?)
    };
    let history: Arc<dyn HistoryStore> = match (offline, config.history_url.as_deref()) {
        (false, Some(url)) => Arc::new(HttpHistoryStore::new(url)?),
        _ => Arc::new(CsvHistoryStore::new()),
    };
    let session = Box::new(FixedSessionProvider::new(config.user_id.clone()));

    let mut app = App::new(config, backend, history, session);
    if let Some(quote) = cli.quote.clone() {
        app.start_transcription(MoodReading {
            emotion: Emotion::Unknown,
            encouragement: Encouragement::Plain(quote),
        });
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

enum Flow {
    Continue,
    Quit,
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| draw(app, f))?;

        match runner.step(app.is_ticking()) {
            AppEvent::Tick => {
                app.celebration.update();
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                let size = terminal.size().unwrap_or_default();
                if let Flow::Quit = handle_key(app, key, size.width, size.height) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn handle_key(app: &mut App, key: KeyEvent, width: u16, height: u16) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    match app.state {
        AppState::MoodEntry => match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Enter => app.submit_mood(),
            KeyCode::Backspace => {
                let mut units = segment::graphemes_of(&app.mood_input);
                units.pop();
                app.mood_input = units.concat();
            }
            KeyCode::Char(c) => {
                app.status = None;
                app.mood_input.push(c);
            }
            _ => {}
        },
        AppState::Transcribing => match key.code {
            KeyCode::Esc => {
                // back to the mood screen; the session state is destroyed
                app.transcription.reset();
                app.status = None;
                app.state = AppState::MoodEntry;
            }
            KeyCode::Tab => app.next_sentence(),
            KeyCode::Backspace => {
                if !app.transcription.has_finished() {
                    app.transcription.backspace();
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.transcription.reset();
                app.celebration = Celebration::new();
                app.status = None;
            }
            KeyCode::Char(c) => {
                if !app.transcription.has_finished() {
                    app.transcription.write(c);
                    app.on_completion(width, height);
                }
            }
            _ => {}
        },
    }

    Flow::Continue
}
