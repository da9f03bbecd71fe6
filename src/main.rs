use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mediadesk::api::CatalogClient;
use mediadesk::app::App;
use mediadesk::config::Config;
use mediadesk::controller::ListController;
use mediadesk::resource::{default_resource_key, get_resource};
use mediadesk::stats::fetch_active_counts;
use mediadesk::ui::splash::{render as render_splash, SplashState};
use mediadesk::{event, ui};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Terminal admin console for a media catalog
#[derive(Parser, Debug)]
#[command(name = "mediadesk", version, about, long_about = None)]
struct Args {
    /// Catalog API base URL (overrides MEDIADESK_API_URL and the config file)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Resource shown at startup (media, directores, generos, productoras, tipos)
    #[arg(short, long)]
    resource: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Run in read-only mode (block create, edit and delete)
    #[arg(long)]
    readonly: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Logging is best effort; the TUI owns stderr so there is nowhere to report this
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok()?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("mediadesk started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("mediadesk.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".mediadesk").join("mediadesk.log");
    }
    PathBuf::from("mediadesk.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initialize and run
    let result = initialize_with_splash(&mut terminal, &args).await;

    match result {
        Ok(Some(mut app)) => {
            let run_result = run_app(&mut terminal, &mut app).await;
            cleanup_terminal(&mut terminal)?;

            if let Err(err) = run_result {
                eprintln!("Error: {err:?}");
            }
        },
        Ok(None) => {
            cleanup_terminal(&mut terminal)?;
        },
        Err(err) => {
            cleanup_terminal(&mut terminal)?;
            eprintln!("Initialization error: {err:?}");
        },
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn initialize_with_splash<B: Backend>(
    terminal: &mut Terminal<B>,
    args: &Args,
) -> Result<Option<App>>
where
    B::Error: Send + Sync + 'static,
{
    let mut splash = SplashState::new();

    // Render initial splash
    terminal.draw(|f| render_splash(f, &splash))?;

    if check_abort()? {
        return Ok(None);
    }

    // Step 1: Load configuration
    let config = Config::load();
    let api_url = config.effective_api_url(args.api_url.as_deref());

    let requested: String = args
        .resource
        .clone()
        .or_else(|| config.last_resource.clone())
        .unwrap_or_else(|| default_resource_key().to_string());
    let def = match get_resource(&requested) {
        Some(def) => def,
        None => {
            tracing::warn!("Unknown resource '{}', using default", requested);
            get_resource(default_resource_key())
                .ok_or_else(|| anyhow::anyhow!("No resources registered"))?
        },
    };

    tracing::info!("Using API: {}, resource: {}", api_url, def.key);

    splash.set_message("Loading configuration");
    terminal.draw(|f| render_splash(f, &splash))?;
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 2: Build the API client
    splash.set_message(&format!("Connecting to {}", api_url));
    terminal.draw(|f| render_splash(f, &splash))?;

    let client = CatalogClient::new(&api_url)?;
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 3: Initial collection
    splash.set_message(&format!("Fetching {}", def.display_name));
    terminal.draw(|f| render_splash(f, &splash))?;

    let mut list = ListController::new(def, config.show_inactive);
    list.refresh(&client).await;
    let initial_error = list.error().map(str::to_string);
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 4: Dashboard counts, reusing the collection just loaded
    splash.set_message("Counting active records");
    terminal.draw(|f| render_splash(f, &splash))?;

    let stats = fetch_active_counts(&client, Some((def.key.as_str(), list.items()))).await;

    splash.complete_step();
    splash.set_message("Ready!");
    terminal.draw(|f| render_splash(f, &splash))?;

    tokio::time::sleep(Duration::from_millis(200)).await;

    let mut app = App::from_initialized(client, list, stats, config, args.readonly);

    if let Some(err) = initial_error {
        app.error_message = Some(err);
    }

    Ok(Some(app))
}

fn check_abort() -> Result<bool> {
    if poll(Duration::from_millis(50))? {
        if let Event::Key(key) = read()? {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Queued work runs after the frame showing its loading state
        if app.is_busy() {
            app.run_pending_task().await;
            continue;
        }

        if event::handle_events(app)? {
            return Ok(());
        }
    }
}
