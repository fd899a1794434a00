//! moodtrack - a terminal dashboard for the emotion tracker.
//!
//! This application provides a keyboard-driven interface for the twice-daily
//! emotion check-in, personal history, and the team and unit roll-ups that
//! managers and directors follow.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use moodtrack_core::auth::CredentialStore;
use moodtrack_core::config::APP_NAME;
use moodtrack_core::models::OrgUnitKind;
use moodtrack_core::{Config, SessionStore};

use app::{App, AppState, Services};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE_PREFIX: &str = "moodtrack.log";

const USAGE: &str = "\
Usage:
  moodtrack                                  Start the dashboard
  moodtrack --login                          Log in from the command line
  moodtrack --report <level> <unit-id> [path]
                                             Download a unit report (PDF)
                                             level: service, department, entity, cluster
  moodtrack --help                           Show this message";

/// Initialize the tracing subscriber.
///
/// The terminal belongs to the UI, so logs go to a daily file in the cache
/// directory. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing(&log_dir());

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--login") => return login_cli().await,
        Some("--report") => return report_cli(&args[2..]).await,
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown option: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
        None => {}
    }

    info!("moodtrack starting");

    // Create app before taking over the terminal so setup errors stay readable
    let mut app = App::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if app.is_authenticated() {
        app.refresh();
    } else {
        app.start_login();
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("moodtrack shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // The client gave up on the session
        app.check_login_redirect();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

/// Interactive login from the command line
async fn login_cli() -> Result<()> {
    let mut config = Config::load()?;
    let services = Services::open(&config)?;

    let default_user = std::env::var(app::ENV_USERNAME)
        .ok()
        .or_else(|| config.last_username.clone());

    let username = match default_user {
        Some(ref last) => {
            print!("Username [{}]: ", last);
            io::stdout().flush()?;
            let input = read_line()?;
            if input.is_empty() {
                last.clone()
            } else {
                input
            }
        }
        None => {
            print!("Username: ");
            io::stdout().flush()?;
            read_line()?
        }
    };
    if username.is_empty() {
        bail!("Username required");
    }

    let password = match std::env::var(app::ENV_PASSWORD) {
        Ok(p) if !p.is_empty() => p,
        _ => rpassword::prompt_password("Password: ")?,
    };

    println!("\nAuthenticating...");
    let user = match services.api.login(&username, &password).await {
        Ok(user) => user,
        Err(e) => bail!(app::login_error_message(&e)),
    };

    if let Err(e) = CredentialStore::store(&username, &password) {
        eprintln!("Warning: could not remember password: {}", e);
    }
    config.last_username = Some(username);
    config.save()?;

    println!(
        "Logged in as {} ({})",
        user.full_name(),
        user.role.label()
    );
    Ok(())
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Download a unit report without starting the UI
async fn report_cli(args: &[String]) -> Result<()> {
    let (kind, unit_id, target) = match args {
        [kind, unit_id] => (kind, unit_id, None),
        [kind, unit_id, path] => (kind, unit_id, Some(PathBuf::from(path))),
        _ => bail!("{}", USAGE),
    };
    let kind = OrgUnitKind::parse(kind)
        .with_context(|| format!("Unknown level '{}'", kind))?;
    let unit_id: i64 = unit_id
        .parse()
        .with_context(|| format!("Invalid unit id '{}'", unit_id))?;

    let config = Config::load()?;
    let services = Services::open(&config)?;
    if !services.api.session().is_authenticated() {
        bail!("Not logged in. Run `moodtrack --login` first.");
    }

    let path = target.unwrap_or_else(|| {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        app::report_path(&dir, kind, unit_id, Local::now().date_naive())
    });

    let result = app::save_report(&services.api, kind, unit_id, &path).await;

    // Surface what the client would have toasted
    for notification in services.toasts.drain() {
        eprintln!("{}", notification.message);
    }
    if services.redirect.take() {
        eprintln!("Session expired. Run `moodtrack --login` again.");
    }

    result?;
    println!("Report saved to {}", path.display());
    Ok(())
}
