//! UniBaby Pool - a terminal storefront for children's swimming lessons.
//!
//! Browse trainers and packages, register a child and pay through the hosted
//! checkout page, then confirm the payment once the page sends you back.

mod app;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unibaby_core::api::client::ApiClient;
use unibaby_core::catalog::load_catalog;
use unibaby_core::config::Config;
use unibaby_core::location::PageLocation;
use unibaby_core::poller::{poll_payment_status, PollPolicy};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "unibaby.log";

const USAGE: &str = "Usage:
  unibaby [--return-url <URL>]     Open the storefront
  unibaby --packages               Print the package catalog as JSON
  unibaby --check-payment <URL>    Poll the payment status for a payment return URL";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Storefront { return_url: Option<String> },
    Packages,
    CheckPayment { return_url: String },
    Help,
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut return_url = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--packages" => return Ok(Command::Packages),
            "--check-payment" => {
                let return_url = args.next().context("--check-payment requires a return URL")?;
                return Ok(Command::CheckPayment { return_url });
            }
            "--return-url" => {
                return_url = Some(args.next().context("--return-url requires a URL")?);
            }
            "-h" | "--help" => return Ok(Command::Help),
            other => anyhow::bail!("Unknown argument: {}\n\n{}", other, USAGE),
        }
    }

    Ok(Command::Storefront { return_url })
}

/// Log to stderr, for the headless commands
fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Log to a daily rolling file; the terminal belongs to the UI. The returned
/// guard flushes pending lines when dropped.
fn init_file_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = match Config::log_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter)
        .init();

    Some(guard)
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let command = parse_args(std::env::args().skip(1))?;

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Packages => {
            init_stderr_tracing();
            print_packages(&load_config()).await
        }
        Command::CheckPayment { return_url } => {
            init_stderr_tracing();
            check_payment(&load_config(), &return_url).await
        }
        Command::Storefront { return_url } => {
            let _guard = init_file_tracing();
            run_storefront(load_config(), return_url).await
        }
    }
}

/// Print the package catalog to stdout as JSON
async fn print_packages(config: &Config) -> Result<()> {
    let api = ApiClient::new(config.backend_url())?;
    let catalog = load_catalog(&api).await;
    eprintln!("Found {} packages", catalog.len());
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

/// Session id carried by a payment return URL
fn return_url_session(return_url: &str) -> Result<String> {
    PageLocation::parse(return_url)?
        .session_id()
        .context("Return URL has no session_id parameter")
}

/// Run one bounded poll chain for the session in `return_url` and print the
/// outcome
async fn check_payment(config: &Config, return_url: &str) -> Result<()> {
    let session_id = return_url_session(return_url)?;
    let api = ApiClient::new(config.backend_url())?;
    let report = poll_payment_status(&api, &session_id, PollPolicy::default(), None).await;

    println!("{}: {}", report.status.title(), report.status.message());
    if let Some(amount) = report.last_reply.as_ref().and_then(|reply| reply.amount_major()) {
        println!("Amount: {} ₸", unibaby_core::utils::format_price(amount));
    }
    eprintln!("{} status request(s) sent", report.attempts);
    Ok(())
}

async fn run_storefront(config: Config, return_url: Option<String>) -> Result<()> {
    info!("UniBaby storefront starting");

    let location = match return_url {
        Some(url) => PageLocation::parse(&url)?,
        None => config.site_location()?,
    };

    // Create app before touching the terminal so config errors print cleanly
    let mut app = App::new(config, location)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();

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

    info!("UniBaby storefront shutting down");
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
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    app.quit();
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Let background tasks make progress before draining their results
        tokio::task::yield_now().await;

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
