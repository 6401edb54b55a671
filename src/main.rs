// ABOUTME: Main entry point for the Churn Desk TUI application

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{error, info};

use churn_desk::app::{App, EventHandler};
use churn_desk::components::LayoutComponent;
use churn_desk::config::AppConfig;

/// Terminal dashboard for customer churn predictions
#[derive(Debug, Parser)]
#[command(name = "churn-desk", version, about)]
struct Cli {
    /// Base URL of the churn prediction service
    #[arg(long, env = "CHURN_DESK_API_URL")]
    api_url: Option<String>,

    /// Config file to use instead of ~/.churn-desk/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory exported CSV files are written to
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Dataset to upload on start
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging()?;
    setup_panic_handler();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    }
    .with_overrides(cli.api_url, cli.export_dir);
    config.validate()?;
    info!("Using churn service at {}", config.api.base_url);

    let mut app = App::new(config).context("Failed to create HTTP client")?;
    app.init(cli.dataset).await;
    let mut layout = LayoutComponent::new();

    run_tui(&mut app, &mut layout).await?;

    Ok(())
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    enable_raw_mode().context("Terminal not compatible")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &mut app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                    // Run queued actions right away instead of waiting for the tick
                    if app.state.pending_async_action.is_some() {
                        app.tick().await;
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick().await;
            last_tick = Instant::now();

            if app.needs_ui_refresh() {
                terminal.draw(|frame| {
                    layout.render(frame, &app.state);
                })?;
            }
        }

        if app.state.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn setup_logging() -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = AppConfig::app_dir()
        .unwrap_or_else(|| PathBuf::from(".churn-desk"))
        .join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(format!(
        "churn-desk-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "churn_desk=info".into()),
        )
        .init();

    Ok(())
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before reporting
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stderr(), LeaveAlternateScreen, DisableMouseCapture);

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs in ~/.churn-desk/logs for more details.");
    }));
}
