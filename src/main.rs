use adminw::api::{AdminApi, HttpApi};
use adminw::app::{AppConfig, AppState};
use adminw::cli::Cli;
use adminw::effects::EffectRunner;
use adminw::events::{AppEvent, EventHandler};
use adminw::input;
use adminw::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TICK_RATE: Duration = Duration::from_millis(100);

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "adminw v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn state_dir() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("adminw")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("adminw")
    } else {
        std::env::temp_dir().join("adminw")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let api: Arc<dyn AdminApi> = Arc::new(HttpApi::new(args.base_url.clone())?);
    tracing::info!(base_url = %args.base_url, "using admin API");

    let config = AppConfig {
        base_url: args.base_url.to_string(),
        poll_interval: Duration::from_millis(args.poll_ms),
        toast_ttl: Duration::from_millis(args.toast_ms),
        recent_limit: args.recent,
        version_string: format!("adminw v{}", env!("CARGO_PKG_VERSION")),
    };
    let mut state = AppState::new(config);
    state.page = args.page.into();
    state.desktop_notify = !args.no_notify;

    // Restore the terminal before the default hook prints the panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Failed to disable raw mode during panic: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, SetTitle("")) {
            eprintln!("Failed to leave alternate screen during panic: {e}");
        }
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        SetTitle(format!("adminw {}", args.base_url))
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let events = EventHandler::new(TICK_RATE);
    let mut runner = EffectRunner::new(api, events.sender(), state.config.poll_interval);
    runner.apply(state.init());

    let result = run_app(&mut terminal, &mut state, events, &mut runner).await;

    runner.shutdown();

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    result
}

/// Rows available to the output overlay on the current terminal.
fn output_overlay_height(terminal: &Terminal<CrosstermBackend<io::Stdout>>) -> usize {
    let height = terminal.size().map_or_else(
        |e| {
            tracing::warn!("terminal size query failed: {e}");
            24
        },
        |s| s.height,
    );
    tui::output_overlay::visible_height(height)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut events: EventHandler,
    runner: &mut EffectRunner,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| tui::render::render(f, state))?;
        state.prune_toasts();

        let Some(event) = events.next().await else {
            tracing::warn!("event channel closed");
            break;
        };

        match event {
            AppEvent::Key(key) => {
                let action = input::map_key(key, &state.input_context());
                let effects = state.handle_action(action, output_overlay_height(terminal));
                runner.apply(effects);
            }
            AppEvent::Tick => {
                if last_tick.elapsed() >= TICK_RATE {
                    state.advance_spinner();
                    last_tick = Instant::now();
                }
            }
            AppEvent::Response(response) => {
                let effects = state.handle_response(response);
                runner.apply(effects);
            }
            AppEvent::Error(e) => {
                tracing::error!("{e}");
                state.toasts.error(e);
            }
        }

        if state.should_quit {
            break;
        }
    }

    events.stop();
    Ok(())
}
