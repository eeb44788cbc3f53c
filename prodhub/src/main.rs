//! Productivity Hub: to-do list, alarm clock and scientific calculator
//! in the terminal.
//!
//! Tasks and alarms are saved under the data directory
//! (`~/.local/share/prodhub` on Linux). Configuration via CLI flags,
//! environment variables, or config file
//! (`~/.config/prodhub/config.toml`).
//!
//! ```bash
//! cargo run --bin prodhub
//!
//! # Throwaway session, no alarm audio
//! cargo run --bin prodhub -- --in-memory --mute
//!
//! # Play a sound file when an alarm rings (config.toml)
//! # [alarm]
//! # sound = "paplay /usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga"
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use prodhub::app::App;
use prodhub::config::{CliArgs, HubConfig};
use prodhub::scheduler::SystemClock;
use prodhub::storage::Storage;
use prodhub::{sound, ui};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // The terminal belongs to ratatui from here on, so logs go to a file.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match HubConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("prodhub: {e}; continuing with defaults");
            tracing::warn!(error = %e, "config ignored");
            HubConfig::default()
        }
    };

    tracing::info!("prodhub starting");

    let storage = Storage::open(&config);

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &storage, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("prodhub exiting");
    result
}

/// Send tracing output to `path` (default `$TMPDIR/prodhub.log`).
///
/// Keep the returned guard alive until exit; dropping it flushes the
/// writer. `None` means the path has no usable file name and logging is off.
fn init_logging(level: &str, path: Option<&Path>) -> Option<WorkerGuard> {
    let fallback = std::env::temp_dir().join("prodhub.log");
    let path = path.unwrap_or(&fallback);

    let appender = tracing_appender::rolling::never(path.parent()?, path.file_name()?.to_str()?);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Tick, draw and handle one key per iteration until the user quits.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    storage: &Storage,
    config: &HubConfig,
) -> io::Result<()> {
    let mut app = App::with_store(
        &storage.store,
        sound::from_setting(&config.sound),
        Box::new(SystemClock),
        config,
    )
    .with_persistence(storage.is_persistent());

    app.scheduler.start(config.tick);

    loop {
        // Step 1: Apply pending alarm ticks (clock refresh, ringing).
        app.on_tick();

        // Step 2: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key_event(key);
        }

        if app.should_quit {
            app.scheduler.stop();
            return Ok(());
        }

        // Let the ticker task run between polls.
        tokio::task::yield_now().await;
    }
}
