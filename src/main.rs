mod analysis;
mod app;
mod config;
mod diary_entry;
mod diary_state;
mod editor;
mod error;
mod handlers;
mod notify;
mod services;
mod session;
mod share;
mod ui;
mod view;

use app::{App, CompletionReceiver};
use chrono::Local;
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use config::Config;
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use diary_state::DiaryState;
use futures::StreamExt;
use handlers::handle_key_event;
use ratatui::{backend::CrosstermBackend, Terminal};
use services::Services;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::ui;

#[derive(Parser)]
#[command(name = "ai-diary")]
#[command(about = "A terminal diary with simulated sign-in and AI mood analysis")]
#[command(version)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long, default_value = "ai-diary.json", env = "AI_DIARY_CONFIG")]
    config: PathBuf,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Enable verbose debug output in the log file
    #[arg(short, long)]
    verbose: bool,

    /// Start with the two sample entries
    #[arg(long)]
    with_samples: bool,

    /// Directory exported entries are written to
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,
}

fn init_tracing(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let default = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Raw mode and the alternate screen, undone on drop so that early returns
/// and unwinding panics leave a usable shell behind.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Restore the terminal before the installed panic report is printed.
fn restore_terminal_on_panic() {
    let report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        report(info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    restore_terminal_on_panic();
    let args = Args::parse();
    init_tracing(&args)?;

    let mut config = Config::load(&args.config)
        .map_err(|e| eyre!("Failed to load config {}: {}", args.config.display(), e))?;
    if args.with_samples {
        config.sample_entries = true;
    }
    if let Some(dir) = args.export_dir {
        config.export_dir = dir;
    }
    info!(?config, "Starting");

    let mut entries = DiaryState::new();
    if config.sample_entries {
        for entry in diary_entry::sample_entries(Local::now()) {
            entries.add_entry(entry)?;
        }
    }

    let services = Services::simulated(&config);
    let (mut app, mut completions) = App::new(&config, services, entries);

    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut completions).await;

    drop(guard);
    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    completions: &mut CompletionReceiver,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    loop {
        terminal.draw(|f| ui(f, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, key);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                None => break,
            },
            Some(completion) = completions.recv() => app.apply(completion),
            now = tick.tick() => app.tick(now),
        }

        if app.should_quit {
            break;
        }
    }

    info!("Exiting");
    Ok(())
}
