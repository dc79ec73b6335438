use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinegrid::config::LOCAL_OVERRIDE_FILE;
use cinegrid::ui::Theme;
use cinegrid::{events, ui, ApiKeyResolver, App, Overrides, Roster, Settings};

/// How long to wait for input before running the next tick.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "cinegrid")]
#[command(about = "Browse director and actor card grids with sort and search")]
struct Args {
    /// Path to the roster JSON file [default: roster.json]
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Settings and local override file (TOML)
    #[arg(short, long, default_value = LOCAL_OVERRIDE_FILE)]
    config: PathBuf,

    /// Movie database API key; takes precedence over environment and file
    #[arg(long)]
    api_key: Option<String>,

    /// Tab to show at start-up (directors, actors)
    #[arg(short, long)]
    tab: Option<String>,

    /// Delay in milliseconds before an opened search box takes focus
    #[arg(long)]
    focus_delay_ms: Option<u64>,

    /// Seed for popular-shuffle tie breaking (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export the initial grids to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.as_deref())?;

    let overrides = Overrides {
        roster: args.roster.clone(),
        tab: args.tab.clone(),
        focus_delay_ms: args.focus_delay_ms,
    };
    let settings = Settings::load(Some(args.config.as_path()), &overrides)?;

    let api_key = ApiKeyResolver::new(args.config.clone())
        .injected(args.api_key.clone())
        .resolve()?;

    let roster = Roster::load(&settings.roster)
        .with_context(|| format!("Failed to load {}", settings.roster.display()))?;
    info!(
        directors = roster.directors.len(),
        actors = roster.actors.len(),
        "roster loaded"
    );

    let mut app = App::new(&roster)
        .with_tab(settings.tab)
        .with_focus_delay(Duration::from_millis(settings.focus_delay_ms));
    if let Some(seed) = args.seed {
        app = app.with_seed(seed);
    }
    app.api_key_origin = api_key.as_ref().map(|key| key.origin().label());

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        app.export_state(&export_path)?;
        println!("Exported grids to: {}", export_path.display());
        return Ok(());
    }

    run_tui(app.with_theme(Theme::auto_detect()))
}

/// Log to a file when asked; the terminal belongs to the TUI.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    info!("interface started");
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("interface stopped");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(POLL_INTERVAL)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Deferred focus requests
        app.tick(Instant::now());
    }

    Ok(())
}
