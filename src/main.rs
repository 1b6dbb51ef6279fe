use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gravitrack::data::duration::{parse_duration, parse_timeout};
use gravitrack::ui::{self, Theme};
use gravitrack::{
    events, App, HttpSource, LoopTiming, MonitorEvent, MonitorHandle, MonitorLoop,
    PushoverNotifier, SettingsLoader, SettingsOverrides,
};

#[derive(Parser, Debug)]
#[command(name = "gravitrack")]
#[command(about = "Monitor a phyphox motion sensor and raise Pushover alerts")]
struct Args {
    /// TOML config file (re-read with `r` in the TUI)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor host (phyphox remote access)
    #[arg(long)]
    host: Option<String>,

    /// Sensor port
    #[arg(short, long)]
    port: Option<String>,

    /// Pushover user key
    #[arg(long)]
    user_key: Option<String>,

    /// Pushover application token
    #[arg(long)]
    api_token: Option<String>,

    /// Acceleration limit in m/s²
    #[arg(long)]
    acc_threshold: Option<String>,

    /// Angular velocity limit in rad/s
    #[arg(long)]
    gyr_threshold: Option<String>,

    /// Pause between polling cycles (e.g., "500ms", "1s")
    #[arg(short, long, default_value = "500ms")]
    interval: String,

    /// Minimum time between two notifications (e.g., "10s")
    #[arg(long, default_value = "10s")]
    cooldown: String,

    /// Timeout for one sensor request
    #[arg(long, default_value = "2s")]
    fetch_timeout: String,

    /// Override the Pushover messages endpoint
    #[arg(long)]
    pushover_url: Option<String>,

    /// Print output lines to stdout instead of running the TUI
    #[arg(long)]
    headless: bool,

    /// Write diagnostic logs to this file (TUI mode)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let timing = LoopTiming {
        poll_interval: parse_duration(&args.interval).context("invalid --interval")?,
        cooldown: parse_duration(&args.cooldown).context("invalid --cooldown")?,
    };
    let fetch_timeout = parse_timeout(&args.fetch_timeout).context("invalid --fetch-timeout")?;

    init_logging(args.headless, args.log_file.as_ref())?;

    let loader = SettingsLoader::new(
        args.config.clone(),
        SettingsOverrides {
            host: args.host.clone(),
            port: args.port.clone(),
            user_key: args.user_key.clone(),
            api_token: args.api_token.clone(),
            acceleration: args.acc_threshold.clone(),
            angular_velocity: args.gyr_threshold.clone(),
        },
    );
    let settings = loader.load().context("failed to load settings")?;

    // Build a tokio runtime for the polling task
    let rt = Runtime::new()?;
    let _guard = rt.enter();

    let source = Arc::new(HttpSource::with_timeout(fetch_timeout)?);
    let mut notifier = PushoverNotifier::builder();
    if let Some(url) = &args.pushover_url {
        notifier = notifier.endpoint(url.clone());
    }
    let notifier = Arc::new(notifier.build()?);

    info!(
        interval = ?timing.poll_interval,
        cooldown = ?timing.cooldown,
        headless = args.headless,
        "starting gravitrack"
    );
    let (handle, events) = MonitorLoop::spawn(source, notifier, settings, timing);

    if args.headless {
        return run_headless(&rt, handle, events);
    }

    let app = App::new(handle, events, loader, Theme::auto_detect());
    run_tui(&rt, app)
}

/// Install the tracing subscriber.
///
/// Headless mode logs to stderr. The TUI owns the terminal, so it only logs
/// when given a file.
fn init_logging(headless: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gravitrack=info"));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

/// Start monitoring at once and print every line until Ctrl-C.
fn run_headless(
    rt: &Runtime,
    handle: MonitorHandle,
    mut events: mpsc::UnboundedReceiver<MonitorEvent>,
) -> Result<()> {
    rt.block_on(async move {
        println!("GraviTrack ready!");
        handle.start();

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => println!("{}", event.log_line()),
                    None => break,
                },
                _ = &mut ctrl_c => break,
            }
        }

        handle.stop();
        handle.shutdown().await;
        while let Ok(event) = events.try_recv() {
            println!("{}", event.log_line());
        }
        Ok(())
    })
}

/// Run the TUI around a spawned monitor
fn run_tui(rt: &Runtime, mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal (UI thread panics only)
    ui::terminal::install_panic_hook(|| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    });

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Quitting stops the loop; a cycle in flight is allowed to finish
    rt.block_on(app.shutdown());

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        // Draw UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Pick up readings and log lines queued by the polling task
        app.drain_events();
    }

    Ok(())
}
