use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use racewheel::{
    app::{App, AppSettings, KeyOutcome},
    config::{Config, ConfigStore, FileConfigStore},
    logging::{init_logging, LogConfig},
    race::{BoatData, RaceComparisonData, RaceTime},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, RaceEvent, Runner, Ticker},
    util::odd_at_least_one,
    TICK_RATE_MS,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{error, info};

/// compare two sailboats' elapsed and handicap-corrected race times
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Pick start and finish times and handicap ratings for two boats on scroll wheels, and see elapsed time, corrected time, the winner and the finish time that would tie."
)]
pub struct Cli {
    /// show a seconds wheel in every time picker
    #[clap(long)]
    show_seconds: bool,

    /// rows shown per wheel (odd)
    #[clap(long)]
    visible_count: Option<usize>,

    /// initial handicap rating of boat 1
    #[clap(long, allow_hyphen_values = true)]
    boat1_rating: Option<i32>,

    /// initial handicap rating of boat 2
    #[clap(long, allow_hyphen_values = true)]
    boat2_rating: Option<i32>,

    /// start time for both boats, HH:MM or HH:MM:SS (default: now)
    #[clap(long)]
    start: Option<RaceTime>,

    /// write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// more log output (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// save the effective preferences as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command-line flags on the stored preferences
    fn merge_config(&self, stored: Config) -> Config {
        Config {
            show_seconds: self.show_seconds || stored.show_seconds,
            visible_count: odd_at_least_one(self.visible_count.unwrap_or(stored.visible_count)),
            rows_per_item: stored.rows_per_item,
            boat1_rating: self.boat1_rating.unwrap_or(stored.boat1_rating),
            boat2_rating: self.boat2_rating.unwrap_or(stored.boat2_rating),
        }
    }

    fn initial_race(&self, cfg: &Config) -> RaceComparisonData {
        let start = self.start.unwrap_or_else(RaceTime::now);
        RaceComparisonData::new(
            BoatData::new(start, start, cfg.boat1_rating),
            BoatData::new(start, start, cfg.boat2_rating),
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_config = LogConfig::from_verbosity(cli.verbose).with_log_file(cli.log_file.clone());
    if let Err(err) = init_logging(&log_config) {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::Io,
            format!("cannot open log file {}: {err}", log_config.log_file.display()),
        )
        .exit();
    }

    let store = FileConfigStore::new();
    let config = cli.merge_config(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "preferences saved");
    }

    let mut app = match App::new(cli.initial_race(&config), AppSettings::from(&config)) {
        Ok(app) => app,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);
    if let Err(err) = &result {
        error!(%err, "event loop failed");
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    info!("session started");
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            // redraw keeps the clock in the title current
            RaceEvent::Tick | RaceEvent::Resize => {}
            RaceEvent::FocusLost => {
                app.pointer_cancel();
            }
            RaceEvent::Mouse(mouse) => {
                let size = terminal.size()?;
                let layout = app.layout(ratatui::layout::Rect::new(0, 0, size.width, size.height));
                app.on_mouse(mouse, &layout)?;
            }
            RaceEvent::Key(key) => {
                if app.on_key(key)? == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }
    info!("session ended");
    Ok(())
}
