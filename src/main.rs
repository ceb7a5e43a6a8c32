use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;

use battery_dash::app::load_page;
use battery_dash::{
    events, export, logging, sim, ui, App, DirSource, LimitsTable, Page, PageData, Settings,
    Simulator, SnapshotDir, SnapshotSource,
};

#[derive(Parser, Debug)]
#[command(name = "battery-dash")]
#[command(about = "Terminal dashboard for battery pack telemetry snapshots")]
struct Args {
    /// Config file (defaults to battery_dash.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding main_page.csv and module_{k}_data.csv
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Limits table (relative paths resolve against the data directory)
    #[arg(short, long)]
    limits: Option<PathBuf>,

    /// Redraw and poll interval in milliseconds
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start the simulator without asking
    #[arg(long, conflicts_with = "no_simulate")]
    simulate: bool,

    /// Do not start the simulator and do not ask
    #[arg(long)]
    no_simulate: bool,

    /// Export every page to a JSON file and exit
    #[arg(short, long, conflicts_with = "simulate")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }
    if let Some(limits) = args.limits {
        settings.limits_file = limits;
    }
    if let Some(frame_ms) = args.frame_ms {
        settings.frame_ms = frame_ms;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }

    // Never log to the terminal we draw on
    if let Some(ref log_file) = settings.log_file {
        logging::init_file(log_file, &settings.log_level)?;
    }

    let limits = LimitsTable::load_or_empty(&settings.limits_path());
    let dir = SnapshotDir::new(&settings.data_dir);
    info!(data_dir = %dir.root().display(), limits = limits.len(), "starting dashboard");

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(dir, &limits, &export_path);
    }

    let simulate = if args.simulate {
        true
    } else if args.no_simulate {
        false
    } else {
        ask_simulate()?
    };

    if simulate {
        run_with_simulator(dir, limits, &settings)
    } else {
        run_tui(Box::new(DirSource::new(dir)), limits, settings.frame_interval(), None)
    }
}

/// Ask on stdin whether to start the simulator. Anything but `y` is no.
fn ask_simulate() -> Result<bool> {
    print!("Run with battery data simulator? (y/n): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Run the TUI while the simulator writes snapshots in the background
fn run_with_simulator(dir: SnapshotDir, limits: LimitsTable, settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("failed to start runtime")?;

    let simulator = Simulator::from_entropy(dir.clone());
    let handle = rt.spawn(simulator.run(settings.sim_interval()));
    info!(period = ?settings.sim_interval(), "{}", sim::STARTED_MESSAGE);

    // stdout is about to be taken over by the alternate screen
    let result = run_tui(
        Box::new(DirSource::new(dir)),
        limits,
        settings.frame_interval(),
        Some(sim::STARTED_MESSAGE),
    );

    // The simulator has no state worth flushing
    handle.abort();

    result
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn SnapshotSource>,
    limits: LimitsTable,
    frame_interval: Duration,
    startup_message: Option<&str>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, limits);
    app.reload_data();
    if let Some(message) = startup_message {
        app.set_status_message(message.to_string());
    }

    let result = run_app(&mut terminal, &mut app, frame_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    frame_interval: Duration,
) -> Result<()> {
    // Three module columns need room for "Voltage 11" and a value each
    const MIN_WIDTH: u16 = 72;
    const MIN_HEIGHT: u16 = 17;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = Rect::new(0, top, area.width, 5u16.min(area.height - top));
                frame.render_widget(paragraph, centered);
                return;
            }

            let [header, tabs, content, status] = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Page
                Constraint::Length(1), // Status bar
            ])
            .areas(area);

            ui::common::render_header(frame, app, header);
            ui::common::render_tabs(frame, app, tabs);

            match app.data {
                Some(PageData::Pack(ref page)) => ui::summary::render(frame, app, page, content),
                Some(PageData::Module(ref page)) => ui::module::render(frame, app, page, content),
                None => {}
            }

            ui::common::render_status_bar(frame, app, status);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Resize needs nothing: the next frame redraws at the new size
        if let Some(Event::Key(key)) = events::poll_event(frame_interval)? {
            events::handle_key_event(app, key);
        }

        // Snapshots change underneath us; read the page fresh every frame
        app.reload_data();
    }

    Ok(())
}

/// Export every page to a JSON file
fn export_to_file(dir: SnapshotDir, limits: &LimitsTable, export_path: &Path) -> Result<()> {
    let mut source = DirSource::new(dir);
    let pages: Vec<(Page, PageData)> =
        Page::all().map(|page| (page, load_page(&mut source, limits, page))).collect();

    export::write_json(export_path, &export::pages_to_json(&pages))?;

    println!("Exported battery state to: {}", export_path.display());
    Ok(())
}
