//! CLI for maze solving

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use log::info;
use maze_backtrack::{
    Canvas, Grid, PrizePlacement, Renderer, SharedGrid, Shutdown, Solver, Spawner, TerminalCanvas,
};

/// Watch a traveler backtrack through a maze in search of the prize
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Render cadence in milliseconds
    #[arg(short, long, default_value_t = 50)]
    frame_length: u64,

    /// Pause between search steps in milliseconds, 0 to disable
    #[arg(short, long, default_value_t = 100)]
    step_delay: u64,

    /// Random seed for placing the traveler and the prize
    #[arg(long)]
    seed: Option<u64>,

    /// Never place the prize on the traveler's start cell
    #[arg(long)]
    distinct: bool,

    /// Do not draw the maze, only print the result
    #[arg(long)]
    headless: bool,

    /// File, where to read the maze (comma-separated 0-3). Use `-` for stdin.
    file: PathBuf,
}

/// Read maze from file, search it, print output
fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let args = Args::parse();

    let text = if args.file.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.file)
            .with_context(|| format!("Could not read maze from {}", args.file.display()))?
    };
    let mut grid = Grid::parse_csv(&text)?;

    let placement = if args.distinct {
        PrizePlacement::Distinct
    } else {
        PrizePlacement::MayCoincide
    };
    let spawn = Spawner::new(args.seed).placement(placement).spawn(&mut grid)?;

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.trigger()).context("Error setting Ctrl-C handler")?;
    }

    let mut shared = SharedGrid::new(grid);
    let view = (!args.headless).then(|| {
        Renderer::new(Duration::from_millis(args.frame_length)).begin_rendering(
            shared.clone(),
            TerminalCanvas::stdout(),
            shutdown.clone(),
        )
    });

    let report = Solver::new(spawn.start).run(
        &mut shared,
        Duration::from_millis(args.step_delay),
        &shutdown,
    )?;

    if let Some(view) = view {
        let mut canvas = view.stop()?;
        // Last frame, showing where the search ended
        canvas.draw(&shared.snapshot())?;
    }
    info!("Search finished: {:?}", report.outcome);
    report.print_report();
    Ok(())
}
