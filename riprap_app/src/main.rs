//! Headless stockpile capture driver
//!
//! Loads scene constants, generates stockpiles and drives the multi-view
//! camera ring at a fixed tick until the requested number of capture cycles
//! has completed. Capture requests are logged; image encoding belongs to the
//! rendering host.

use clap::Parser;
use riprap_engine::foundation::logging;
use riprap_engine::prelude::*;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "riprap", about = "Generate riprap stockpiles and capture multi-view snapshots")]
struct Args {
    /// Scene constants file (.toml or .ron); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the random source; drawn from entropy when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Capture cycles to run
    #[arg(long, default_value_t = 1)]
    cycles: u32,

    /// Tick length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    tick: f32,

    /// Number of rock prototypes to load
    #[arg(long, default_value_t = 5)]
    prototypes: usize,

    /// Use automatic control regardless of the constants file
    #[arg(long)]
    auto: bool,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 10_000_000)]
    max_ticks: u64,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
enum AppError {
    /// Constants could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scene controller failed
    #[error("Scene error: {0}")]
    Scene(#[from] ControllerError),

    /// Tick budget ran out before the cycles completed
    #[error("Stopped after {0} ticks without completing the requested cycles")]
    TickBudget(u64),
}

/// Constants from `--config` (or defaults), switched to auto control by `--auto`
fn load_constants(args: &Args) -> Result<SceneConstants, ConfigError> {
    let mut constants = match &args.config {
        Some(path) => {
            log::info!("Loading scene constants from {}", path.display());
            SceneConstants::load_from_file(path)?
        }
        None => SceneConstants::default(),
    };
    if args.auto && constants.control_type != ControlType::Auto {
        constants.switch_control(ControlType::Auto);
    }
    Ok(constants)
}

struct StockpileApp {
    controller: SceneController,
    sink: LogSink,
    tick: f32,
    max_ticks: u64,
}

impl StockpileApp {
    fn new(args: &Args) -> Result<Self, AppError> {
        let constants = load_constants(args)?;

        let rng = match args.seed {
            Some(seed) => SeededRandom::from_seed(seed),
            None => SeededRandom::from_entropy(),
        };
        let prototypes = (0..args.prototypes)
            .map(|i| Prototype::new(format!("rock_{:02}", i)))
            .collect();
        let directories = FsDirectories::new(&constants.save_path);

        let mut controller =
            SceneController::new(constants, prototypes, Box::new(rng), Box::new(directories))?;
        controller.set_cycle_limit(Some(args.cycles));

        Ok(Self {
            controller,
            sink: LogSink::new(),
            tick: args.tick,
            max_ticks: args.max_ticks,
        })
    }

    fn run(&mut self) -> Result<(), AppError> {
        let report = self.controller.start()?;
        log::info!(
            "Initial stockpile: {} layers, {} instances",
            report.layers,
            report.placements.len()
        );

        // Headless runs press the "start" and "multiview" buttons themselves
        if self.controller.is_paused() {
            self.controller.toggle_pause();
        }
        if self.controller.rig().is_none() {
            self.controller.start_multiview();
        }

        for _ in 0..self.max_ticks {
            match self.controller.tick(self.tick, &mut self.sink)? {
                TickEvent::Finished => {
                    log::info!(
                        "Finished {} cycles with {} captures in {:.1}s of scene time",
                        self.controller.completed_cycles(),
                        self.sink.captured(),
                        self.controller.elapsed()
                    );
                    return Ok(());
                }
                TickEvent::CycleComplete { completed, next_scene } => {
                    log::info!("Cycle {} done, capturing scene {}", completed, next_scene);
                }
                _ => {}
            }
        }

        Err(AppError::TickBudget(self.max_ticks))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = Args::parse();

    log::info!("Starting riprap stockpile capture");
    let mut app = StockpileApp::new(&args)?;
    app.run()?;

    Ok(())
}
