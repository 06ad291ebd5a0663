// algoviz: step-by-step searching and sorting on the command line

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use algoviz::algorithms::Algorithm;
use algoviz::config::Config;
use algoviz::controller::{Command, Controller};
use algoviz::logging;
use algoviz::source::RandomArraySource;

#[derive(Debug, Parser)]
#[command(name = "algoviz", version, about = "Step through searching and sorting algorithms")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Algorithm to select at startup, e.g. "binary search" or "insertion"
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Target value for the search algorithms
    #[arg(short, long, allow_hyphen_values = true)]
    target: Option<i32>,

    /// Start in step mode
    #[arg(long)]
    step_mode: bool,

    /// Live-mode speed divisor
    #[arg(long)]
    speed: Option<u32>,

    /// Print the algorithm catalogue and exit
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn print_catalogue() {
    for algorithm in Algorithm::ALL {
        let info = algorithm.info();
        println!("{}", algorithm);
        println!("  time:  {}", info.time_complexity);
        println!("  space: {}", info.space_complexity);
        println!("  logic: {}", info.logic);
        println!("  use:   {}", info.best_use_cases);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    if args.list {
        print_catalogue();
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load(path)
            .wrap_err_with(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };

    let source = Arc::new(RandomArraySource::new(
        config.array_size,
        config.min_value,
        config.max_value,
    ));
    let mut controller = Controller::new(config, source);

    if let Some(algorithm) = args.algorithm {
        controller.handle(Command::SelectAlgorithm(algorithm)).await;
    }
    if args.target.is_some() {
        controller.handle(Command::SetTarget(args.target)).await;
    }
    if let Some(speed) = args.speed {
        controller.handle(Command::SetSpeed(speed)).await;
    }
    if args.step_mode {
        controller.handle(Command::ToggleStepMode).await;
    }

    // Print every published state on stdout
    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        let mut shown = updates.borrow_and_update().clone();
        println!("{}", shown);

        while updates.changed().await.is_ok() {
            let mut state = updates.borrow_and_update().clone();

            // Skip timer ticks that only move the clock
            let elapsed = state.elapsed_time_ms;
            state.elapsed_time_ms = shown.elapsed_time_ms;
            if state == shown {
                continue;
            }
            state.elapsed_time_ms = elapsed;

            println!("{}", state);
            shown = state;
        }
    });

    info!("reading commands from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        match line.parse::<Command>() {
            Ok(command) => controller.handle(command).await,
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    controller.shutdown().await;
    drop(controller);
    if let Err(e) = printer.await {
        warn!(error = %e, "printer task ended abnormally");
    }

    Ok(())
}
