use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;
use tracing_subscriber::EnvFilter;

use grid_paths::{Pattern, Pruning, Scanner, SearchOptions};

#[derive(Parser)]
#[command(name = "grid-paths")]
#[command(about = "Count grid paths matching a move pattern", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the paths from the top-left to the bottom-left corner matching a pattern
    Count {
        /// Moves over U, D, L, R and `*`; read from stdin when omitted
        pattern: Option<String>,
        /// Grid side length; derived from the pattern length when omitted
        #[arg(short = 'n', long)]
        size: Option<usize>,
        /// Give up after this many milliseconds and report a partial count
        #[arg(short = 't', long = "timeout-ms", default_value_t = grid_paths::engine::DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
        #[arg(long, value_enum, default_value_t = Pruning::FloodFill)]
        pruning: Pruning,
    },
    /// Run the regression cases under data/<CATEGORY>
    Verify {
        #[arg(default_value = "regression")]
        category: String,
    },
}

fn read_pattern() -> std::io::Result<String> {
    print!("Input: ");
    std::io::stdout().flush()?;
    Scanner::new(std::io::stdin().lock()).next_line()
}

fn main() -> std::io::Result<()> {
    // install global collector configured based on RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Count {
            pattern,
            size,
            timeout_ms,
            pruning,
        } => {
            let pattern = match pattern {
                Some(pattern) => pattern,
                None => read_pattern()?,
            };
            let parsed = match size {
                Some(size) => Pattern::parse_sized(&pattern, size),
                None => Pattern::parse(&pattern),
            };
            let pattern = match parsed {
                Ok(pattern) => pattern,
                Err(err) => {
                    eprintln!("Sorry, invalid input: {}", err);
                    std::process::exit(1);
                }
            };
            info!("searching a {n}x{n} grid", n = pattern.size());

            let options = SearchOptions {
                timeout: Duration::from_millis(timeout_ms),
                pruning,
            };
            let result = grid_paths::search_with(&pattern, &options);
            println!("{}", result);
        }
        Commands::Verify { category } => {
            if !grid_paths::testing::run_all_tests(&category, grid_paths::solve) {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
