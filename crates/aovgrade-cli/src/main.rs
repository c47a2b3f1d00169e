//! aovgrade - grade an AOV and merge it back into the beauty pass

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod io;

#[derive(Parser)]
#[command(name = "aovgrade")]
#[command(author, version, about = "Grade an AOV pass and merge it back into the beauty")]
#[command(long_about = "
Grades an AOV pass with Grade-node controls (blackpoint, whitepoint, lift,
gain, multiply, offset, gamma) and swaps its contribution in the beauty pass.

Examples:
  aovgrade grade -b beauty.exr -a specular.exr -o out.exr --gain 1.5
  aovgrade grade -b beauty.exr -a specular.exr -m matte.exr -o out.exr --mix 0.5
  aovgrade grade -b beauty.exr -a specular.exr -o out.exr -c look.yaml --view-aov
  aovgrade defaults -o look.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an AOV and merge it into the beauty
    #[command(visible_alias = "g")]
    Grade(commands::grade::GradeArgs),

    /// Print the default parameters as YAML
    Defaults(commands::defaults::DefaultsArgs),
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Grade(args) => commands::grade::run(args),
        Commands::Defaults(args) => commands::defaults::run(args),
    }
}
