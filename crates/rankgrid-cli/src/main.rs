mod scan;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::scan::{GridArgs, ScanArgs};

#[derive(Debug, Parser)]
#[command(name = "rankgrid")]
#[command(about = "Local search visibility grid scanner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank a business across a grid of points around a center
    Scan(ScanArgs),
    /// Print the grid points a scan would query, without querying
    Grid(GridArgs),
    /// Print a location in the provider's "City,State,United States" form
    NormalizeLocation {
        /// Free-form location, e.g. "Seattle, WA" or "98101"
        location: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => {
            let config = rankgrid_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            scan::run_scan_command(&config, &args).await?;
        }
        Commands::Grid(args) => {
            init_tracing(&fallback_log_level())?;
            scan::run_grid_command(&args)?;
        }
        Commands::NormalizeLocation { location } => {
            println!("{}", rankgrid_scanner::normalize_location(&location));
        }
    }

    Ok(())
}

fn fallback_log_level() -> String {
    std::env::var("RANKGRID_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned())
}

/// Installs the fmt subscriber on stderr; `RUST_LOG` wins over `level`.
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
