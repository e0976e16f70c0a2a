//! Handlers for the `scan` and `grid` sub-commands.

use std::sync::Arc;

use clap::{ArgGroup, Args, ValueEnum};
use rankgrid_core::AppConfig;
use rankgrid_scanner::{
    generate_grid, render_rank_grid, run_scan, MapsRankClient, ScanCenter, ScanOptions,
    ScanRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("center").required(true).args(["lat", "business"])))]
pub struct ScanArgs {
    /// Search keyword to rank for, e.g. "pizza"
    #[arg(long)]
    pub keyword: String,

    /// Center latitude (requires --lng)
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Center longitude (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Business to look up as the scan center (requires --location)
    #[arg(long, requires = "location", conflicts_with_all = ["lat", "lng"])]
    pub business: Option<String>,

    /// Area to search for --business, e.g. "Seattle, WA"
    #[arg(long, requires = "business")]
    pub location: Option<String>,

    /// Name to match in results (defaults to --business)
    #[arg(long)]
    pub business_name: Option<String>,

    /// Place id to match in results
    #[arg(long)]
    pub place_id: Option<String>,

    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(3..=9))]
    pub grid_size: u8,

    /// Radius in miles
    #[arg(long, default_value_t = 5.0, value_parser = parse_radius)]
    pub radius: f64,

    /// Worker count (defaults to RANKGRID_SCAN_CONCURRENCY)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-worker pause after each point (defaults to RANKGRID_SCAN_DELAY_MS)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Results requested per point (defaults to RANKGRID_SCAN_DEPTH)
    #[arg(long)]
    pub depth: Option<u32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct GridArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(3..=9))]
    pub grid_size: u8,

    #[arg(long, default_value_t = 5.0, value_parser = parse_radius)]
    pub radius: f64,
}

/// Accepts radii within the recommended 1-25 mile range.
fn parse_radius(raw: &str) -> Result<f64, String> {
    let radius: f64 = raw
        .parse()
        .map_err(|e| format!("'{raw}' is not a number: {e}"))?;
    if (1.0..=25.0).contains(&radius) {
        Ok(radius)
    } else {
        Err(format!("radius {radius} is outside 1-25 miles"))
    }
}

impl ScanArgs {
    fn center(&self) -> anyhow::Result<ScanCenter> {
        match (self.lat, self.lng, &self.business, &self.location) {
            (Some(lat), Some(lng), _, _) => Ok(ScanCenter::Coordinates { lat, lng }),
            (_, _, Some(business_name), Some(location)) => Ok(ScanCenter::Business {
                business_name: business_name.clone(),
                location: location.clone(),
            }),
            _ => anyhow::bail!("supply --lat/--lng or --business/--location"),
        }
    }

    fn options(&self, config: &AppConfig) -> ScanOptions {
        let defaults = ScanOptions::from_config(config);
        ScanOptions {
            grid_size: usize::from(self.grid_size),
            radius_miles: self.radius,
            delay_ms: self.delay_ms.unwrap_or(defaults.delay_ms),
            concurrency: self.concurrency.unwrap_or(defaults.concurrency),
            depth: self.depth.unwrap_or(defaults.depth),
        }
    }

    pub(crate) fn to_request(&self, config: &AppConfig) -> anyhow::Result<ScanRequest> {
        Ok(ScanRequest {
            keyword: self.keyword.clone(),
            center: self.center()?,
            business_name: self.business_name.clone(),
            place_id: self.place_id.clone(),
            options: self.options(config),
            unit_cost: config.unit_cost,
        })
    }
}

/// Runs one scan against the configured provider and prints the summary.
///
/// # Errors
///
/// Returns an error if the provider client cannot be built or the scan fails
/// a precondition. Individual point failures are part of the printed summary.
pub(crate) async fn run_scan_command(config: &AppConfig, args: &ScanArgs) -> anyhow::Result<()> {
    let request = args.to_request(config)?;
    let client = Arc::new(MapsRankClient::from_config(config)?);

    let summary = run_scan(Arc::clone(&client), client.as_ref(), request).await?;
    if summary.stats.failed_points > 0 {
        tracing::warn!(
            failed_points = summary.stats.failed_points,
            total_points = summary.stats.total_points,
            "some grid points could not be queried"
        );
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => println!("{}", render_rank_grid(&summary)),
    }
    Ok(())
}

/// Prints the grid points for the given center as JSON.
///
/// # Errors
///
/// Returns an error if the points cannot be serialized.
pub(crate) fn run_grid_command(args: &GridArgs) -> anyhow::Result<()> {
    let points = generate_grid(
        args.lat,
        args.lng,
        usize::from(args.grid_size),
        args.radius,
    );
    tracing::debug!(points = points.len(), "generated grid");
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}
