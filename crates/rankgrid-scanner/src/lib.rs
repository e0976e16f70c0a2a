pub mod aggregate;
pub mod error;
pub mod grid;
pub mod location;
pub mod matcher;
pub mod provider;
pub mod report;
pub mod resolve;
mod retry;
pub mod scan;
pub mod types;

pub use aggregate::{compute_stats, scan_cost};
pub use error::{ProviderError, ScanError};
pub use grid::{generate_grid, GridPoint};
pub use location::normalize_location;
pub use matcher::{match_business, MatchTarget, PointMatch};
pub use provider::{BusinessLookup, MapsRankClient, RankProvider, ResolvedBusiness};
pub use report::render_rank_grid;
pub use resolve::{resolve_center, ResolvedCenter, ScanCenter};
pub use scan::{run_scan, ScanOptions, ScanRequest};
pub use types::{ItemKind, RankItem, Rating, ScanPointResult, ScanStats, ScanSummary};
