//! Seams to the external local-search ranking provider.
//!
//! The orchestrator only sees [`RankProvider`]; center resolution only sees
//! [`BusinessLookup`]. [`MapsRankClient`] implements both over HTTP.

mod client;
mod wire;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::types::RankItem;

pub use client::MapsRankClient;

/// Default number of results requested per grid point.
pub const DEFAULT_DEPTH: u32 = 20;

/// Issues one ranking query for one coordinate.
#[async_trait]
pub trait RankProvider: Send + Sync {
    /// Returns the provider's ordered result list for `keyword` at
    /// `(lat, lng)`, at most `depth` entries. A provider "no results" answer
    /// is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failure, non-success HTTP
    /// status, or a non-success provider status.
    async fn rank_items(
        &self,
        keyword: &str,
        lat: f64,
        lng: f64,
        depth: u32,
    ) -> Result<Vec<RankItem>, ProviderError>;
}

/// A business located by name and area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBusiness {
    pub lat: f64,
    pub lng: f64,
    pub place_id: Option<String>,
    pub title: String,
}

/// Resolves a business name plus free-form location to coordinates.
#[async_trait]
pub trait BusinessLookup: Send + Sync {
    /// Returns `Ok(None)` when the provider found nothing usable.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the lookup query itself fails.
    async fn lookup_business(
        &self,
        business_name: &str,
        location: &str,
    ) -> Result<Option<ResolvedBusiness>, ProviderError>;
}
