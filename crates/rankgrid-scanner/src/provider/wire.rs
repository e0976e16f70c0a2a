//! Wire shapes for the Google Maps SERP "live advanced" endpoint.
//!
//! Every response is wrapped in an envelope with a numeric `status_code`
//! (`20000` = OK) and a `tasks` array holding one entry per submitted task.

use serde::{Deserialize, Serialize};

use crate::types::{ItemKind, RankItem, Rating};

pub(crate) const STATUS_OK: i64 = 20_000;
pub(crate) const STATUS_NO_RESULTS: i64 = 40_102;

const ORGANIC_TYPE: &str = "maps_search";
const PAID_TYPE: &str = "maps_paid_item";

#[derive(Debug, Serialize)]
pub(crate) struct MapsTaskRequest<'a> {
    pub keyword: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_coordinate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<&'a str>,
    pub language_code: &'a str,
    pub depth: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapsResponse {
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub tasks: Option<Vec<MapsTask>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapsTask {
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub result: Option<Vec<MapsResult>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapsResult {
    #[serde(default)]
    pub items: Option<Vec<MapsItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapsItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub rank_absolute: Option<u32>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub rating: Option<MapsRating>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapsRating {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub votes_count: Option<u64>,
}

impl MapsItem {
    /// Converts to a [`RankItem`]; item types other than organic and paid
    /// listings yield `None`. Missing coordinates become `NaN`.
    pub(crate) fn into_rank_item(self) -> Option<RankItem> {
        let kind = match self.item_type.as_str() {
            ORGANIC_TYPE => ItemKind::Organic,
            PAID_TYPE => ItemKind::Paid,
            _ => return None,
        };
        let rating = self.rating.and_then(|r| {
            r.value.map(|value| Rating {
                value,
                count: r.votes_count.unwrap_or(0),
            })
        });
        Some(RankItem {
            kind,
            rank_absolute: self.rank_absolute.unwrap_or(0),
            place_id: self.place_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            lat: self.latitude.unwrap_or(f64::NAN),
            lng: self.longitude.unwrap_or(f64::NAN),
            rating,
        })
    }
}
