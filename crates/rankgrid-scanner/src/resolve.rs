//! Turns the caller's center description into coordinates before a scan.
//!
//! Everything that can fail here is a precondition failure: no grid point is
//! queried until a center is known.

use crate::error::ScanError;
use crate::provider::BusinessLookup;

/// How the caller describes the scan center.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanCenter {
    Coordinates { lat: f64, lng: f64 },
    Business { business_name: String, location: String },
}

/// A center ready for grid generation, plus whatever identity the lookup
/// learned about the business.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCenter {
    pub lat: f64,
    pub lng: f64,
    pub place_id: Option<String>,
    pub display_name: Option<String>,
}

/// Resolves `center` to coordinates, calling `lookup` only for
/// [`ScanCenter::Business`].
///
/// # Errors
///
/// - [`ScanError::InvalidOptions`] for out-of-range coordinates.
/// - [`ScanError::MissingCenter`] for a blank business name or location.
/// - [`ScanError::BusinessNotFound`] when the lookup finds nothing.
/// - [`ScanError::Lookup`] when the lookup query fails.
pub async fn resolve_center<L>(center: &ScanCenter, lookup: &L) -> Result<ResolvedCenter, ScanError>
where
    L: BusinessLookup + ?Sized,
{
    match center {
        ScanCenter::Coordinates { lat, lng } => {
            validate_coordinates(*lat, *lng)?;
            Ok(ResolvedCenter {
                lat: *lat,
                lng: *lng,
                place_id: None,
                display_name: None,
            })
        }
        ScanCenter::Business {
            business_name,
            location,
        } => {
            let business_name = business_name.trim();
            let location = location.trim();
            if business_name.is_empty() || location.is_empty() {
                return Err(ScanError::MissingCenter);
            }

            let found = lookup
                .lookup_business(business_name, location)
                .await
                .map_err(ScanError::Lookup)?
                .ok_or_else(|| ScanError::BusinessNotFound {
                    business_name: business_name.to_owned(),
                    location: location.to_owned(),
                })?;
            validate_coordinates(found.lat, found.lng)?;

            tracing::info!(
                business_name,
                location,
                resolved = %found.title,
                lat = found.lat,
                lng = found.lng,
                "resolved scan center from business lookup"
            );

            Ok(ResolvedCenter {
                lat: found.lat,
                lng: found.lng,
                place_id: found.place_id,
                display_name: Some(found.title),
            })
        }
    }
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ScanError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ScanError::InvalidOptions(format!(
            "latitude {lat} is outside [-90, 90]"
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(ScanError::InvalidOptions(format!(
            "longitude {lng} is outside [-180, 180]"
        )));
    }
    Ok(())
}
