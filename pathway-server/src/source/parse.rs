//! accessibility.cloud equipment response parsing.
//!
//! The endpoint returns a GeoJSON feature collection; each feature's
//! properties describe one elevator or escalator.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::facility::NormalizedFacility;

use super::error::SourceError;

#[derive(Debug, Deserialize)]
struct EquipmentResponse {
    #[serde(default)]
    features: Vec<EquipmentFeature>,
}

#[derive(Debug, Deserialize)]
struct EquipmentFeature {
    #[serde(default)]
    properties: EquipmentProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EquipmentProperties {
    #[serde(rename = "_id")]
    id: Option<String>,
    /// Operator's own id for the device, used as GTFS pathway id.
    original_id: Option<String>,
    is_working: Option<bool>,
    last_update: Option<String>,
}

/// Normalize an equipment response body.
///
/// Features without an id or working state are skipped. `fetched_at` stands
/// in for a missing or unparseable `lastUpdate`.
pub fn parse_equipment_response(
    body: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<NormalizedFacility>, SourceError> {
    let response: EquipmentResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Json {
            message: e.to_string(),
        })?;

    let total = response.features.len();
    let facilities: Vec<NormalizedFacility> = response
        .features
        .into_iter()
        .filter_map(|f| normalize(f.properties, fetched_at))
        .collect();

    if facilities.len() < total {
        debug!(
            skipped = total - facilities.len(),
            total, "skipped incomplete equipment features"
        );
    }

    Ok(facilities)
}

fn normalize(props: EquipmentProperties, fetched_at: DateTime<Utc>) -> Option<NormalizedFacility> {
    let id = props.id.filter(|id| !id.is_empty())?;
    let is_working = props.is_working?;
    let pathway_id = props
        .original_id
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| id.clone());
    let last_updated_at = props
        .last_update
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(fetched_at);

    Some(NormalizedFacility {
        id,
        pathway_id,
        is_working,
        last_updated_at,
    })
}
