//! Facility status model.
//!
//! A facility is one physical elevator or escalator reporting whether it
//! currently works. Several facilities may back the same GTFS pathway.
//! The upstream parser normalizes provider data into [`NormalizedFacility`]
//! records; a [`Snapshot`] is one complete fetch of them.

use chrono::{DateTime, TimeZone, Utc};

/// One facility status record, as produced by the upstream parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFacility {
    /// Provider id of the physical device.
    pub id: String,
    /// GTFS `pathway_id` this device serves. Not unique across facilities.
    pub pathway_id: String,
    /// Whether the device is currently usable.
    pub is_working: bool,
    /// When the provider last updated this record.
    pub last_updated_at: DateTime<Utc>,
}

impl NormalizedFacility {
    pub fn new(
        id: impl Into<String>,
        pathway_id: impl Into<String>,
        is_working: bool,
        last_updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            pathway_id: pathway_id.into(),
            is_working,
            last_updated_at,
        }
    }
}

/// The complete set of facility statuses from a single fetch.
///
/// Immutable once built; a newer snapshot supersedes it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    facilities: Vec<NormalizedFacility>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(facilities: Vec<NormalizedFacility>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            facilities,
            fetched_at,
        }
    }

    /// Build a snapshot from a fetch time given in epoch milliseconds.
    ///
    /// Returns `None` if the timestamp is outside chrono's range.
    pub fn from_millis(facilities: Vec<NormalizedFacility>, fetched_at_ms: i64) -> Option<Self> {
        let fetched_at = datetime_from_millis(fetched_at_ms)?;
        Some(Self::new(facilities, fetched_at))
    }

    /// Facilities in upstream order.
    pub fn facilities(&self) -> &[NormalizedFacility] {
        &self.facilities
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

/// Convert epoch milliseconds to a UTC timestamp.
pub fn datetime_from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
