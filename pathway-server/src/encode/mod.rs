//! Artifact encoders.
//!
//! Pure functions from a [`Snapshot`] to the bytes of each served artifact.
//! All of them share one closure derivation: a pathway is closed when any
//! facility backing it is not working. Pathways keep the order in which they
//! first appear in the snapshot, so output is byte-stable across re-encodes.

mod error;
mod feed;
mod tables;

use std::collections::HashMap;

use crate::facility::Snapshot;

pub use error::EncodeError;
pub use feed::{GTFS_RT_VERSION, build_feed, encode_feed};
pub use tables::{
    CALENDAR_DATES_HEADER, PATHWAY_EVOLUTIONS_HEADER, encode_calendar_dates,
    encode_pathway_evolutions,
};

/// Derived usability of one pathway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayState<'a> {
    pub pathway_id: &'a str,
    pub is_closed: bool,
}

/// Collapse facilities into one state per distinct pathway.
///
/// Fails on facilities without an id or pathway id.
pub fn pathway_states(snapshot: &Snapshot) -> Result<Vec<PathwayState<'_>>, EncodeError> {
    let mut states: Vec<PathwayState<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (i, facility) in snapshot.facilities().iter().enumerate() {
        if facility.id.trim().is_empty() {
            return Err(EncodeError::MissingFacilityId { index: i });
        }
        if facility.pathway_id.trim().is_empty() {
            return Err(EncodeError::MissingPathwayId {
                facility_id: facility.id.clone(),
            });
        }

        let pathway_id = facility.pathway_id.as_str();
        match index.get(pathway_id) {
            Some(&pos) => states[pos].is_closed |= !facility.is_working,
            None => {
                index.insert(pathway_id, states.len());
                states.push(PathwayState {
                    pathway_id,
                    is_closed: !facility.is_working,
                });
            }
        }
    }

    Ok(states)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::facility::NormalizedFacility;

    fn facility(id: &str, pathway: &str, working: bool) -> NormalizedFacility {
        NormalizedFacility::new(id, pathway, working, Utc::now())
    }

    #[test]
    fn keeps_first_seen_order() {
        let snapshot = Snapshot::new(
            vec![
                facility("a", "p3", true),
                facility("b", "p1", true),
                facility("c", "p3", true),
                facility("d", "p2", true),
            ],
            Utc::now(),
        );

        let ids: Vec<_> = pathway_states(&snapshot)
            .unwrap()
            .iter()
            .map(|s| s.pathway_id)
            .collect();
        assert_eq!(ids, ["p3", "p1", "p2"]);
    }

    #[test]
    fn any_broken_facility_closes_pathway() {
        let snapshot = Snapshot::new(
            vec![
                facility("a", "p1", true),
                facility("b", "p1", false),
                facility("c", "p1", true),
                facility("d", "p2", true),
            ],
            Utc::now(),
        );

        let states = pathway_states(&snapshot).unwrap();
        assert_eq!(states.len(), 2);
        assert!(states[0].is_closed);
        assert!(!states[1].is_closed);
    }

    #[test]
    fn empty_snapshot_has_no_pathways() {
        let snapshot = Snapshot::new(Vec::new(), Utc::now());
        assert!(pathway_states(&snapshot).unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_ids() {
        let snapshot = Snapshot::new(
            vec![facility("a", "p1", true), facility("", "p2", true)],
            Utc::now(),
        );
        assert!(matches!(
            pathway_states(&snapshot),
            Err(EncodeError::MissingFacilityId { index: 1 })
        ));

        let snapshot = Snapshot::new(vec![facility("a", " ", true)], Utc::now());
        assert!(matches!(
            pathway_states(&snapshot),
            Err(EncodeError::MissingPathwayId { .. })
        ));
    }
}
