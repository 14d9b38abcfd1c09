//! Snapshot store.
//!
//! Holds the artifacts of the latest snapshot. An update encodes all three
//! artifacts off to the side and publishes them with a single pointer swap,
//! so readers never see artifacts from two different snapshots and never
//! wait on the writer.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::cache::{ArtifactKind, CachedArtifact};
use crate::encode::{
    EncodeError, encode_calendar_dates, encode_feed, encode_pathway_evolutions, pathway_states,
};
use crate::facility::{NormalizedFacility, Snapshot};

/// The artifact triple derived from one snapshot.
#[derive(Debug)]
pub struct Published {
    pub fetched_at: DateTime<Utc>,
    pub facility_count: usize,
    pub pathway_count: usize,
    feed: Arc<CachedArtifact>,
    pathway_evolutions: Arc<CachedArtifact>,
    calendar_dates: Arc<CachedArtifact>,
}

impl Published {
    /// Encode every artifact for a snapshot. Fails as a whole.
    pub fn build(snapshot: &Snapshot) -> Result<Self, EncodeError> {
        let fetched_at = snapshot.fetched_at();
        let pathway_count = pathway_states(snapshot)?.len();

        let feed = encode_feed(snapshot)?;
        let pathway_evolutions = encode_pathway_evolutions(snapshot)?;
        let calendar_dates = encode_calendar_dates(snapshot)?;

        Ok(Self {
            fetched_at,
            facility_count: snapshot.len(),
            pathway_count,
            feed: Arc::new(CachedArtifact::new(ArtifactKind::Feed, feed, fetched_at)),
            pathway_evolutions: Arc::new(CachedArtifact::new(
                ArtifactKind::PathwayEvolutions,
                pathway_evolutions,
                fetched_at,
            )),
            calendar_dates: Arc::new(CachedArtifact::new(
                ArtifactKind::CalendarDates,
                calendar_dates,
                fetched_at,
            )),
        })
    }

    pub fn artifact(&self, kind: ArtifactKind) -> &Arc<CachedArtifact> {
        match kind {
            ArtifactKind::Feed => &self.feed,
            ArtifactKind::PathwayEvolutions => &self.pathway_evolutions,
            ArtifactKind::CalendarDates => &self.calendar_dates,
        }
    }
}

/// Owner of the live snapshot's artifacts.
///
/// Starts empty; nothing is served until the first successful update.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: ArcSwapOption<Published>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the live snapshot.
    ///
    /// On error the previously published artifacts stay live.
    pub fn update(
        &self,
        facilities: Vec<NormalizedFacility>,
        fetched_at: DateTime<Utc>,
    ) -> Result<Arc<Published>, EncodeError> {
        self.publish(&Snapshot::new(facilities, fetched_at))
    }

    /// Encode and publish an already built snapshot.
    pub fn publish(&self, snapshot: &Snapshot) -> Result<Arc<Published>, EncodeError> {
        let published = match Published::build(snapshot) {
            Ok(published) => Arc::new(published),
            Err(e) => {
                warn!(error = %e, fetched_at = %snapshot.fetched_at(), "rejected snapshot");
                return Err(e);
            }
        };

        self.current.store(Some(published.clone()));

        info!(
            facilities = published.facility_count,
            pathways = published.pathway_count,
            fetched_at = %published.fetched_at,
            feed_etag = %published.artifact(ArtifactKind::Feed).etag,
            "published snapshot"
        );

        Ok(published)
    }

    /// The live artifact triple, or `None` before the first update.
    pub fn current(&self) -> Option<Arc<Published>> {
        self.current.load_full()
    }

    /// One artifact of the live snapshot, or `None` before the first update.
    pub fn current_artifact(&self, kind: ArtifactKind) -> Option<Arc<CachedArtifact>> {
        self.current().map(|p| p.artifact(kind).clone())
    }

    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::facility::datetime_from_millis;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn sample() -> Vec<NormalizedFacility> {
        vec![
            NormalizedFacility::new("foo", "p1", true, at("2021-10-10T10:10:00+01:00")),
            NormalizedFacility::new("bar", "p2", false, at("2021-09-09T09:09:00+01:00")),
        ]
    }

    #[test]
    fn empty_until_first_update() {
        let store = SnapshotStore::new();
        assert!(!store.is_ready());
        for kind in ArtifactKind::ALL {
            assert!(store.current_artifact(kind).is_none());
        }
    }

    #[test]
    fn update_publishes_all_three() {
        let store = SnapshotStore::new();
        let fetched_at = at("2021-11-11T11:11:00+01:00");
        store.update(sample(), fetched_at).unwrap();

        for kind in ArtifactKind::ALL {
            let artifact = store.current_artifact(kind).unwrap();
            assert_eq!(artifact.kind, kind);
            assert_eq!(artifact.last_modified, fetched_at);
        }
        let current = store.current().unwrap();
        assert_eq!(current.facility_count, 2);
        assert_eq!(current.pathway_count, 2);
    }

    #[test]
    fn same_content_keeps_csv_etags_and_moves_last_modified() {
        let store = SnapshotStore::new();
        let first = store
            .update(sample(), at("2021-11-11T11:11:00+01:00"))
            .unwrap();
        let second = store
            .update(sample(), at("2021-11-23T15:16:00+01:00"))
            .unwrap();

        for kind in [ArtifactKind::PathwayEvolutions, ArtifactKind::CalendarDates] {
            assert_eq!(first.artifact(kind).bytes, second.artifact(kind).bytes);
            assert_eq!(first.artifact(kind).etag, second.artifact(kind).etag);
        }
        for kind in ArtifactKind::ALL {
            assert_ne!(
                first.artifact(kind).last_modified_header(),
                second.artifact(kind).last_modified_header()
            );
        }
        // The feed header carries the fetch time, so its bytes differ.
        assert_ne!(
            first.artifact(ArtifactKind::Feed).etag,
            second.artifact(ArtifactKind::Feed).etag
        );
    }

    #[test]
    fn failed_update_keeps_previous_snapshot() {
        let store = SnapshotStore::new();
        let good = store
            .update(sample(), at("2021-11-11T11:11:00+01:00"))
            .unwrap();

        let mut bad = sample();
        bad[1].id.clear();
        let err = store.update(bad, at("2021-11-23T15:16:00+01:00"));
        assert!(matches!(err, Err(EncodeError::MissingFacilityId { index: 1 })));

        let current = store.current().unwrap();
        assert!(Arc::ptr_eq(&current, &good));
    }

    #[test]
    fn empty_snapshot_publishes() {
        let store = SnapshotStore::new();
        store.update(Vec::new(), Utc::now()).unwrap();
        let csv = store
            .current_artifact(ArtifactKind::PathwayEvolutions)
            .unwrap();
        assert_eq!(
            csv.bytes,
            &b"pathway_id,service_id,start_time,end_time,is_closed,direction\n"[..]
        );
    }

    fn facility_strategy() -> impl Strategy<Value = NormalizedFacility> {
        ("[a-z0-9]{1,8}", "p[0-9]{1,2}", any::<bool>()).prop_map(|(id, pathway, working)| {
            NormalizedFacility::new(id, pathway, working, DateTime::<Utc>::UNIX_EPOCH)
        })
    }

    proptest! {
        #[test]
        fn encoding_is_deterministic(
            facilities in prop::collection::vec(facility_strategy(), 0..40),
            fetched_ms in 0i64..4_000_000_000_000,
        ) {
            let fetched_at = datetime_from_millis(fetched_ms).unwrap();
            let snapshot = Snapshot::new(facilities, fetched_at);

            let a = Published::build(&snapshot).unwrap();
            let b = Published::build(&snapshot).unwrap();
            for kind in ArtifactKind::ALL {
                prop_assert_eq!(&a.artifact(kind).bytes, &b.artifact(kind).bytes);
                prop_assert_eq!(&a.artifact(kind).etag, &b.artifact(kind).etag);
            }
        }
    }
}
