//! GTFS-realtime feed encoder.

use prost::Message;

use crate::facility::Snapshot;
use crate::gtfs_rt::{
    FeedEntity, FeedHeader, FeedMessage, PathwaySelector, PathwayUpdate,
    feed_header::Incrementality,
};

use super::{EncodeError, pathway_states};

/// Protocol version written into every feed header.
pub const GTFS_RT_VERSION: &str = "2.0";

/// Build the feed message: one entity per distinct pathway.
pub fn build_feed(snapshot: &Snapshot) -> Result<FeedMessage, EncodeError> {
    let timestamp = u64::try_from(snapshot.fetched_at().timestamp())
        .map_err(|_| EncodeError::TimestampBeforeEpoch)?;

    let entity = pathway_states(snapshot)?
        .into_iter()
        .enumerate()
        .map(|(i, state)| FeedEntity {
            id: format!("e{i}"),
            is_deleted: None,
            pathway_update: Some(PathwayUpdate {
                pathway_selector: PathwaySelector {
                    pathway_id: state.pathway_id.to_string(),
                },
                is_closed: Some(state.is_closed),
            }),
        })
        .collect();

    Ok(FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: GTFS_RT_VERSION.to_string(),
            incrementality: Some(Incrementality::FullDataset as i32),
            timestamp: Some(timestamp),
            feed_version: None,
        },
        entity,
    })
}

/// Encode the feed message to protobuf bytes.
pub fn encode_feed(snapshot: &Snapshot) -> Result<Vec<u8>, EncodeError> {
    Ok(build_feed(snapshot)?.encode_to_vec())
}
