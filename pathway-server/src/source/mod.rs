//! Upstream facility status source.
//!
//! Fetches elevator and escalator status from accessibility.cloud, normalizes
//! it into [`NormalizedFacility`](crate::facility::NormalizedFacility)
//! records and feeds each fetch into the
//! [`SnapshotStore`](crate::store::SnapshotStore).

mod client;
mod error;
mod parse;
mod poll;

pub use client::EquipmentClient;
pub use error::SourceError;
pub use parse::parse_equipment_response;
pub use poll::{poll, poll_once};
