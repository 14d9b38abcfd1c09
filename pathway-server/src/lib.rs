//! Accessibility pathway feed server.
//!
//! Republishes live elevator and escalator status as a GTFS-realtime feed
//! and as CSV tables extending the static GTFS pathways dataset.

pub mod cache;
pub mod config;
pub mod encode;
pub mod facility;
pub mod source;
pub mod store;
pub mod web;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}
