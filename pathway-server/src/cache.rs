//! Cached artifacts and their HTTP validators.
//!
//! Each artifact carries an entity tag fingerprinting its bytes and a
//! last-modified time taken from the snapshot's fetch time. Two snapshots
//! that encode to the same bytes therefore share an etag even when fetched
//! at different times, while last-modified always moves forward.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use chrono::{DateTime, SubsecRound, Utc};
use sha2::{Digest, Sha256};

/// Number of base64 hash characters kept in an etag.
const ETAG_HASH_LEN: usize = 27;

/// The three artifacts derived from every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// GTFS-realtime protobuf feed
    Feed,
    /// `pathway_evolutions.csv`
    PathwayEvolutions,
    /// `calendar_dates.csv`
    CalendarDates,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Feed,
        ArtifactKind::PathwayEvolutions,
        ArtifactKind::CalendarDates,
    ];

    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactKind::Feed => "application/octet-stream",
            ArtifactKind::PathwayEvolutions | ArtifactKind::CalendarDates => "text/csv",
        }
    }

    /// Route path the artifact is served under.
    pub fn path(self) -> &'static str {
        match self {
            ArtifactKind::Feed => "/feed",
            ArtifactKind::PathwayEvolutions => "/pathway_evolutions.csv",
            ArtifactKind::CalendarDates => "/calendar_dates.csv",
        }
    }
}

/// Encoded bytes of one artifact plus the validators served with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArtifact {
    pub kind: ArtifactKind,
    pub bytes: Bytes,
    pub etag: String,
    pub last_modified: DateTime<Utc>,
}

impl CachedArtifact {
    pub fn new(kind: ArtifactKind, bytes: Vec<u8>, fetched_at: DateTime<Utc>) -> Self {
        let etag = compute_etag(&bytes);
        Self {
            kind,
            bytes: Bytes::from(bytes),
            etag,
            last_modified: fetched_at.trunc_subsecs(0),
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    pub fn content_length(&self) -> usize {
        self.bytes.len()
    }

    /// `Last-Modified` header value.
    pub fn last_modified_header(&self) -> String {
        http_date(self.last_modified)
    }
}

/// Strong, quoted entity tag for a body: hex length and truncated base64 SHA-256.
pub fn compute_etag(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let hash = STANDARD.encode(digest);
    format!("\"{:x}-{}\"", bytes.len(), &hash[..ETAG_HASH_LEN])
}

/// Format a timestamp as an HTTP IMF-fixdate.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
