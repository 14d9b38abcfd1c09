//! Encoder error types.

/// Errors that abort encoding a snapshot.
///
/// Any of these rejects the whole snapshot; nothing partial is published.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// A facility has an empty id
    #[error("facility at index {index} has no id")]
    MissingFacilityId { index: usize },

    /// A facility is not linked to a pathway
    #[error("facility {facility_id} has no pathway id")]
    MissingPathwayId { facility_id: String },

    /// Fetch time cannot be expressed as unsigned POSIX seconds
    #[error("fetch time is before the unix epoch")]
    TimestampBeforeEpoch,

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing a buffer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EncodeError::MissingFacilityId { index: 3 };
        assert_eq!(err.to_string(), "facility at index 3 has no id");

        let err = EncodeError::MissingPathwayId {
            facility_id: "foo".into(),
        };
        assert_eq!(err.to_string(), "facility foo has no pathway id");
    }
}
