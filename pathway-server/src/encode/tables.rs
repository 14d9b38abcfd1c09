//! CSV encoders extending the static GTFS pathways dataset.
//!
//! `pathway_evolutions.csv` lists each pathway with its current closure.
//! `calendar_dates.csv` must exist for consumers of that format but carries
//! no rows, since a snapshot says nothing about service days.

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use crate::facility::Snapshot;

use super::{EncodeError, pathway_states};

pub const PATHWAY_EVOLUTIONS_HEADER: [&str; 6] = [
    "pathway_id",
    "service_id",
    "start_time",
    "end_time",
    "is_closed",
    "direction",
];

pub const CALENDAR_DATES_HEADER: [&str; 3] = ["service_id", "date", "exception_type"];

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>, EncodeError> {
    writer
        .into_inner()
        .map_err(|e| EncodeError::Io(e.into_error()))
}

/// One row per distinct pathway, in feed entity order.
///
/// Only `pathway_id` and `is_closed` are filled; the snapshot has no data
/// for the other columns.
pub fn encode_pathway_evolutions(snapshot: &Snapshot) -> Result<Vec<u8>, EncodeError> {
    let states = pathway_states(snapshot)?;

    let mut wtr = writer();
    wtr.write_record(PATHWAY_EVOLUTIONS_HEADER)?;
    for state in states {
        let is_closed = if state.is_closed { "1" } else { "0" };
        wtr.write_record([state.pathway_id, "", "", "", is_closed, ""])?;
    }
    finish(wtr)
}

/// Header row only.
pub fn encode_calendar_dates(_snapshot: &Snapshot) -> Result<Vec<u8>, EncodeError> {
    let mut wtr = writer();
    wtr.write_record(CALENDAR_DATES_HEADER)?;
    finish(wtr)
}
