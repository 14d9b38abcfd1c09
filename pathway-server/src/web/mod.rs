//! Web layer serving the derived artifacts.
//!
//! `/feed`, `/pathway_evolutions.csv` and `/calendar_dates.csv` answer GET
//! and HEAD from the snapshot store, with etag and last-modified validators.

mod routes;
mod state;


pub use routes::{AppError, create_router};
pub use state::AppState;
