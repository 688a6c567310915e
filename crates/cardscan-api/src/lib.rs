//! Cardscan HTTP service
//!
//! Serves the card upload page, the JSON analyze endpoint and health probes.
//! The binary in `main.rs` loads configuration and hands it to [`setup`].

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod render;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{CardScanService, ScanOutcome, UploadedFile};
pub use state::AppState;
