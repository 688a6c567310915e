//! Cardscan Document Intelligence Library
//!
//! Sends a readable image URL to the Azure Document Intelligence prebuilt
//! credit card model, waits for the long-running analysis to finish and
//! flattens the recognized fields into [`ExtractedFields`].
//!
//! [`ExtractedFields`]: cardscan_core::ExtractedFields

pub mod client;
pub mod error;
pub mod extractor;
pub mod models;

pub use client::DocumentIntelligenceClient;
pub use error::IntelligenceError;
pub use extractor::{DocumentAnalyzer, DocumentExtractor};
pub use models::{merge_documents, AnalyzeOperation, AnalyzeResult, OperationStatus};
