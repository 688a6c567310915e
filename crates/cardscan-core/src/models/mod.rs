//! Data models for the card scanning pipeline
//!
//! Every model here lives for a single upload-analyze-validate cycle and is
//! never persisted.

mod fields;
mod report;
mod upload;

pub use fields::*;
pub use report::*;
pub use upload::*;
