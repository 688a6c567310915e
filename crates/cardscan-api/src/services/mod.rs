pub mod card_scan;

pub use card_scan::{CardScanService, ScanOutcome, UploadedFile};
