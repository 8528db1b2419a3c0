//! Global constants for the BILT application

/// File name of the downloaded export archive
pub const ARCHIVE_NAME: &str = "classifications.zip";

/// Upload batches larger than this get a confirmation prompt in the browser
pub const LARGE_BATCH_THRESHOLD: usize = 50;
