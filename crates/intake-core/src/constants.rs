//! Constants used throughout the intake core crate.

/// Default directory for intake data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "intake_data";

/// Filename of the JSON array holding every stored submission.
pub const SUBMISSIONS_FILENAME: &str = "intake_submissions.json";

/// Suffix of the scratch file written before it is renamed over the submissions file.
pub const TEMP_FILE_SUFFIX: &str = "tmp";
