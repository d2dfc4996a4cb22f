//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services,
//! so request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_DATA_DIR, SUBMISSIONS_FILENAME};
use crate::{IntakeError, IntakeResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidInput`] if `data_dir` is empty.
    pub fn new(data_dir: PathBuf) -> IntakeResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(IntakeError::InvalidInput(
                "data_dir cannot be empty".into(),
            ));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the JSON file holding every stored submission.
    pub fn submissions_path(&self) -> PathBuf {
        self.data_dir.join(SUBMISSIONS_FILENAME)
    }
}

/// Resolve the data directory from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_data_dir() {
        let err = CoreConfig::new(PathBuf::new()).expect_err("empty dir should be rejected");
        assert!(matches!(err, IntakeError::InvalidInput(_)));
    }

    #[test]
    fn submissions_file_lives_in_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/srv/intake")).expect("valid config");
        assert_eq!(
            cfg.submissions_path(),
            PathBuf::from("/srv/intake").join(SUBMISSIONS_FILENAME)
        );
    }

    #[test]
    fn env_value_falls_back_to_default() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some(" /data/intake ".into())),
            PathBuf::from("/data/intake")
        );
    }
}
