//! File-backed store of intake submissions for staff review.
//!
//! Every submission lives in one JSON array at [`CoreConfig::submissions_path`]. Each
//! mutation reads the whole array, changes it and writes it back through a scratch file
//! that is renamed into place, all while holding the store's lock.
//!
//! Reads for the dashboard listing are forgiving: a missing file is an empty store, and a
//! file that cannot be parsed is logged and shown as empty. Mutations are strict and refuse
//! to overwrite a file they could not parse.

use crate::config::CoreConfig;
use crate::constants::TEMP_FILE_SUFFIX;
use crate::submission::{ReviewStatus, Submission};
use crate::{IntakeError, IntakeResult};
use intake_triage::RiskLevel;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Dashboard filter. `None` matches everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub risk_level: Option<RiskLevel>,
    pub status: Option<ReviewStatus>,
}

impl ReviewFilter {
    /// Build a filter from dashboard selections, where `"all"` (or nothing) means no
    /// filtering on that field.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidInput`] for an unknown risk level or status.
    pub fn from_selection(risk: Option<&str>, status: Option<&str>) -> IntakeResult<Self> {
        let risk_level = parse_selection::<RiskLevel>(risk)
            .map_err(|e| IntakeError::InvalidInput(e.to_string()))?;
        let status = parse_selection::<ReviewStatus>(status)?;
        Ok(Self { risk_level, status })
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        let risk_ok = self
            .risk_level
            .map_or(true, |level| submission.risk_level() == level);
        let status_ok = self
            .status
            .map_or(true, |status| submission.status() == status);
        risk_ok && status_ok
    }
}

fn parse_selection<T: FromStr>(value: Option<&str>) -> Result<Option<T>, T::Err> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

/// Submission counts for the dashboard header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub total: usize,
    pub by_risk_level: BTreeMap<RiskLevel, usize>,
    pub by_status: BTreeMap<ReviewStatus, usize>,
}

impl ReviewSummary {
    fn tally(submissions: &[Submission]) -> Self {
        let mut by_risk_level: BTreeMap<RiskLevel, usize> =
            RiskLevel::ALL.into_iter().map(|level| (level, 0)).collect();
        let mut by_status: BTreeMap<ReviewStatus, usize> =
            ReviewStatus::ALL.into_iter().map(|status| (status, 0)).collect();

        for submission in submissions {
            *by_risk_level.entry(submission.risk_level()).or_default() += 1;
            *by_status.entry(submission.status()).or_default() += 1;
        }

        Self {
            total: submissions.len(),
            by_risk_level,
            by_status,
        }
    }
}

/// Store of submitted intakes.
#[derive(Debug)]
pub struct ReviewStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ReviewStore {
    /// Open the store described by `cfg`, creating its data directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::StorageDirCreation`] if the data directory cannot be created.
    pub fn new(cfg: Arc<CoreConfig>) -> IntakeResult<Self> {
        fs::create_dir_all(cfg.data_dir()).map_err(IntakeError::StorageDirCreation)?;

        let path = cfg.submissions_path();
        tracing::debug!("review store at {}", path.display());

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a new submission.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::InvalidInput`] if a submission with the same id is already stored.
    /// - Read, parse or write failures of the submissions file.
    pub fn append(&self, submission: &Submission) -> IntakeResult<()> {
        let _guard = self.guard()?;
        let mut submissions = self.read_all()?;

        if submissions.iter().any(|s| s.id == submission.id) {
            return Err(IntakeError::InvalidInput(format!(
                "submission {} already exists",
                submission.id
            )));
        }

        submissions.push(submission.clone());
        self.write_all(&submissions)
    }

    /// Submissions matching `filter`, newest first.
    ///
    /// Never fails: an unreadable store is logged and listed as empty.
    pub fn list(&self, filter: &ReviewFilter) -> Vec<Submission> {
        let mut submissions: Vec<Submission> = self
            .load_for_display()
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        submissions
    }

    /// Counts by risk level and status across every stored submission.
    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary::tally(&self.load_for_display())
    }

    /// Fetch a single submission.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::NotFound`] if no submission has this id.
    /// - Read or parse failures of the submissions file.
    pub fn get(&self, id: Uuid) -> IntakeResult<Submission> {
        let _guard = self.guard()?;
        self.read_all()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(IntakeError::NotFound(id))
    }

    /// Move a submission to a new review status and return the updated record.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::NotFound`] if no submission has this id.
    /// - Read, parse or write failures of the submissions file.
    pub fn update_status(&self, id: Uuid, status: ReviewStatus) -> IntakeResult<Submission> {
        let _guard = self.guard()?;
        let mut submissions = self.read_all()?;

        let submission = submissions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(IntakeError::NotFound(id))?;
        let previous = submission.derived.status;
        submission.derived.status = status;
        let updated = submission.clone();

        self.write_all(&submissions)?;

        tracing::info!(
            submission_id = %id,
            from = %previous,
            to = %status,
            "review status updated"
        );
        Ok(updated)
    }

    // ------------------------------------------------------------------------
    // File access (internal)
    // ------------------------------------------------------------------------

    fn guard(&self) -> IntakeResult<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| IntakeError::LockPoisoned)
    }

    fn load_for_display(&self) -> Vec<Submission> {
        let loaded = self.guard().and_then(|_guard| self.read_all());
        match loaded {
            Ok(submissions) => submissions,
            Err(e) => {
                tracing::warn!(
                    "failed to load submissions from {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Read every stored submission. Callers must hold the lock.
    fn read_all(&self) -> IntakeResult<Vec<Submission>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(IntakeError::FileRead(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut deserializer = serde_json::Deserializer::from_str(&contents);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_owned()
            } else {
                path
            };
            IntakeError::Deserialization {
                path,
                source: err.into_inner(),
            }
        })
    }

    /// Replace the stored array. Callers must hold the lock.
    fn write_all(&self, submissions: &[Submission]) -> IntakeResult<()> {
        let json =
            serde_json::to_string_pretty(submissions).map_err(IntakeError::Serialization)?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, json).map_err(IntakeError::FileWrite)?;
        fs::rename(&temp_path, &self.path).map_err(IntakeError::FileWrite)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TEMP_FILE_SUFFIX);
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::IntakeFormData;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use intake_triage::Severity;
    use tempfile::TempDir;

    fn test_cfg(data_dir: &Path) -> Arc<CoreConfig> {
        Arc::new(CoreConfig::new(data_dir.to_path_buf()).expect("CoreConfig::new should succeed"))
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn submission(severity: Option<Severity>, minutes: i64) -> Submission {
        let mut form = IntakeFormData::default();
        form.symptoms.answers.severity = severity;
        Submission::stamp(form, Uuid::new_v4(), base_time() + Duration::minutes(minutes))
    }

    #[test]
    fn new_creates_the_data_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("nested").join("intake");

        let store = ReviewStore::new(test_cfg(&data_dir)).expect("store should open");

        assert!(data_dir.is_dir());
        assert!(!store.path().exists());
    }

    #[test]
    fn missing_file_lists_as_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");

        assert!(store.list(&ReviewFilter::default()).is_empty());
        assert_eq!(store.summary().total, 0);
    }

    #[test]
    fn lists_newest_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");

        let oldest = submission(None, 0);
        let newest = submission(None, 20);
        let middle = submission(None, 10);
        for s in [&oldest, &newest, &middle] {
            store.append(s).expect("append should succeed");
        }

        let ids: Vec<Uuid> = store
            .list(&ReviewFilter::default())
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
    }

    #[test]
    fn filters_by_risk_and_status() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");

        let low = submission(Some(Severity::Mild), 0);
        let medium = submission(Some(Severity::Severe), 1);
        let closed_medium = submission(Some(Severity::Severe), 2);
        for s in [&low, &medium, &closed_medium] {
            store.append(s).expect("append should succeed");
        }
        store
            .update_status(closed_medium.id, ReviewStatus::Closed)
            .expect("status update should succeed");

        let medium_only = ReviewFilter::from_selection(Some("medium"), Some("all"))
            .expect("valid selection");
        assert_eq!(store.list(&medium_only).len(), 2);

        let open_medium =
            ReviewFilter::from_selection(Some("medium"), Some("new")).expect("valid selection");
        let listed = store.list(&open_medium);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, medium.id);

        let high = ReviewFilter::from_selection(Some("high"), None).expect("valid selection");
        assert!(store.list(&high).is_empty());
    }

    #[test]
    fn rejects_unknown_filter_values() {
        assert!(matches!(
            ReviewFilter::from_selection(Some("urgent"), None),
            Err(IntakeError::InvalidInput(_))
        ));
        assert!(matches!(
            ReviewFilter::from_selection(None, Some("archived")),
            Err(IntakeError::InvalidInput(_))
        ));
        assert_eq!(
            ReviewFilter::from_selection(Some("ALL"), Some("")).expect("all is valid"),
            ReviewFilter::default()
        );
    }

    #[test]
    fn update_status_persists_and_keeps_risk_level() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");
        let stored = submission(Some(Severity::Severe), 0);
        store.append(&stored).expect("append should succeed");

        let updated = store
            .update_status(stored.id, ReviewStatus::InReview)
            .expect("status update should succeed");
        assert_eq!(updated.status(), ReviewStatus::InReview);
        assert_eq!(updated.risk_level(), stored.risk_level());

        let reopened = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should reopen");
        let reread = reopened.get(stored.id).expect("submission should exist");
        assert_eq!(reread.status(), ReviewStatus::InReview);
        assert_eq!(reread.form, stored.form);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");
        let missing = Uuid::new_v4();

        assert!(matches!(store.get(missing), Err(IntakeError::NotFound(id)) if id == missing));
        assert!(matches!(
            store.update_status(missing, ReviewStatus::Closed),
            Err(IntakeError::NotFound(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");
        let stored = submission(None, 0);

        store.append(&stored).expect("first append should succeed");
        let err = store.append(&stored).expect_err("second append should fail");
        assert!(matches!(err, IntakeError::InvalidInput(_)));
        assert_eq!(store.summary().total, 1);
    }

    #[test]
    fn malformed_file_lists_empty_but_blocks_writes() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");
        fs::write(store.path(), r#"{"not": "an array"}"#).expect("write corrupt file");

        assert!(store.list(&ReviewFilter::default()).is_empty());

        let err = store
            .append(&submission(None, 0))
            .expect_err("append should refuse to overwrite");
        assert!(matches!(err, IntakeError::Deserialization { .. }));

        let contents = fs::read_to_string(store.path()).expect("read corrupt file");
        assert_eq!(contents, r#"{"not": "an array"}"#);
    }

    #[test]
    fn schema_errors_name_the_failing_field() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");
        let stored = submission(None, 0);
        store.append(&stored).expect("append should succeed");

        let contents = fs::read_to_string(store.path()).expect("read store");
        fs::write(store.path(), contents.replace("\"new\"", "\"escalated\""))
            .expect("write tampered file");

        match store.get(stored.id) {
            Err(IntakeError::Deserialization { path, .. }) => {
                assert!(path.contains("status"), "unexpected path {path}");
            }
            other => panic!("expected Deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn blank_selections_in_stored_records_still_list() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");
        let stored = submission(Some(Severity::Mild), 0);
        store.append(&stored).expect("append should succeed");

        let mut records: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).expect("read store"))
                .expect("stored json");
        records[0]["demographics"]["ageGroup"] = serde_json::json!("");
        records[0]["symptoms"]["onsetDate"] = serde_json::json!("");
        records[0]["consent"]["preferredLanguage"] = serde_json::json!("");
        fs::write(store.path(), records.to_string()).expect("write edited store");

        let listed = store.list(&ReviewFilter::default());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, stored.id);
        assert_eq!(listed[0].form.symptoms.onset_date, None);
        assert_eq!(store.summary().total, 1);
    }

    #[test]
    fn summary_counts_every_bucket() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open");
        let a = submission(Some(Severity::Mild), 0);
        let b = submission(Some(Severity::Severe), 1);
        let c = submission(Some(Severity::Severe), 2);
        for s in [&a, &b, &c] {
            store.append(s).expect("append should succeed");
        }
        store
            .update_status(a.id, ReviewStatus::Closed)
            .expect("status update should succeed");

        let summary = store.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_risk_level[&RiskLevel::Low], 1);
        assert_eq!(summary.by_risk_level[&RiskLevel::Medium], 2);
        assert_eq!(summary.by_risk_level[&RiskLevel::High], 0);
        assert_eq!(summary.by_status[&ReviewStatus::New], 2);
        assert_eq!(summary.by_status[&ReviewStatus::Closed], 1);
        assert_eq!(summary.by_status[&ReviewStatus::InReview], 0);
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store =
            Arc::new(ReviewStore::new(test_cfg(temp_dir.path())).expect("store should open"));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .append(&submission(None, i))
                        .expect("append should succeed");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("append thread panicked");
        }

        assert_eq!(store.summary().total, 8);
    }
}
