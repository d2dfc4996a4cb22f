//! Stored intake submissions.
//!
//! A submission is the completed form plus the fields stamped on it at submit time: an
//! identifier, a creation timestamp and the `derived` block (risk level and review status).
//! The risk level is computed once, when the submission is created, and is only read back
//! afterwards.

use crate::form::IntakeFormData;
use crate::IntakeError;
use chrono::{DateTime, Utc};
use intake_triage::{classify, RiskLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub form: IntakeFormData,
    pub derived: Derived,
}

impl Submission {
    /// Classify `form` and wrap it as a new submission awaiting review.
    pub fn stamp(form: IntakeFormData, id: Uuid, created_at: DateTime<Utc>) -> Self {
        let risk_level = classify(&form.answers());
        Self {
            id,
            created_at,
            form,
            derived: Derived {
                risk_level,
                status: ReviewStatus::New,
            },
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.derived.risk_level
    }

    pub fn status(&self) -> ReviewStatus {
        self.derived.status
    }

    /// Respondent's name as entered, for listings.
    pub fn display_name(&self) -> String {
        let demographics = &self.form.demographics;
        format!(
            "{} {}",
            demographics.first_name.trim(),
            demographics.last_name.trim()
        )
        .trim()
        .to_owned()
    }
}

/// Fields computed by the system rather than entered by the respondent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Derived {
    pub risk_level: RiskLevel,
    pub status: ReviewStatus,
}

/// Staff workflow state of a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    New,
    InReview,
    Closed,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::New,
        ReviewStatus::InReview,
        ReviewStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::New => "new",
            ReviewStatus::InReview => "in_review",
            ReviewStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "new" => Ok(ReviewStatus::New),
            "in_review" => Ok(ReviewStatus::InReview),
            "closed" => Ok(ReviewStatus::Closed),
            other => Err(IntakeError::InvalidInput(format!(
                "unknown review status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use intake_triage::Severity;
    use serde_json::json;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn stamping_classifies_and_marks_new() {
        let mut form = IntakeFormData::default();
        form.symptoms.answers.severity = Some(Severity::Severe);
        form.symptoms.answers.has_difficulty_breathing = Some(true);
        form.risk_factors.answers.is_pregnant = Some(true);

        let submission = Submission::stamp(form, Uuid::new_v4(), created_at());

        assert_eq!(submission.risk_level(), RiskLevel::High);
        assert_eq!(submission.status(), ReviewStatus::New);
    }

    #[test]
    fn serialises_flat_record_with_derived_block() {
        let id = Uuid::parse_str("7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88").expect("uuid");
        let submission = Submission::stamp(IntakeFormData::default(), id, created_at());

        let value = serde_json::to_value(&submission).expect("serialise submission");
        assert_eq!(value["id"], json!("7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88"));
        assert_eq!(value["createdAt"], json!("2026-10-17T09:30:00Z"));
        assert_eq!(value["derived"], json!({ "riskLevel": "low", "status": "new" }));
        assert!(value.get("demographics").is_some());
        assert!(value.get("riskFactors").is_some());

        let reparsed: Submission = serde_json::from_value(value).expect("reparse submission");
        assert_eq!(reparsed, submission);
    }

    #[test]
    fn parses_status_codes() {
        assert_eq!(
            "in_review".parse::<ReviewStatus>().expect("parse"),
            ReviewStatus::InReview
        );
        assert_eq!(
            "In-Review".parse::<ReviewStatus>().expect("parse"),
            ReviewStatus::InReview
        );
        assert!(matches!(
            "archived".parse::<ReviewStatus>(),
            Err(IntakeError::InvalidInput(_))
        ));
    }

    #[test]
    fn display_name_tolerates_missing_parts() {
        let mut submission =
            Submission::stamp(IntakeFormData::default(), Uuid::new_v4(), created_at());
        assert_eq!(submission.display_name(), "");

        submission.form.demographics.first_name = "Grace".into();
        assert_eq!(submission.display_name(), "Grace");

        submission.form.demographics.last_name = " Hopper ".into();
        assert_eq!(submission.display_name(), "Grace Hopper");
    }
}
