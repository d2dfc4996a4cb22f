//! # Intake Triage
//!
//! Risk classification for public health intake submissions.
//!
//! This crate is a leaf: it holds the answers a respondent gives about their symptoms and
//! risk factors, and the weighted-sum rule that turns those answers into a [`RiskLevel`].
//!
//! - [`classify`] is pure and total. It performs no I/O and cannot fail.
//! - Every answer is optional. An unanswered question contributes nothing to the score.
//! - The score itself is internal; only the resulting level leaves this crate.
//!
//! **No storage or workflow concerns**: form steps, validation and the review store live in
//! `intake-core`.
//!
//! ## Example
//!
//! ```
//! use intake_triage::{classify, IntakeAnswers, RiskFactorAnswers, RiskLevel, Severity, SymptomAnswers};
//!
//! let answers = IntakeAnswers {
//!     symptoms: Some(SymptomAnswers {
//!         severity: Some(Severity::Severe),
//!         has_difficulty_breathing: Some(true),
//!         ..Default::default()
//!     }),
//!     risk_factors: Some(RiskFactorAnswers {
//!         recent_travel: Some(true),
//!         ..Default::default()
//!     }),
//! };
//!
//! assert_eq!(classify(&answers), RiskLevel::High);
//! ```

mod answers;
mod classifier;
mod risk_level;

pub use answers::{
    lenient, ContactWithSick, IntakeAnswers, RiskFactorAnswers, Severity, SymptomAnswers,
    NO_CONDITIONS,
};
pub use classifier::classify;
pub use risk_level::RiskLevel;

/// Errors raised when parsing triage vocabulary from text.
///
/// Classification itself never fails; these only arise at input boundaries such as CLI
/// flags or query strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriageParseError {
    #[error("unknown risk level: {0}")]
    RiskLevel(String),
    #[error("unknown symptom severity: {0}")]
    Severity(String),
    #[error("unknown contact answer: {0}")]
    Contact(String),
}
