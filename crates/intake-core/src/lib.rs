//! # Intake Core
//!
//! Core business logic for the public health intake portal.
//!
//! This crate contains the intake workflow and the review store:
//! - Form data, per-step validation and the step-by-step [`IntakeForm`]
//! - Submission stamping (risk level from `intake-triage`, initial review status)
//! - A file-backed [`ReviewStore`] for listing, filtering and updating submissions
//!
//! **No API concerns**: HTTP servers and CLI parsing belong in `api-rest` and `intake-cli`.

pub mod config;
pub mod constants;
pub mod form;
pub mod labels;
pub mod store;
pub mod submission;
pub mod validation;
pub mod workflow;

mod error;

pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_DIR;
pub use error::{IntakeError, IntakeResult};
pub use form::{
    AgeGroup, Consent, Demographics, IntakeFormData, Language, RiskFactorsSection,
    SymptomsSection,
};
pub use store::{ReviewFilter, ReviewStore, ReviewSummary};
pub use submission::{Derived, ReviewStatus, Submission};
pub use validation::ValidationErrors;
pub use workflow::{IntakeForm, IntakeStep};

// Re-export the classifier vocabulary so callers need only this crate.
pub use intake_triage::{
    classify, ContactWithSick, IntakeAnswers, RiskFactorAnswers, RiskLevel, Severity,
    SymptomAnswers,
};
