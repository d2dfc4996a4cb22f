//! The multi-step intake workflow.
//!
//! [`IntakeForm`] holds the answers collected so far and the step the respondent is on.
//! Moving forward validates the current step; moving back never does. Submitting from the
//! review step classifies the answers, stores the submission and clears the form.

use crate::form::{Consent, Demographics, IntakeFormData, RiskFactorsSection, SymptomsSection};
use crate::store::ReviewStore;
use crate::submission::Submission;
use crate::validation::{validate_all, validate_step, ValidationErrors};
use crate::{IntakeError, IntakeResult};
use chrono::{DateTime, Utc};
use intake_triage::{classify, RiskLevel};
use std::fmt;
use uuid::Uuid;

/// Steps of the intake, in the order a respondent visits them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntakeStep {
    #[default]
    Intro,
    Demographics,
    Symptoms,
    RiskFactors,
    Consent,
    Review,
    Confirmation,
}

impl IntakeStep {
    pub const ALL: [IntakeStep; 7] = [
        IntakeStep::Intro,
        IntakeStep::Demographics,
        IntakeStep::Symptoms,
        IntakeStep::RiskFactors,
        IntakeStep::Consent,
        IntakeStep::Review,
        IntakeStep::Confirmation,
    ];

    /// Steps that collect answers.
    pub const DATA_STEPS: [IntakeStep; 4] = [
        IntakeStep::Demographics,
        IntakeStep::Symptoms,
        IntakeStep::RiskFactors,
        IntakeStep::Consent,
    ];

    /// Position of the step, starting at zero.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The following step. Confirmation is last and stays put.
    pub fn next(self) -> Self {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(IntakeStep::Confirmation)
    }

    /// The preceding step. Intro is first and stays put.
    pub fn previous(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(IntakeStep::Intro)
    }

    pub fn is_data_step(self) -> bool {
        Self::DATA_STEPS.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntakeStep::Intro => "intro",
            IntakeStep::Demographics => "demographics",
            IntakeStep::Symptoms => "symptoms",
            IntakeStep::RiskFactors => "risk-factors",
            IntakeStep::Consent => "consent",
            IntakeStep::Review => "review",
            IntakeStep::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An intake in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntakeForm {
    step: IntakeStep,
    data: IntakeFormData,
}

impl IntakeForm {
    /// A blank intake on the intro step.
    pub fn new() -> Self {
        Self::default()
    }

    /// An intake whose answers were collected elsewhere, positioned on the review step
    /// ready to submit.
    pub fn at_review(data: IntakeFormData) -> Self {
        Self {
            step: IntakeStep::Review,
            data,
        }
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    pub fn data(&self) -> &IntakeFormData {
        &self.data
    }

    pub fn demographics_mut(&mut self) -> &mut Demographics {
        &mut self.data.demographics
    }

    pub fn symptoms_mut(&mut self) -> &mut SymptomsSection {
        &mut self.data.symptoms
    }

    pub fn risk_factors_mut(&mut self) -> &mut RiskFactorsSection {
        &mut self.data.risk_factors
    }

    pub fn consent_mut(&mut self) -> &mut Consent {
        &mut self.data.consent
    }

    /// Validate the current step and advance if it is complete.
    ///
    /// # Errors
    ///
    /// Returns the field errors of the current step; the step does not change.
    pub fn next_step(&mut self) -> Result<IntakeStep, ValidationErrors> {
        validate_step(self.step, &self.data).into_result()?;
        self.step = self.step.next();
        Ok(self.step)
    }

    /// Go back one step. Answers are kept.
    pub fn previous_step(&mut self) -> IntakeStep {
        self.step = self.step.previous();
        self.step
    }

    /// Jump back to a data step from the review step to change an answer.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidInput`] if `step` does not collect answers.
    pub fn edit(&mut self, step: IntakeStep) -> IntakeResult<()> {
        if !step.is_data_step() {
            return Err(IntakeError::InvalidInput(format!(
                "step {step} has no answers to edit"
            )));
        }
        self.step = step;
        Ok(())
    }

    /// Risk level the current answers would be stamped with, shown on the review step.
    pub fn risk_preview(&self) -> RiskLevel {
        classify(&self.data.answers())
    }

    /// Discard every answer and return to the intro step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Store the intake as a new submission with a fresh identifier and the current time.
    ///
    /// See [`IntakeForm::submit_with`].
    pub fn submit(&mut self, store: &ReviewStore) -> IntakeResult<Submission> {
        self.submit_with(store, Uuid::new_v4(), Utc::now())
    }

    /// Validate every step, classify, store the submission, then clear the form and move
    /// to the confirmation step.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::InvalidInput`] when not on the review step.
    /// - [`IntakeError::Validation`] when any data step is incomplete.
    /// - Any storage error from [`ReviewStore::append`]. The form is left untouched.
    pub fn submit_with(
        &mut self,
        store: &ReviewStore,
        id: Uuid,
        created_at: DateTime<Utc>,
    ) -> IntakeResult<Submission> {
        if self.step != IntakeStep::Review {
            return Err(IntakeError::InvalidInput(format!(
                "intake can only be submitted from the review step (currently on {})",
                self.step
            )));
        }

        validate_all(&self.data)
            .into_result()
            .map_err(IntakeError::Validation)?;

        let submission = Submission::stamp(self.data.clone(), id, created_at);
        store.append(&submission)?;

        tracing::info!(
            submission_id = %submission.id,
            risk_level = %submission.risk_level(),
            "intake submitted"
        );

        self.reset();
        self.step = IntakeStep::Confirmation;
        Ok(submission)
    }
}
