//! Per-step validation of intake answers.
//!
//! Each data step has a validator returning a map from field key (the camelCase wire
//! name) to a message for the respondent. An empty map means the step is complete.

use crate::form::{
    Consent, Demographics, IntakeFormData, Language, RiskFactorsSection, SymptomsSection,
};
use crate::workflow::IntakeStep;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field-level validation failures, keyed by wire field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_owned(), message.to_owned());
    }

    fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when empty, otherwise the errors themselves.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// Step validators
// ============================================================================

/// Validate the answers collected on `step`. Steps without answers always pass.
pub fn validate_step(step: IntakeStep, data: &IntakeFormData) -> ValidationErrors {
    match step {
        IntakeStep::Demographics => validate_demographics(&data.demographics),
        IntakeStep::Symptoms => validate_symptoms(&data.symptoms),
        IntakeStep::RiskFactors => validate_risk_factors(&data.risk_factors),
        IntakeStep::Consent => validate_consent(&data.consent),
        IntakeStep::Intro | IntakeStep::Review | IntakeStep::Confirmation => {
            ValidationErrors::new()
        }
    }
}

/// Validate every data step at once, as done before a submission is stored.
pub fn validate_all(data: &IntakeFormData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for step in IntakeStep::DATA_STEPS {
        errors.merge(validate_step(step, data));
    }
    errors
}

pub fn validate_demographics(demographics: &Demographics) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if demographics.first_name.trim().is_empty() {
        errors.add("firstName", "First name is required.");
    }
    if demographics.last_name.trim().is_empty() {
        errors.add("lastName", "Last name is required.");
    }
    if demographics.zip_code.trim().is_empty() {
        errors.add("zipCode", "ZIP code is required.");
    }

    let email = demographics.email.trim();
    if email.is_empty() {
        errors.add("email", "Email is required.");
    } else if !is_plausible_email(email) {
        errors.add("email", "Enter a valid email address.");
    }

    errors
}

pub fn validate_symptoms(symptoms: &SymptomsSection) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if symptoms.answers.symptom_list.is_empty() {
        errors.add("symptoms", "Select at least one symptom.");
    }
    if symptoms.onset_date.is_none() {
        errors.add("onsetDate", "Symptom onset date is required.");
    }
    if symptoms.answers.severity.is_none() {
        errors.add("severity", "Select your overall symptom severity.");
    }
    if symptoms.answers.has_difficulty_breathing.is_none() {
        errors.add(
            "hasDifficultyBreathing",
            "Please indicate if you are having difficulty breathing.",
        );
    }

    errors
}

/// Pregnancy is optional; every other risk-factor question must be answered.
pub fn validate_risk_factors(risk_factors: &RiskFactorsSection) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let answers = &risk_factors.answers;

    if answers.conditions.is_empty() {
        errors.add(
            "conditions",
            "Select at least one option for underlying conditions.",
        );
    }
    if answers.is_immunocompromised.is_none() {
        errors.add(
            "isImmunocompromised",
            "Please indicate if you are immunocompromised.",
        );
    }

    match answers.recent_travel {
        None => errors.add(
            "recentTravel",
            "Please indicate if you have traveled recently.",
        ),
        Some(true) if risk_factors.recent_travel_details.trim().is_empty() => errors.add(
            "recentTravelDetails",
            "Please provide details about your recent travel.",
        ),
        Some(_) => {}
    }

    if answers.recent_contact_with_sick.is_none() {
        errors.add(
            "recentContactWithSick",
            "Please indicate if you have been in contact with someone who is sick, or select 'Unsure'.",
        );
    }

    errors
}

/// Data-use consent must be given, not merely answered.
pub fn validate_consent(consent: &Consent) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match consent.agrees_to_data_use {
        None => errors.add(
            "agreesToDataUse",
            "Please indicate if you agree to the use of your information for public health assessment.",
        ),
        Some(false) => errors.add(
            "agreesToDataUse",
            "You must agree to data use in order to submit this form.",
        ),
        Some(true) => {}
    }

    if consent.agrees_to_follow_up.is_none() {
        errors.add(
            "agreesToFollowUp",
            "Please indicate if public health staff may contact you for follow-up.",
        );
    }

    match consent.preferred_language {
        None => errors.add(
            "preferredLanguage",
            "Please select your preferred language.",
        ),
        Some(Language::Other) if consent.preferred_language_other.trim().is_empty() => {
            errors.add(
                "preferredLanguageOther",
                "Please specify your preferred language.",
            )
        }
        Some(_) => {}
    }

    errors
}

/// Loose `local@domain.tld` shape check: no whitespace, exactly one `@`, and a dot in the
/// domain with text on both sides of it.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
