//! Weighted-sum risk classifier.
//!
//! Each rule below is checked independently and adds its points to a running score;
//! several rules can fire for the same intake. The score is then mapped onto a
//! [`RiskLevel`] by [`RiskLevel::from_score`].

use crate::{ContactWithSick, IntakeAnswers, RiskFactorAnswers, RiskLevel, Severity, SymptomAnswers};

const SEVERE_POINTS: u32 = 3;
const MODERATE_POINTS: u32 = 2;
const DIFFICULTY_BREATHING_POINTS: u32 = 3;

/// Symptom count that earns the first bump, and the count that earns a second one.
const MANY_SYMPTOMS: usize = 3;
const VERY_MANY_SYMPTOMS: usize = 5;
const SYMPTOM_COUNT_POINTS: u32 = 1;

const CHRONIC_CONDITIONS_POINTS: u32 = 2;
const IMMUNOCOMPROMISED_POINTS: u32 = 3;
const PREGNANT_POINTS: u32 = 1;
const RECENT_TRAVEL_POINTS: u32 = 1;
const CONTACT_WITH_SICK_POINTS: u32 = 2;

/// Classify an intake into a [`RiskLevel`].
///
/// Pure and total: missing sections and unanswered questions contribute nothing, so an
/// empty [`IntakeAnswers`] classifies as [`RiskLevel::Low`].
pub fn classify(answers: &IntakeAnswers) -> RiskLevel {
    RiskLevel::from_score(score(answers))
}

pub(crate) fn score(answers: &IntakeAnswers) -> u32 {
    let symptoms = answers.symptoms.as_ref().map_or(0, symptom_points);
    let risk_factors = answers.risk_factors.as_ref().map_or(0, risk_factor_points);
    symptoms + risk_factors
}

fn symptom_points(symptoms: &SymptomAnswers) -> u32 {
    let mut points = match symptoms.severity {
        Some(Severity::Severe) => SEVERE_POINTS,
        Some(Severity::Moderate) => MODERATE_POINTS,
        Some(Severity::Mild) | None => 0,
    };

    if symptoms.has_difficulty_breathing == Some(true) {
        points += DIFFICULTY_BREATHING_POINTS;
    }

    let count = symptoms.symptom_count();
    if count >= MANY_SYMPTOMS {
        points += SYMPTOM_COUNT_POINTS;
    }
    if count >= VERY_MANY_SYMPTOMS {
        points += SYMPTOM_COUNT_POINTS;
    }

    points
}

fn risk_factor_points(risk: &RiskFactorAnswers) -> u32 {
    let mut points = 0;

    if risk.has_chronic_conditions() {
        points += CHRONIC_CONDITIONS_POINTS;
    }
    if risk.is_immunocompromised == Some(true) {
        points += IMMUNOCOMPROMISED_POINTS;
    }
    if risk.is_pregnant == Some(true) {
        points += PREGNANT_POINTS;
    }
    if risk.recent_travel == Some(true) {
        points += RECENT_TRAVEL_POINTS;
    }
    // "Unsure" is deliberately not a yes.
    if risk.recent_contact_with_sick == Some(ContactWithSick::Yes) {
        points += CONTACT_WITH_SICK_POINTS;
    }

    points
}
