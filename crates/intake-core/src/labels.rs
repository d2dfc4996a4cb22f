//! Human-readable labels for stored codes.
//!
//! Unknown codes fall back to the code itself so that older or hand-edited records still
//! display.

use crate::submission::ReviewStatus;
use intake_triage::{ContactWithSick, RiskLevel};

const SYMPTOM_LABELS: &[(&str, &str)] = &[
    ("fever", "Fever"),
    ("cough", "Cough"),
    ("shortness_of_breath", "Shortness of breath"),
    ("sore_throat", "Sore throat"),
    ("fatigue", "Fatigue"),
    ("headache", "Headache"),
    ("loss_of_taste_smell", "Loss of taste or smell"),
    ("nausea", "Nausea or vomiting"),
    ("diarrhea", "Diarrhea"),
];

const CONDITION_LABELS: &[(&str, &str)] = &[
    ("none", "None reported"),
    ("heart_disease", "Heart disease"),
    ("lung_disease", "Lung disease (e.g., COPD, asthma)"),
    ("diabetes", "Diabetes"),
    ("kidney_disease", "Kidney disease"),
    ("liver_disease", "Liver disease"),
    ("cancer", "Cancer"),
    ("other", "Other chronic condition"),
];

fn lookup<'a>(table: &[(&str, &'static str)], code: &'a str) -> &'a str {
    table
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |(_, label)| *label)
}

pub fn symptom_label(code: &str) -> &str {
    lookup(SYMPTOM_LABELS, code)
}

pub fn condition_label(code: &str) -> &str {
    lookup(CONDITION_LABELS, code)
}

pub fn risk_label(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Low",
        RiskLevel::Medium => "Medium",
        RiskLevel::High => "High",
    }
}

pub fn status_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::New => "New",
        ReviewStatus::InReview => "In review",
        ReviewStatus::Closed => "Closed",
    }
}

/// `Yes` / `No` / `Not answered`.
pub fn yes_no(answer: Option<bool>) -> &'static str {
    match answer {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Not answered",
    }
}

pub fn contact_label(answer: Option<ContactWithSick>) -> &'static str {
    match answer {
        Some(ContactWithSick::Yes) => "Yes",
        Some(ContactWithSick::No) => "No",
        Some(ContactWithSick::Unsure) => "Unsure",
        None => "Not answered",
    }
}

/// Join the labels of `codes`, or `empty` when there are none.
pub fn join_labels<'a, I>(codes: I, label: fn(&str) -> &str, empty: &str) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let labels: Vec<&str> = codes.into_iter().map(|c| label(c)).collect();
    if labels.is_empty() {
        empty.to_owned()
    } else {
        labels.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn known_codes_have_labels() {
        assert_eq!(symptom_label("loss_of_taste_smell"), "Loss of taste or smell");
        assert_eq!(condition_label("none"), "None reported");
        assert_eq!(status_label(ReviewStatus::InReview), "In review");
        assert_eq!(risk_label(RiskLevel::High), "High");
    }

    #[test]
    fn unknown_codes_fall_back_to_the_code() {
        assert_eq!(symptom_label("rash"), "rash");
        assert_eq!(condition_label("asthma_severe"), "asthma_severe");
    }

    #[test]
    fn tri_state_answers_render() {
        assert_eq!(yes_no(None), "Not answered");
        assert_eq!(yes_no(Some(false)), "No");
        assert_eq!(contact_label(Some(ContactWithSick::Unsure)), "Unsure");
    }

    #[test]
    fn joins_labels_in_code_order() {
        let codes: BTreeSet<String> = ["fever", "cough"].into_iter().map(String::from).collect();
        assert_eq!(
            join_labels(&codes, symptom_label, "None selected"),
            "Cough, Fever"
        );
        assert_eq!(
            join_labels(&BTreeSet::new(), symptom_label, "None selected"),
            "None selected"
        );
    }
}
