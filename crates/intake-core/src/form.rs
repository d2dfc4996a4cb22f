//! Intake form data, section by section.
//!
//! The symptom and risk-factor sections embed the classifier's answer records and add the
//! free-text details the classifier does not look at. On the wire every key is camelCase
//! and the embedded answers are flattened into their section, so a stored form reads the
//! same as the record the portal has always kept.

use chrono::NaiveDate;
use intake_triage::{IntakeAnswers, RiskFactorAnswers, SymptomAnswers, NO_CONDITIONS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// All answers collected by the intake, one field per data step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeFormData {
    pub demographics: Demographics,
    pub symptoms: SymptomsSection,
    pub risk_factors: RiskFactorsSection,
    pub consent: Consent,
}

impl IntakeFormData {
    /// Project the answers the risk classifier scores.
    pub fn answers(&self) -> IntakeAnswers {
        IntakeAnswers {
            symptoms: Some(self.symptoms.answers.clone()),
            risk_factors: Some(self.risk_factors.answers.clone()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demographics {
    pub first_name: String,
    pub last_name: String,
    /// Unselected (`""`) reads as `None`.
    #[serde(
        deserialize_with = "intake_triage::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub age_group: Option<AgeGroup>,
    pub zip_code: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymptomsSection {
    #[serde(flatten)]
    pub answers: SymptomAnswers,
    #[serde(
        deserialize_with = "intake_triage::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub onset_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskFactorsSection {
    #[serde(flatten)]
    pub answers: RiskFactorAnswers,
    /// Where the respondent travelled. Only required when they did travel.
    pub recent_travel_details: String,
}

impl RiskFactorsSection {
    /// Replace the selected condition codes.
    ///
    /// Choosing `none` clears every other selection, leaving exactly `["none"]`.
    pub fn set_conditions<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: BTreeSet<String> = codes.into_iter().map(Into::into).collect();
        self.answers.conditions = if codes.contains(NO_CONDITIONS) {
            BTreeSet::from([NO_CONDITIONS.to_owned()])
        } else {
            codes
        };
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Consent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agrees_to_data_use: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agrees_to_follow_up: Option<bool>,
    #[serde(
        deserialize_with = "intake_triage::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_language: Option<Language>,
    /// Free-text language, used when `preferred_language` is [`Language::Other`].
    pub preferred_language_other: String,
}

impl Consent {
    /// The language to contact the respondent in, as they described it.
    pub fn language_display(&self) -> Option<String> {
        match self.preferred_language? {
            Language::Other => {
                let other = self.preferred_language_other.trim();
                let label = if other.is_empty() { "Other" } else { other };
                Some(label.to_owned())
            }
            language => Some(language.to_string()),
        }
    }
}

/// Age band selected on the demographics step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "under18")]
    Under18,
    #[serde(rename = "18-40")]
    From18To40,
    #[serde(rename = "41-65")]
    From41To65,
    #[serde(rename = "65plus")]
    Over65,
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AgeGroup::Under18 => "Under 18",
            AgeGroup::From18To40 => "18-40",
            AgeGroup::From41To65 => "41-65",
            AgeGroup::Over65 => "65+",
        })
    }
}

/// Preferred language for follow-up contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Other,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Other => "Other",
        })
    }
}
