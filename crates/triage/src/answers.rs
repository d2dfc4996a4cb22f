//! Classifier input: the symptom and risk-factor answers of one intake.
//!
//! The wire shape matches what the intake form stores (camelCase keys, the symptom list
//! under `symptoms`). Deserialisation is lenient: a value of the wrong shape is read as
//! "not answered" rather than rejected, so classification stays total over whatever
//! record it is handed.

use crate::TriageParseError;
use serde::de::{self, Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Condition code meaning "no chronic conditions".
pub const NO_CONDITIONS: &str = "none";

// ============================================================================
// Answer records
// ============================================================================

/// Everything the classifier looks at. Either section may be missing entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeAnswers {
    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub symptoms: Option<SymptomAnswers>,

    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_factors: Option<RiskFactorAnswers>,
}

/// Answers from the symptoms step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymptomAnswers {
    /// Self-reported overall severity.
    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<Severity>,

    /// Symptom codes, for example `fever` or `shortness_of_breath`.
    #[serde(rename = "symptoms", deserialize_with = "lenient_set")]
    pub symptom_list: BTreeSet<String>,

    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_difficulty_breathing: Option<bool>,
}

impl SymptomAnswers {
    /// Number of distinct symptoms reported.
    pub fn symptom_count(&self) -> usize {
        self.symptom_list.len()
    }
}

/// Answers from the risk-factors step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskFactorAnswers {
    /// Chronic condition codes. May contain [`NO_CONDITIONS`].
    #[serde(deserialize_with = "lenient_set")]
    pub conditions: BTreeSet<String>,

    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_immunocompromised: Option<bool>,

    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_pregnant: Option<bool>,

    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub recent_travel: Option<bool>,

    #[serde(
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub recent_contact_with_sick: Option<ContactWithSick>,
}

impl RiskFactorAnswers {
    /// Whether the respondent reported at least one real chronic condition.
    ///
    /// The `none` sentinel wins: a list holding `none` alongside real conditions still
    /// counts as no chronic conditions.
    pub fn has_chronic_conditions(&self) -> bool {
        if self.conditions.contains(NO_CONDITIONS) {
            return false;
        }
        !self.conditions.is_empty()
    }
}

// ============================================================================
// Answer vocabularies
// ============================================================================

/// Overall symptom severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = TriageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(TriageParseError::Severity(other.to_owned())),
        }
    }
}

/// Answer to "have you been in close contact with someone who is sick?".
///
/// Stored as `true`, `false` or the string `"unsure"`; any other text is rejected on the
/// wire. Only [`ContactWithSick::Yes`] carries weight when scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactWithSick {
    Yes,
    No,
    Unsure,
}

impl ContactWithSick {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactWithSick::Yes => "yes",
            ContactWithSick::No => "no",
            ContactWithSick::Unsure => "unsure",
        }
    }
}

impl fmt::Display for ContactWithSick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactWithSick {
    type Err = TriageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(ContactWithSick::Yes),
            "no" | "false" => Ok(ContactWithSick::No),
            "unsure" => Ok(ContactWithSick::Unsure),
            other => Err(TriageParseError::Contact(other.to_owned())),
        }
    }
}

impl Serialize for ContactWithSick {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ContactWithSick::Yes => serializer.serialize_bool(true),
            ContactWithSick::No => serializer.serialize_bool(false),
            ContactWithSick::Unsure => serializer.serialize_str("unsure"),
        }
    }
}

impl<'de> Deserialize<'de> for ContactWithSick {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(ContactWithSick::Yes),
            Raw::Flag(false) => Ok(ContactWithSick::No),
            Raw::Text(text) if text.trim().eq_ignore_ascii_case("unsure") => {
                Ok(ContactWithSick::Unsure)
            }
            Raw::Text(text) => Err(de::Error::custom(TriageParseError::Contact(text))),
        }
    }
}

// ============================================================================
// Lenient field readers (internal)
// ============================================================================

/// Read an optional value, treating anything of the wrong shape as absent.
///
/// Blank strings for choice and date fields land here too, since they match no variant.
/// Use with `#[serde(default, deserialize_with = "intake_triage::lenient")]`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => Some(value),
        Lenient::Invalid(_) => None,
    })
}

fn lenient_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}
