use crate::TriageParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal triage category assigned to an intake submission.
///
/// Variants are declared in ascending severity, so the derived `Ord` gives
/// `Low < Medium < High`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Every level, lowest first.
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Lowest score mapped to [`RiskLevel::High`].
    pub(crate) const HIGH_THRESHOLD: u32 = 7;

    /// Lowest score mapped to [`RiskLevel::Medium`].
    pub(crate) const MEDIUM_THRESHOLD: u32 = 3;

    /// Map an accumulated score onto a level. Thresholds are checked highest first.
    pub(crate) fn from_score(score: u32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// The lowercase wire code (`"low"`, `"medium"`, `"high"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = TriageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(TriageParseError::RiskLevel(other.to_owned())),
        }
    }
}
