//! Lead labels and triage profiles.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Score at or above which a lead is campaign qualified.
pub const QUALIFIED_THRESHOLD: i64 = 60;

/// Score at or above which a lead is a general inquiry.
pub const INQUIRY_THRESHOLD: i64 = 30;

/// Triage label assigned to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadLabel {
    /// Score of 60 or more.
    #[serde(rename = "Campaign Qualified")]
    CampaignQualified,
    /// Score from 30 up to 59.
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
    /// Score below 30.
    #[serde(rename = "Cold Lead")]
    ColdLead,
}

impl LeadLabel {
    /// Labels a triage score.
    #[must_use]
    pub const fn from_score(score: i64) -> Self {
        if score >= QUALIFIED_THRESHOLD {
            Self::CampaignQualified
        } else if score >= INQUIRY_THRESHOLD {
            Self::GeneralInquiry
        } else {
            Self::ColdLead
        }
    }

    /// Returns the display name of the label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignQualified => "Campaign Qualified",
            Self::GeneralInquiry => "General Inquiry",
            Self::ColdLead => "Cold Lead",
        }
    }
}

impl fmt::Display for LeadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying a lead; also merged into long-term memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadProfile {
    /// The lead id as requested.
    pub lead_id: Value,
    /// Assigned label.
    pub label: LeadLabel,
    /// Triage score.
    pub score: i64,
    /// Classification time.
    pub last_classified: String,
}
