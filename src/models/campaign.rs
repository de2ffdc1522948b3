//! Campaign ranking payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One ranked campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRank {
    /// Campaign identifier as it appears in the data.
    pub campaign_id: Value,
    /// Mean conversion rate.
    ///
    /// `None` in fallback mode (no rate field at all) is skipped on output;
    /// `Some(None)` is a group with no defined rate and serializes as `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_rate: Option<Option<f64>>,
}

impl CampaignRank {
    /// Creates a ranked entry carrying a rate.
    #[must_use]
    pub const fn rated(campaign_id: Value, conv_rate: Option<f64>) -> Self {
        Self {
            campaign_id,
            conv_rate: Some(conv_rate),
        }
    }

    /// Creates a fallback entry with no rate field.
    #[must_use]
    pub const fn unrated(campaign_id: Value) -> Self {
        Self {
            campaign_id,
            conv_rate: None,
        }
    }
}

/// Reply payload of `evaluate_campaigns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignEvaluation {
    /// Campaigns in ranked order.
    pub top_campaigns: Vec<CampaignRank>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rank_serialization() {
        let rated = serde_json::to_value(CampaignRank::rated(json!("A"), Some(0.1))).unwrap();
        assert_eq!(rated, json!({"campaign_id": "A", "conv_rate": 0.1}));

        let undefined = serde_json::to_value(CampaignRank::rated(json!("B"), None)).unwrap();
        assert_eq!(undefined, json!({"campaign_id": "B", "conv_rate": null}));

        let unrated = serde_json::to_value(CampaignRank::unrated(json!("C"))).unwrap();
        assert_eq!(unrated, json!({"campaign_id": "C"}));
    }
}
