//! Outreach plans and send receipts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel used for every planned outreach.
pub const EMAIL_CHANNEL: &str = "email";

/// A planned outreach message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachPlan {
    /// The lead the plan targets.
    pub lead_id: Value,
    /// Composed message body.
    pub message: String,
    /// Delivery channel.
    pub channel: String,
    /// Planning time.
    pub planned_at: String,
}

/// Receipt for a simulated send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// The lead the message went to.
    pub lead_id: Value,
    /// Delivery status; always `"sent"`.
    pub status: String,
    /// Send time.
    pub time: String,
}
