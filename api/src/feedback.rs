//! Passenger feedback wire shapes (`/admin/feedbacks`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(deserialize_with = "envelope::de_id")]
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_phone: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The feedback endpoint answers either a bare array or `{data: [...]}`.
pub fn parse_feedbacks(v: &Value) -> Result<Vec<Feedback>> {
    envelope::items(v, None)
}
