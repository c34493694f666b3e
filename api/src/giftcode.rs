//! Giftcode wire shapes (`/admin/giftcodes`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::envelope;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    Ticket,
    DiscountAmount,
    DiscountPercent,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Giftcode {
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub promo_id: Option<String>,
    pub code: String,
    pub reward_type: RewardType,
    #[serde(default, deserialize_with = "envelope::de_i64_opt")]
    pub ticket_type_id: Option<i64>,
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub discount_amount: Option<f64>,
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub discount_percent: Option<f64>,
    #[serde(default, deserialize_with = "envelope::de_u64")]
    pub max_usage: u64,
    #[serde(default, deserialize_with = "envelope::de_u64")]
    pub used_count: u64,
    #[serde(default, deserialize_with = "envelope::de_bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Lifecycle status derived client-side at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftcodeStatus {
    Disabled,
    NotStarted,
    Expired,
    Exhausted,
    Running,
}

impl fmt::Display for GiftcodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GiftcodeStatus::Disabled => "disabled",
            GiftcodeStatus::NotStarted => "not started",
            GiftcodeStatus::Expired => "expired",
            GiftcodeStatus::Exhausted => "exhausted",
            GiftcodeStatus::Running => "running",
        };
        f.write_str(label)
    }
}

impl Giftcode {
    /// Status precedence: disabled, then not-started, then expired, then
    /// exhausted, else running. `used_count >= max_usage` with no lower
    /// bound on `max_usage`, so a zero-budget code reads as exhausted.
    pub fn status_at(&self, now: DateTime<Utc>) -> GiftcodeStatus {
        if !self.is_active {
            return GiftcodeStatus::Disabled;
        }
        if let Some(starts) = self.starts_at {
            if now < starts {
                return GiftcodeStatus::NotStarted;
            }
        }
        if let Some(expires) = self.expires_at {
            if now > expires {
                return GiftcodeStatus::Expired;
            }
        }
        if self.used_count >= self.max_usage {
            return GiftcodeStatus::Exhausted;
        }
        GiftcodeStatus::Running
    }

    /// Human-readable reward column for the list view.
    pub fn reward_label(&self) -> String {
        match self.reward_type {
            RewardType::Ticket => match self.ticket_type_id {
                Some(id) => format!("ticket type {id}"),
                None => "ticket".to_string(),
            },
            RewardType::DiscountAmount => match self.discount_amount {
                Some(amount) => format!("{amount:.0} ₫"),
                None => "N/A".to_string(),
            },
            RewardType::DiscountPercent => match self.discount_percent {
                Some(pct) => format!("{pct}%"),
                None => "N/A".to_string(),
            },
            RewardType::Unknown => "N/A".to_string(),
        }
    }
}

/// `POST /admin/giftcodes/batch` body: mint `quantity` codes under a prefix.
#[derive(Debug, Clone, Serialize)]
pub struct GiftcodeBatch {
    pub prefix: String,
    pub quantity: u32,
    pub reward_type: RewardType,
    pub ticket_type_id: Option<i64>,
    pub discount_amount: Option<f64>,
    pub discount_percent: Option<f64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_usage: u64,
}

/// `{ok, count}` batch acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOutcome {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "envelope::de_u64")]
    pub count: u64,
}

/// Tolerates `{data: [...]}`, `{data: {data: [...]}}` and a bare array.
pub fn parse_giftcodes(v: &Value) -> Result<Vec<Giftcode>> {
    envelope::items(v, None)
}

pub fn parse_batch_outcome(v: &Value) -> Result<BatchOutcome> {
    serde_json::from_value(v.clone()).map_err(Into::into)
}
