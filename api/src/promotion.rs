//! Promotion wire shapes (`/admin/promotions`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

/// Discount mode: percentage of the order or a flat amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoKind {
    Percent,
    Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub promo_id: Option<String>,
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub promo_type: PromoKind,
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub discount_percent: Option<f64>,
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub discount_amount: Option<f64>,
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub min_order_amount: Option<f64>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "envelope::de_bool")]
    pub state: bool,
}

/// `POST /admin/promotions` body. Exactly one of the discount fields is set,
/// matching `promo_type`; the other is sent as null.
#[derive(Debug, Clone, Serialize)]
pub struct NewPromotion {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub promo_type: PromoKind,
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<f64>,
    pub min_order_amount: Option<f64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub state: bool,
}

impl NewPromotion {
    /// Percentage promotion; clears the flat-amount field.
    pub fn percent(code: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            promo_type: PromoKind::Percent,
            discount_percent: Some(value),
            discount_amount: None,
            min_order_amount: None,
            starts_at: None,
            ends_at: None,
            state: true,
        }
    }

    /// Flat-amount promotion; clears the percentage field.
    pub fn amount(code: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            discount_percent: None,
            discount_amount: Some(value),
            promo_type: PromoKind::Amount,
            ..Self::percent(code, name, 0.0)
        }
    }
}

pub fn parse_promotions(v: &Value) -> Result<Vec<Promotion>> {
    envelope::items(v, None)
}
