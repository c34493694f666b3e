//! Customer directory wire shapes (`/admin/customers`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "envelope::de_id")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Account enabled flag; toggled through the status endpoint.
    #[serde(default, deserialize_with = "envelope::de_bool")]
    pub state: bool,
    #[serde(default, deserialize_with = "envelope::de_u32_opt")]
    pub total_tickets: Option<u32>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST /admin/customers/send-gift` body. The backend expects camelCase
/// here, unlike the rest of the surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftDelivery {
    pub user_id: String,
    pub promo_code: String,
    pub title: String,
    pub content: String,
}

/// The customer list arrives bare or under `data`.
pub fn parse_customers(v: &Value) -> Result<Vec<Customer>> {
    envelope::items(v, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_accepts_bool_and_numeric_forms() {
        let v = json!({"data": [
            {"user_id": 1, "email": "a@m.vn", "full_name": "An", "state": true},
            {"user_id": 2, "email": "b@m.vn", "full_name": "Binh", "state": 0},
        ]});
        let list = parse_customers(&v).expect("parse");
        assert!(list[0].state);
        assert!(!list[1].state);
    }

    #[test]
    fn gift_delivery_serializes_camel_case() {
        let gift = GiftDelivery {
            user_id: "u7".into(),
            promo_code: "WELCOME10".into(),
            title: "Quà tặng".into(),
            content: "Cảm ơn bạn".into(),
        };
        let body = serde_json::to_value(&gift).expect("serialize");
        assert_eq!(body["userId"], "u7");
        assert_eq!(body["promoCode"], "WELCOME10");
        assert!(body.get("user_id").is_none());
    }
}
