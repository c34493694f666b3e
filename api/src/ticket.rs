//! Fare configuration and ticket wire shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

/// Product type markers used by the backend.
pub mod kind {
    pub const SINGLE_RIDE: &str = "single_ride";
    pub const DAY_PASS: &str = "day_pass";
    pub const MULTI_DAY_PASS: &str = "multi_day_pass";
    pub const MONTHLY_PASS: &str = "monthly_pass";

    /// Pass products are the ones sold at a fixed price; single rides are
    /// priced from the fare rule instead.
    pub fn is_pass(kind: &str) -> bool {
        matches!(kind, DAY_PASS | MULTI_DAY_PASS | MONTHLY_PASS)
    }
}

/// Single-ride pricing rule. At most one rule is live (`state`) at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareRule {
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub rule_id: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub base_price: f64,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub step_price: f64,
    #[serde(default, deserialize_with = "envelope::de_bool")]
    pub state: bool,
}

/// `POST /admin/fare-rules` body.
#[derive(Debug, Clone, Serialize)]
pub struct NewFareRule {
    pub base_price: f64,
    pub step_price: f64,
    pub state: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketProduct {
    pub code: String,
    #[serde(default)]
    pub name_vi: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Null for single-ride products, which are priced by the fare rule.
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "envelope::de_u32_opt")]
    pub duration_hours: Option<u32>,
    #[serde(default, deserialize_with = "envelope::de_u32_opt")]
    pub auto_activate_after_days: Option<u32>,
    #[serde(default, deserialize_with = "envelope::de_bool")]
    pub state: bool,
}

/// Ticket product upsert body.
#[derive(Debug, Clone, Serialize)]
pub struct NewTicketProduct {
    pub code: String,
    pub name_vi: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: Option<f64>,
    pub duration_hours: Option<u32>,
    pub auto_activate_after_days: Option<u32>,
    pub state: bool,
}

/// Quote for a single ride between two stations on one line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareQuote {
    pub line_code: String,
    pub from_station: String,
    pub to_station: String,
    #[serde(default, deserialize_with = "envelope::de_u64")]
    pub stops: u64,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub base_price: f64,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub discount: f64,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub final_price: f64,
}

/// A ticket issued by the backend, as shown in purchase history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedTicket {
    #[serde(deserialize_with = "envelope::de_id")]
    pub ticket_id: String,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub from_station: Option<String>,
    #[serde(default)]
    pub to_station: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub final_price: f64,
    #[serde(default)]
    pub qr_code: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

pub fn parse_fare_rules(v: &Value) -> Result<Vec<FareRule>> {
    envelope::items(v, None)
}

/// The rule the system currently charges by: the flagged one, else the first.
pub fn active_rule(rules: &[FareRule]) -> Option<&FareRule> {
    rules.iter().find(|r| r.state).or_else(|| rules.first())
}

/// Product lists arrive in several wrappers, including `data.products`.
pub fn parse_products(v: &Value) -> Result<Vec<TicketProduct>> {
    envelope::items(v, Some("products"))
}

pub fn parse_quote(v: &Value) -> Result<FareQuote> {
    envelope::item(v)
}

pub fn parse_ticket(v: &Value) -> Result<IssuedTicket> {
    envelope::item(v)
}

/// A customer's purchase history rides under `data.tickets`.
pub fn parse_customer_tickets(v: &Value) -> Result<Vec<IssuedTicket>> {
    envelope::items(v, Some("tickets"))
}

/// Walk-in desk history: `{success, tickets: [...]}`.
pub fn parse_guest_tickets(v: &Value) -> Result<Vec<IssuedTicket>> {
    envelope::items(v, Some("tickets"))
}

/// `{success, ticket}` purchase acknowledgement.
pub fn parse_purchased_ticket(v: &Value) -> Result<IssuedTicket> {
    match v.get("ticket") {
        Some(t) => serde_json::from_value(t.clone()).map_err(Into::into),
        None => envelope::item(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn active_rule_prefers_flagged_over_first() {
        let v = json!({"ok": true, "data": [
            {"rule_id": 1, "base_price": "7000", "step_price": "1000", "state": false},
            {"rule_id": 2, "base_price": 8000, "step_price": 1200, "state": true},
        ]});
        let rules = parse_fare_rules(&v).expect("parse");
        let active = active_rule(&rules).expect("active");
        assert_eq!(active.rule_id.as_deref(), Some("2"));
        assert_eq!(active.base_price, 8000.0);
    }

    #[test]
    fn active_rule_falls_back_to_first_when_none_flagged() {
        let rules = vec![
            FareRule {
                rule_id: Some("1".into()),
                base_price: 7000.0,
                step_price: 1000.0,
                state: false,
            },
            FareRule {
                rule_id: Some("2".into()),
                base_price: 9000.0,
                step_price: 1500.0,
                state: false,
            },
        ];
        assert_eq!(active_rule(&rules).expect("first").rule_id.as_deref(), Some("1"));
        assert!(active_rule(&[]).is_none());
    }

    #[test]
    fn products_decode_from_every_known_wrapper() {
        let product = json!({"code": "DAY1", "name_vi": "Vé ngày", "type": "day_pass",
                             "price": "40000", "duration_hours": 24, "state": true});
        let shapes = [
            json!([product]),
            json!({"data": [product]}),
            json!({"ok": true, "data": {"products": [product]}}),
            json!({"products": [product]}),
            json!({"data": {"data": [product]}}),
        ];
        for shape in &shapes {
            let products = parse_products(shape).expect("parse");
            assert_eq!(products[0].price, Some(40000.0), "failed for {shape}");
        }
    }

    #[test]
    fn pass_kinds_exclude_single_ride() {
        assert!(kind::is_pass(kind::DAY_PASS));
        assert!(kind::is_pass(kind::MONTHLY_PASS));
        assert!(!kind::is_pass(kind::SINGLE_RIDE));
    }

    #[test]
    fn purchase_ack_extracts_nested_ticket() {
        let v = json!({"success": true, "ticket": {
            "ticket_id": 88, "product_code": "SR", "final_price": 9000,
            "qr_code": "QR-88", "status": "active"
        }});
        let ticket = parse_purchased_ticket(&v).expect("parse");
        assert_eq!(ticket.ticket_id, "88");
        assert_eq!(ticket.qr_code, "QR-88");
    }
}
