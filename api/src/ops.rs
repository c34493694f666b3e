//! Operational records: audit trail and payment ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

/// `/admin/audit` entry; the list rides under `data.logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub log_id: Option<String>,
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub object_id: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `/admin/payments` entry; the list rides under `data.payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub amount: f64,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub ticket_id: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_time_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

pub fn parse_audit_logs(v: &Value) -> Result<Vec<AuditLog>> {
    envelope::items(v, Some("logs"))
}

pub fn parse_payments(v: &Value) -> Result<Vec<PaymentRecord>> {
    envelope::items(v, Some("payments"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audit_logs_unwrap_from_data_logs() {
        let v = json!({"ok": true, "data": {"logs": [
            {"log_id": 1, "actor": "admin@metro.vn", "action": "station.create",
             "object_type": "station", "object_id": "BT", "created_at": "2026-08-20T08:00:00Z"}
        ]}});
        let logs = parse_audit_logs(&v).expect("parse");
        assert_eq!(logs[0].action, "station.create");
        assert!(logs[0].created_at.is_some());
    }

    #[test]
    fn payments_tolerate_numeric_ids_and_string_amounts() {
        let v = json!({"ok": true, "data": {"payments": [
            {"payment_id": 77, "amount": "15000", "method": "momo", "status": "ok", "ticket_id": 5}
        ]}});
        let payments = parse_payments(&v).expect("parse");
        assert_eq!(payments[0].payment_id.as_deref(), Some("77"));
        assert_eq!(payments[0].amount, 15000.0);
        assert_eq!(payments[0].ticket_id.as_deref(), Some("5"));
    }
}
