//! Reporting wire shapes (`/admin/report/*`, `/admin/dashboard-stats`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

/// One day of sales: `rows[].{date, amount, count}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRow {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "envelope::de_u64")]
    pub count: u64,
}

/// Per-station gate validations: `rows[].{station_code, validations_count}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficRow {
    #[serde(default)]
    pub station_code: String,
    #[serde(default, deserialize_with = "envelope::de_u64")]
    pub validations_count: u64,
}

/// Ticket-type distribution slice for the pie chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTypeSlice {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopSpender {
    #[serde(default, deserialize_with = "envelope::de_id_opt")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, deserialize_with = "envelope::de_f64")]
    pub total_spent: f64,
}

pub fn parse_sales(v: &Value) -> Result<Vec<SalesRow>> {
    envelope::items(v, Some("rows"))
}

pub fn parse_traffic(v: &Value) -> Result<Vec<TrafficRow>> {
    envelope::items(v, Some("rows"))
}

pub fn parse_ticket_types(v: &Value) -> Result<Vec<TicketTypeSlice>> {
    envelope::items(v, None)
}

pub fn parse_top_spenders(v: &Value) -> Result<Vec<TopSpender>> {
    envelope::items(v, Some("rows"))
}

/// All-time scan counter from `/admin/dashboard-stats` (`data.scans`).
/// A missing or malformed counter reads as zero.
pub fn parse_scan_total(v: &Value) -> u64 {
    let data = envelope::unwrap_data(v);
    match data.get("scans") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
