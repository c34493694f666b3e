//! Envelope normalization for the back-office REST surface.
//!
//! The backend is not consistent about how it wraps payloads: some endpoints
//! answer `{ok, data}`, some `{success, ...}`, some a bare array, and some
//! nest one level deeper (`{ok, data: {rows: [...]}}`). Every response passes
//! through this module exactly once, so no call site ever probes shapes on its
//! own.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{Result, WireError};

/// Strips one `data` envelope level if present.
///
/// # Examples
///
/// ```
/// use metrodesk_api::envelope::unwrap_data;
/// use serde_json::json;
///
/// let wrapped = json!({"ok": true, "data": {"scans": 8}});
/// assert_eq!(unwrap_data(&wrapped)["scans"], 8);
///
/// let bare = json!({"scans": 8});
/// assert_eq!(unwrap_data(&bare)["scans"], 8);
/// ```
pub fn unwrap_data(v: &Value) -> &Value {
    match v.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => v,
    }
}

/// Whether the response reports success. Endpoints disagree on the flag name
/// (`ok` vs `success`); a response carrying neither is treated as successful,
/// since bare-payload endpoints have no flag at all.
pub fn succeeded(v: &Value) -> bool {
    if let Some(ok) = v.get("ok").and_then(Value::as_bool) {
        return ok;
    }
    if let Some(ok) = v.get("success").and_then(Value::as_bool) {
        return ok;
    }
    true
}

/// Extracts the server's rejection text, preferring the nested
/// `error.message` over the top-level `message`.
pub fn failure_message(v: &Value) -> String {
    v.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| v.get("message").and_then(Value::as_str))
        .unwrap_or("request failed")
        .to_string()
}

/// Locates the payload collection inside an arbitrarily wrapped response.
///
/// Probes, in order: the value itself, `v[field]`, `v.data`, `v.data[field]`,
/// and `v.data.data`. The `field` hint covers endpoints that key the list
/// (`rows`, `lines`, `stations`, `logs`, `payments`, `tickets`, `products`).
///
/// # Examples
///
/// ```
/// use metrodesk_api::envelope::collection;
/// use serde_json::json;
///
/// let nested = json!({"ok": true, "data": {"rows": [1, 2]}});
/// assert_eq!(collection(&nested, Some("rows")).unwrap().len(), 2);
///
/// // Same payload after a transport layer already stripped one level.
/// let stripped = json!({"rows": [1, 2]});
/// assert_eq!(collection(&stripped, Some("rows")).unwrap().len(), 2);
///
/// let bare = json!([1, 2, 3]);
/// assert_eq!(collection(&bare, None).unwrap().len(), 3);
/// ```
pub fn collection<'a>(v: &'a Value, field: Option<&str>) -> Option<&'a Vec<Value>> {
    if let Some(arr) = v.as_array() {
        return Some(arr);
    }
    if let Some(f) = field {
        if let Some(arr) = v.get(f).and_then(Value::as_array) {
            return Some(arr);
        }
    }
    let data = v.get("data")?;
    if let Some(arr) = data.as_array() {
        return Some(arr);
    }
    if let Some(f) = field {
        if let Some(arr) = data.get(f).and_then(Value::as_array) {
            return Some(arr);
        }
    }
    data.get("data").and_then(Value::as_array)
}

/// Decodes the payload collection into typed items.
pub fn items<T: DeserializeOwned>(v: &Value, field: Option<&str>) -> Result<Vec<T>> {
    let rows = collection(v, field).ok_or_else(|| {
        WireError::Shape(format!(
            "no collection found (hint: {})",
            field.unwrap_or("none")
        ))
    })?;
    rows.iter()
        .map(|row| serde_json::from_value(row.clone()).map_err(WireError::from))
        .collect()
}

/// Decodes a single object payload, stripping one envelope level first.
pub fn item<T: DeserializeOwned>(v: &Value) -> Result<T> {
    serde_json::from_value(unwrap_data(v).clone()).map_err(WireError::from)
}

// =========================
// Lenient field deserializers
// =========================
//
// The backend serializes numeric columns as numbers or strings depending on
// the driver, and timestamps in more than one format. These keep the typed
// models tolerant without scattering coercion across call sites.

/// Identifier that arrives as a JSON number or string.
pub fn de_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Optional identifier; null and absent both map to `None`.
pub fn de_id_opt<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => Some(0.0),
        _ => None,
    }
}

/// Amount that arrives as a number, numeric string, or null (reads as zero).
pub fn de_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    let v = Value::deserialize(d)?;
    value_as_f64(&v)
        .ok_or_else(|| serde::de::Error::custom(format!("expected numeric value, got {v}")))
}

pub fn de_f64_opt<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        v => value_as_f64(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected numeric value, got {v}"))),
    }
}

/// Count that arrives as a number or numeric string; null reads as zero.
pub fn de_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    let v = Value::deserialize(d)?;
    value_as_f64(&v)
        .map(|f| if f.is_sign_negative() { 0 } else { f as u64 })
        .ok_or_else(|| serde::de::Error::custom(format!("expected numeric value, got {v}")))
}

pub fn de_u32_opt<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u32>, D::Error> {
    Ok(de_f64_opt(d)?.map(|f| if f.is_sign_negative() { 0 } else { f as u32 }))
}

pub fn de_i64_opt<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<i64>, D::Error> {
    Ok(de_f64_opt(d)?.map(|f| f as i64))
}

/// Boolean that arrives as a bool, 0/1, or "true"/"false".
pub fn de_bool<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    match Value::deserialize(d)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0) != 0.0),
        Value::String(s) => Ok(matches!(s.as_str(), "true" | "TRUE" | "1" | "t")),
        Value::Null => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected boolean-like value, got {other}"
        ))),
    }
}

/// Timestamp in RFC 3339, `YYYY-MM-DD HH:MM:SS`, bare date, or epoch
/// milliseconds. Unparseable values read as `None` rather than failing the
/// whole row.
pub fn de_time_opt<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(parse_time(&s)),
        Value::Number(n) => Ok(n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis)),
        _ => Ok(None),
    }
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    None
}
