//! Station and line wire shapes (`/admin/stations`, `/tickets/lines`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub line_code: Option<String>,
    #[serde(default)]
    pub line_name: Option<String>,
    #[serde(default, deserialize_with = "envelope::de_u32_opt")]
    pub order_index: Option<u32>,
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "envelope::de_f64_opt")]
    pub lon: Option<f64>,
}

/// `POST /admin/stations` body. Coordinates are optional; the map view
/// simply skips stations without them.
#[derive(Debug, Clone, Serialize)]
pub struct NewStation {
    pub code: String,
    pub name: String,
    pub line_code: String,
    pub order_index: u32,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroLine {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

pub fn parse_stations(v: &Value) -> Result<Vec<Station>> {
    envelope::items(v, None)
}

/// Lines ride under `data.lines`.
pub fn parse_lines(v: &Value) -> Result<Vec<MetroLine>> {
    envelope::items(v, Some("lines"))
}

/// Per-line station list rides under `data.stations`.
pub fn parse_line_stations(v: &Value) -> Result<Vec<Station>> {
    envelope::items(v, Some("stations"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lines_unwrap_from_nested_field() {
        let v = json!({"data": {"lines": [
            {"code": "M1", "name": "Bến Thành - Suối Tiên", "color_hex": "#0ea5e9", "status": "open"}
        ]}});
        let lines = parse_lines(&v).expect("parse");
        assert_eq!(lines[0].code, "M1");
    }

    #[test]
    fn station_coordinates_tolerate_strings_and_null() {
        let v = json!({"ok": true, "data": [
            {"code": "BT", "name": "Bến Thành", "line_code": "M1", "order_index": "1",
             "lat": "10.7725", "lon": null}
        ]});
        let stations = parse_stations(&v).expect("parse");
        assert_eq!(stations[0].order_index, Some(1));
        assert_eq!(stations[0].lat, Some(10.7725));
        assert!(stations[0].lon.is_none());
    }
}
