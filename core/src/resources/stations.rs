//! Station and line administration.

use std::sync::Arc;

use metrodesk_api::envelope;
use metrodesk_api::station::{parse_lines, parse_stations, MetroLine, NewStation, Station};

use crate::gateway::Backend;
use crate::{DeskError, Result};

pub struct StationsResource {
    backend: Arc<dyn Backend>,
}

impl StationsResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<Station>> {
        let v = self.backend.get("/admin/stations").await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(parse_stations(&v)?)
    }

    /// Lines for the station form's dropdown.
    pub async fn lines(&self) -> Result<Vec<MetroLine>> {
        let v = self.backend.get("/tickets/lines").await?;
        Ok(parse_lines(&v)?)
    }

    pub async fn create(&self, station: &NewStation) -> Result<()> {
        if station.code.trim().is_empty() || station.name.trim().is_empty() {
            return Err(DeskError::InvalidInput(
                "station code and name are required".to_string(),
            ));
        }
        let v = self
            .backend
            .post("/admin/stations", serde_json::to_value(station)?)
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(())
    }

    pub async fn remove(&self, code: &str) -> Result<()> {
        let v = self
            .backend
            .delete(&format!("/admin/stations/{code}"))
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockBackend;
    use serde_json::json;

    #[tokio::test]
    async fn create_surfaces_the_backend_rejection_message() {
        let mut mock = MockBackend::new();
        mock.expect_post()
            .withf(|path, body| path == "/admin/stations" && body["code"] == "BT")
            .times(1)
            .returning(|_, _| Ok(json!({ "ok": false, "message": "Mã ga đã tồn tại" })));

        let stations = StationsResource::new(Arc::new(mock));
        let station = NewStation {
            code: "BT".to_string(),
            name: "Bến Thành".to_string(),
            line_code: "L1".to_string(),
            order_index: 1,
            lat: Some(10.7725),
            lon: Some(106.6980),
        };

        match stations.create(&station).await {
            Err(DeskError::Rejected(msg)) => assert_eq!(msg, "Mã ga đã tồn tại"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remove_targets_the_station_code() {
        let mut mock = MockBackend::new();
        mock.expect_delete()
            .withf(|path| path == "/admin/stations/BT")
            .times(1)
            .returning(|_| Ok(json!({ "ok": true })));

        let stations = StationsResource::new(Arc::new(mock));
        stations.remove("BT").await.expect("remove");
    }

    #[tokio::test]
    async fn blank_station_form_fails_before_any_request() {
        let mock = MockBackend::new();
        let stations = StationsResource::new(Arc::new(mock));
        let station = NewStation {
            code: " ".to_string(),
            name: "X".to_string(),
            line_code: "L1".to_string(),
            order_index: 1,
            lat: None,
            lon: None,
        };
        let err = stations.create(&station).await.expect_err("invalid");
        assert!(matches!(err, DeskError::InvalidInput(_)));
    }
}
