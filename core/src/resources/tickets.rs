//! Fare rules and ticket products.

use std::sync::Arc;

use metrodesk_api::envelope;
use metrodesk_api::ticket::{
    active_rule, kind, parse_fare_rules, parse_products, FareRule, NewFareRule, NewTicketProduct,
    TicketProduct,
};

use crate::gateway::Backend;
use crate::{DeskError, Result};

pub struct TicketsResource {
    backend: Arc<dyn Backend>,
}

impl TicketsResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn fare_rules(&self) -> Result<Vec<FareRule>> {
        let v = self.backend.get("/admin/fare-rules").await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(parse_fare_rules(&v)?)
    }

    /// The rule pricing single rides right now: the enabled one, or the
    /// first on file when none is enabled.
    pub async fn active_fare_rule(&self) -> Result<Option<FareRule>> {
        let rules = self.fare_rules().await?;
        Ok(active_rule(&rules).cloned())
    }

    pub async fn create_fare_rule(&self, rule: &NewFareRule) -> Result<()> {
        if rule.base_price < 0.0 || rule.step_price < 0.0 {
            return Err(DeskError::InvalidInput(
                "fare prices cannot be negative".to_string(),
            ));
        }
        let v = self
            .backend
            .post("/admin/fare-rules", serde_json::to_value(rule)?)
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(())
    }

    pub async fn products(&self) -> Result<Vec<TicketProduct>> {
        let v = self.backend.get("/admin/ticket-products").await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(parse_products(&v)?)
    }

    /// Creates a product. Single rides are priced by the fare rule, so any
    /// price on a `single_ride` product is dropped before the request.
    pub async fn create_product(&self, product: &NewTicketProduct) -> Result<()> {
        if product.code.trim().is_empty() || product.name_vi.trim().is_empty() {
            return Err(DeskError::InvalidInput(
                "product code and name are required".to_string(),
            ));
        }
        let mut product = product.clone();
        if product.kind == kind::SINGLE_RIDE {
            product.price = None;
        }
        let v = self
            .backend
            .post("/tickets/admin/products", serde_json::to_value(&product)?)
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(())
    }
}
