//! Giftcode administration.

use std::sync::Arc;

use chrono::Utc;

use metrodesk_api::envelope;
use metrodesk_api::giftcode::{
    parse_batch_outcome, parse_giftcodes, Giftcode, GiftcodeBatch, GiftcodeStatus,
};

use crate::gateway::Backend;
use crate::{DeskError, Result};

/// One giftcode with its lifecycle status derived at listing time.
#[derive(Debug, Clone)]
pub struct GiftcodeListing {
    pub code: Giftcode,
    pub status: GiftcodeStatus,
    pub reward: String,
}

pub struct GiftcodesResource {
    backend: Arc<dyn Backend>,
}

impl GiftcodesResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Lists every giftcode with status and reward description attached.
    pub async fn list(&self) -> Result<Vec<GiftcodeListing>> {
        let v = self.backend.get("/admin/giftcodes").await?;
        let now = Utc::now();
        let listings = parse_giftcodes(&v)?
            .into_iter()
            .map(|code| GiftcodeListing {
                status: code.status_at(now),
                reward: code.reward_label(),
                code,
            })
            .collect();
        Ok(listings)
    }

    /// Cuts a batch of codes under one prefix. Returns how many were created.
    pub async fn create_batch(&self, batch: &GiftcodeBatch) -> Result<u64> {
        if batch.prefix.trim().is_empty() {
            return Err(DeskError::InvalidInput(
                "giftcode prefix is required".to_string(),
            ));
        }
        if batch.quantity == 0 {
            return Err(DeskError::InvalidInput(
                "batch quantity must be at least one".to_string(),
            ));
        }
        let v = self
            .backend
            .post("/admin/giftcodes/batch", serde_json::to_value(batch)?)
            .await?;
        let outcome = parse_batch_outcome(&v)?;
        if !outcome.ok {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(outcome.count)
    }
}
