//! Promotion code administration.

use std::sync::Arc;

use metrodesk_api::envelope;
use metrodesk_api::promotion::{parse_promotions, NewPromotion, PromoKind, Promotion};

use crate::gateway::Backend;
use crate::{DeskError, Result};

pub struct PromotionsResource {
    backend: Arc<dyn Backend>,
}

impl PromotionsResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<Promotion>> {
        let v = self.backend.get("/admin/promotions").await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(parse_promotions(&v)?)
    }

    /// Creates a promotion. The discount field must match the promotion
    /// kind, which the [`NewPromotion`] builders guarantee.
    pub async fn create(&self, promo: &NewPromotion) -> Result<()> {
        if promo.code.trim().is_empty() {
            return Err(DeskError::InvalidInput(
                "promotion code is required".to_string(),
            ));
        }
        let discount_matches_kind = match promo.promo_type {
            PromoKind::Percent => promo.discount_percent.is_some(),
            PromoKind::Amount => promo.discount_amount.is_some(),
        };
        if !discount_matches_kind {
            return Err(DeskError::InvalidInput(
                "discount value does not match the promotion kind".to_string(),
            ));
        }

        let v = self
            .backend
            .post("/admin/promotions", serde_json::to_value(promo)?)
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(())
    }
}
