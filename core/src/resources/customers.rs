//! Customer administration.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use metrodesk_api::customer::{parse_customers, Customer, GiftDelivery};
use metrodesk_api::envelope;
use metrodesk_api::giftcode::{parse_giftcodes, Giftcode};
use metrodesk_api::ticket::{parse_customer_tickets, parse_ticket, IssuedTicket};

use crate::gateway::Backend;
use crate::Result;

/// Outcome of a bulk gift delivery. Individual failures never abort the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkGiftReport {
    pub sent: usize,
    pub failed: usize,
}

pub struct CustomersResource {
    backend: Arc<dyn Backend>,
}

impl CustomersResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<Customer>> {
        let v = self.backend.get("/admin/customers").await?;
        Ok(parse_customers(&v)?)
    }

    /// Locks or unlocks one account.
    pub async fn set_status(&self, user_id: &str, active: bool) -> Result<()> {
        self.backend
            .patch(
                &format!("/admin/customers/{user_id}/status"),
                json!({ "status": active }),
            )
            .await?;
        Ok(())
    }

    /// Every ticket the customer ever bought, newest first per the backend.
    pub async fn ticket_history(&self, user_id: &str) -> Result<Vec<IssuedTicket>> {
        let v = self
            .backend
            .get(&format!("/tickets/admin/customer/{user_id}"))
            .await?;
        Ok(parse_customer_tickets(&v)?)
    }

    pub async fn ticket_detail(&self, ticket_id: &str) -> Result<IssuedTicket> {
        let v = self.backend.get(&format!("/tickets/{ticket_id}")).await?;
        Ok(parse_ticket(&v)?)
    }

    /// Giftcodes the gift dialog can offer. An unreadable list degrades to
    /// empty so the dialog still opens.
    pub async fn available_giftcodes(&self) -> Result<Vec<Giftcode>> {
        let v = self.backend.get("/admin/giftcodes/available").await?;
        match parse_giftcodes(&v) {
            Ok(codes) => Ok(codes),
            Err(e) => {
                warn!("available giftcodes unreadable: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Delivers one gift. The backend acknowledges with `{success}` or `{ok}`.
    pub async fn send_gift(&self, gift: &GiftDelivery) -> Result<()> {
        let body = serde_json::to_value(gift)?;
        let v = self
            .backend
            .post("/admin/customers/send-gift", body)
            .await?;
        if !envelope::succeeded(&v) {
            return Err(crate::DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(())
    }

    /// Delivers the same gift to many customers, counting outcomes instead
    /// of stopping at the first failure.
    pub async fn send_bulk_gifts(
        &self,
        user_ids: &[String],
        promo_code: &str,
        title: &str,
        content: &str,
    ) -> BulkGiftReport {
        let mut report = BulkGiftReport::default();
        for user_id in user_ids {
            let gift = GiftDelivery {
                user_id: user_id.clone(),
                promo_code: promo_code.to_string(),
                title: title.to_string(),
                content: content.to_string(),
            };
            match self.send_gift(&gift).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!("gift to customer {} failed: {}", user_id, e);
                    report.failed += 1;
                }
            }
        }
        report
    }
}
