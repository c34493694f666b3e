//! Walk-in ticket sales desk.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use metrodesk_api::envelope;
use metrodesk_api::station::{parse_line_stations, parse_lines, MetroLine, Station};
use metrodesk_api::ticket::{
    kind, parse_guest_tickets, parse_products, parse_purchased_ticket, parse_quote, FareQuote,
    IssuedTicket, TicketProduct,
};

use crate::gateway::Backend;
use crate::{DeskError, Result};

pub struct PurchaseResource {
    backend: Arc<dyn Backend>,
}

impl PurchaseResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn lines(&self) -> Result<Vec<MetroLine>> {
        let v = self.backend.get("/tickets/lines").await?;
        Ok(parse_lines(&v)?)
    }

    /// Stations on one line, in travel order. An empty line code resolves to
    /// an empty list without a request, so station pickers can clear cheaply.
    pub async fn stations_on(&self, line_code: &str) -> Result<Vec<Station>> {
        if line_code.is_empty() {
            return Ok(Vec::new());
        }
        let v = self
            .backend
            .get(&format!("/tickets/lines/{line_code}/stations"))
            .await?;
        Ok(parse_line_stations(&v)?)
    }

    /// Pass products sellable over the counter. Single-ride products are
    /// excluded; those are quoted per trip instead.
    pub async fn pass_products(&self) -> Result<Vec<TicketProduct>> {
        let v = self.backend.get("/tickets/products").await?;
        let mut products = parse_products(&v)?;
        products.retain(|p| kind::is_pass(&p.kind));
        Ok(products)
    }

    /// Prices a single ride between two stations on one line.
    #[tracing::instrument(skip(self), fields(line_code = %line_code, from = %from_station, to = %to_station))]
    pub async fn quote_single(
        &self,
        line_code: &str,
        from_station: &str,
        to_station: &str,
    ) -> Result<FareQuote> {
        if line_code.is_empty() || from_station.is_empty() || to_station.is_empty() {
            return Err(DeskError::InvalidInput(
                "line and both stations are required".to_string(),
            ));
        }
        let v = self
            .backend
            .post(
                "/tickets/quote/single",
                json!({
                    "line_code": line_code,
                    "from_station": from_station,
                    "to_station": to_station,
                }),
            )
            .await?;
        Ok(parse_quote(&v)?)
    }

    /// Sells a single-ride ticket at the quoted price.
    #[tracing::instrument(skip(self, quote), fields(line_code = %quote.line_code, final_price = quote.final_price))]
    pub async fn buy_single(&self, quote: &FareQuote) -> Result<IssuedTicket> {
        let v = self
            .backend
            .post(
                "/admin/purchase/single",
                json!({
                    "line_code": quote.line_code,
                    "from_station": quote.from_station,
                    "to_station": quote.to_station,
                    "stops": quote.stops,
                    "final_price": quote.final_price,
                }),
            )
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        let ticket = parse_purchased_ticket(&v)?;
        info!(ticket_id = %ticket.ticket_id, "Issued single-ride ticket at the desk");
        Ok(ticket)
    }

    /// Sells a pass product at its listed price.
    #[tracing::instrument(skip(self), fields(product_code = %product_code, final_price))]
    pub async fn buy_pass(&self, product_code: &str, final_price: f64) -> Result<IssuedTicket> {
        if product_code.is_empty() {
            return Err(DeskError::InvalidInput(
                "product code is required".to_string(),
            ));
        }
        let v = self
            .backend
            .post(
                "/admin/purchase/pass",
                json!({ "product_code": product_code, "final_price": final_price }),
            )
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        let ticket = parse_purchased_ticket(&v)?;
        info!(ticket_id = %ticket.ticket_id, "Issued pass ticket at the desk");
        Ok(ticket)
    }

    /// Tickets sold over the counter, newest first per the backend.
    pub async fn guest_tickets(&self) -> Result<Vec<IssuedTicket>> {
        let v = self.backend.get("/admin/guest-tickets").await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        Ok(parse_guest_tickets(&v)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockBackend;

    #[tokio::test]
    async fn quote_posts_the_trip_and_parses_the_fare() {
        let mut mock = MockBackend::new();
        mock.expect_post()
            .withf(|path, body| {
                path == "/tickets/quote/single"
                    && body["from_station"] == "BEN_THANH"
                    && body["to_station"] == "SUOI_TIEN"
            })
            .returning(|_, _| {
                Ok(json!({ "success": true, "data": {
                    "line_code": "M1", "from_station": "BEN_THANH", "to_station": "SUOI_TIEN",
                    "stops": 13, "base_price": 7000, "discount": 0, "final_price": 20000
                }}))
            });

        let desk = PurchaseResource::new(Arc::new(mock));
        let quote = desk
            .quote_single("M1", "BEN_THANH", "SUOI_TIEN")
            .await
            .expect("quote");
        assert_eq!(quote.stops, 13);
        assert_eq!(quote.final_price, 20000.0);
    }

    #[tokio::test]
    async fn buying_single_posts_the_quoted_numbers() {
        let mut mock = MockBackend::new();
        mock.expect_post()
            .withf(|path, body| {
                path == "/admin/purchase/single"
                    && body["stops"] == 13
                    && body["final_price"] == 20000.0
            })
            .returning(|_, _| {
                Ok(json!({ "success": true, "ticket": {
                    "ticket_id": 88, "type": "single_ride", "final_price": 20000,
                    "qr_code": "QR-88", "status": "active"
                }}))
            });

        let desk = PurchaseResource::new(Arc::new(mock));
        let quote = FareQuote {
            line_code: "M1".to_string(),
            from_station: "BEN_THANH".to_string(),
            to_station: "SUOI_TIEN".to_string(),
            stops: 13,
            base_price: 7000.0,
            discount: 0.0,
            final_price: 20000.0,
        };
        let ticket = desk.buy_single(&quote).await.expect("purchase");
        assert_eq!(ticket.ticket_id, "88");
        assert_eq!(ticket.qr_code, "QR-88");
    }

    #[tokio::test]
    async fn declined_purchase_surfaces_the_backend_message() {
        let mut mock = MockBackend::new();
        mock.expect_post().returning(|_, _| {
            Ok(json!({ "success": false, "message": "Sản phẩm đã ngừng bán" }))
        });

        let desk = PurchaseResource::new(Arc::new(mock));
        let err = desk.buy_pass("DAY1", 40000.0).await.expect_err("declined");
        match err {
            DeskError::Rejected(message) => assert_eq!(message, "Sản phẩm đã ngừng bán"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn pass_catalog_excludes_single_rides() {
        let mut mock = MockBackend::new();
        mock.expect_get()
            .withf(|path| path == "/tickets/products")
            .returning(|_| {
                Ok(json!({ "success": true, "data": { "products": [
                    { "code": "SR", "name_vi": "Vé lượt", "type": "single_ride", "state": true },
                    { "code": "DAY1", "name_vi": "Vé ngày", "type": "day_pass",
                      "price": 40000, "duration_hours": 24, "state": true },
                    { "code": "M30", "name_vi": "Vé tháng", "type": "monthly_pass",
                      "price": 300000, "state": true },
                ]}}))
            });

        let desk = PurchaseResource::new(Arc::new(mock));
        let products = desk.pass_products().await.expect("products");
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| kind::is_pass(&p.kind)));
    }

    #[tokio::test]
    async fn empty_line_code_skips_the_station_request() {
        let mock = MockBackend::new();
        let desk = PurchaseResource::new(Arc::new(mock));
        let stations = desk.stations_on("").await.expect("empty");
        assert!(stations.is_empty());
    }
}
