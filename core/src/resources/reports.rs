//! Statistics reports.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use metrodesk_api::report::{
    parse_sales, parse_ticket_types, parse_top_spenders, parse_traffic, TicketTypeSlice,
    TopSpender,
};

use crate::gateway::Backend;
use crate::{DeskError, Result};

/// One day of sales, chart-ready.
#[derive(Debug, Clone, Serialize)]
pub struct SalesPoint {
    pub date: String,
    pub revenue: f64,
    pub tickets: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrafficPoint {
    pub station: String,
    pub passengers: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticsKpi {
    pub total_revenue: f64,
    pub total_tickets: u64,
    pub total_passengers: u64,
    /// Mean revenue per ticket, rounded to whole đồng. Zero when no tickets
    /// sold in the window.
    pub avg_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub sales: Vec<SalesPoint>,
    pub traffic: Vec<TrafficPoint>,
    pub ticket_types: Vec<TicketTypeSlice>,
    pub kpi: StatisticsKpi,
}

pub struct ReportsResource {
    backend: Arc<dyn Backend>,
}

impl ReportsResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn window(from: NaiveDate, to: NaiveDate) -> (String, String) {
        (
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string(),
        )
    }

    /// Builds the statistics screen for one date window: three report calls
    /// in parallel, then chart series and KPI totals. A report with an
    /// unexpected shape contributes an empty series.
    pub async fn statistics(&self, from: NaiveDate, to: NaiveDate) -> Result<Statistics> {
        if from > to {
            return Err(DeskError::InvalidInput(
                "date window is reversed".to_string(),
            ));
        }
        let (from_date, to_date) = Self::window(from, to);
        let sales_path = format!("/admin/report/sales?from_date={from_date}&to_date={to_date}");
        let traffic_path =
            format!("/admin/report/traffic?from_date={from_date}&to_date={to_date}");
        let types_path =
            format!("/admin/report/ticket-types?from_date={from_date}&to_date={to_date}");

        let (sales, traffic, types) = tokio::join!(
            self.backend.get(&sales_path),
            self.backend.get(&traffic_path),
            self.backend.get(&types_path),
        );
        let sales = parse_sales(&sales?).unwrap_or_default();
        let traffic = parse_traffic(&traffic?).unwrap_or_default();
        let ticket_types = parse_ticket_types(&types?).unwrap_or_default();

        let total_revenue: f64 = sales.iter().map(|r| r.amount).sum();
        let total_tickets: u64 = sales.iter().map(|r| r.count).sum();
        let total_passengers: u64 = traffic.iter().map(|r| r.validations_count).sum();
        let avg_revenue = if total_tickets > 0 {
            (total_revenue / total_tickets as f64).round()
        } else {
            0.0
        };

        Ok(Statistics {
            sales: sales
                .into_iter()
                .map(|r| SalesPoint {
                    date: r.date,
                    revenue: r.amount,
                    tickets: r.count,
                })
                .collect(),
            traffic: traffic
                .into_iter()
                .map(|r| TrafficPoint {
                    station: r.station_code,
                    passengers: r.validations_count,
                })
                .collect(),
            ticket_types,
            kpi: StatisticsKpi {
                total_revenue,
                total_tickets,
                total_passengers,
                avg_revenue,
            },
        })
    }

    pub async fn top_spenders(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TopSpender>> {
        let (from_date, to_date) = Self::window(from, to);
        let v = self
            .backend
            .get(&format!(
                "/admin/report/top-spenders?from_date={from_date}&to_date={to_date}"
            ))
            .await?;
        Ok(parse_top_spenders(&v)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockBackend;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    #[tokio::test]
    async fn kpis_total_the_series_and_round_the_mean() {
        let mut mock = MockBackend::new();
        mock.expect_get().returning(|path| {
            if path.starts_with("/admin/report/sales") {
                Ok(json!({ "data": { "rows": [
                    { "date": "2026-08-01", "amount": 50000, "count": 2 },
                    { "date": "2026-08-02", "amount": 50001, "count": 1 },
                ]}}))
            } else if path.starts_with("/admin/report/traffic") {
                Ok(json!({ "data": { "rows": [
                    { "station_code": "BEN_THANH", "validations_count": 30 },
                ]}}))
            } else {
                Ok(json!({ "data": [
                    { "name": "single_ride", "value": 3 },
                ]}))
            }
        });

        let reports = ReportsResource::new(Arc::new(mock));
        let stats = reports
            .statistics(day("2026-08-01"), day("2026-08-02"))
            .await
            .expect("statistics");

        assert_eq!(stats.kpi.total_revenue, 100001.0);
        assert_eq!(stats.kpi.total_tickets, 3);
        assert_eq!(stats.kpi.total_passengers, 30);
        assert_eq!(stats.kpi.avg_revenue, 33334.0, "rounded to whole đồng");
        assert_eq!(stats.sales.len(), 2);
        assert_eq!(stats.ticket_types.len(), 1);
    }

    #[tokio::test]
    async fn empty_window_yields_zero_kpis() {
        let mut mock = MockBackend::new();
        mock.expect_get()
            .returning(|_| Ok(json!({ "data": { "rows": [] } })));

        let reports = ReportsResource::new(Arc::new(mock));
        let stats = reports
            .statistics(day("2026-08-01"), day("2026-08-01"))
            .await
            .expect("statistics");

        assert_eq!(stats.kpi.total_tickets, 0);
        assert_eq!(stats.kpi.avg_revenue, 0.0, "no division by zero");
    }

    #[tokio::test]
    async fn reversed_window_fails_before_any_request() {
        let mock = MockBackend::new();
        let reports = ReportsResource::new(Arc::new(mock));
        let err = reports
            .statistics(day("2026-08-02"), day("2026-08-01"))
            .await
            .expect_err("invalid");
        assert!(matches!(err, DeskError::InvalidInput(_)));
    }
}
