//! Domain resources.
//!
//! Thin request/decode layers over the [`Backend`](crate::gateway::Backend)
//! trait, one per back-office area. Resources hold nothing but shared
//! handles, so constructing one per screen is free.

pub mod auth;
pub mod customers;
pub mod giftcodes;
pub mod promotions;
pub mod purchase;
pub mod reports;
pub mod settings;
pub mod stations;
pub mod tickets;

pub use auth::AuthResource;
pub use customers::{BulkGiftReport, CustomersResource};
pub use giftcodes::{GiftcodeListing, GiftcodesResource};
pub use promotions::PromotionsResource;
pub use purchase::PurchaseResource;
pub use reports::{ReportsResource, SalesPoint, Statistics, StatisticsKpi, TrafficPoint};
pub use settings::{SettingsResource, SystemOverview};
pub use stations::StationsResource;
pub use tickets::TicketsResource;
