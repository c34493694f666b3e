// Metrodesk API types
// Wire models for the metro-ticketing back office REST surface

pub mod announcement;
pub mod auth;
pub mod customer;
pub mod envelope;
pub mod feedback;
pub mod giftcode;
pub mod ops;
pub mod promotion;
pub mod report;
pub mod station;
pub mod ticket;

// Export core types
pub use announcement::{Announcement, NewAnnouncement};
pub use auth::{AckResponse, AdminUser, LoginResponse, ResetIssued, Role};
pub use customer::{Customer, GiftDelivery};
pub use feedback::Feedback;
pub use giftcode::{BatchOutcome, Giftcode, GiftcodeBatch, GiftcodeStatus, RewardType};
pub use ops::{AuditLog, PaymentRecord};
pub use promotion::{NewPromotion, PromoKind, Promotion};
pub use report::{SalesRow, TicketTypeSlice, TopSpender, TrafficRow};
pub use station::{MetroLine, NewStation, Station};
pub use ticket::{FareQuote, FareRule, IssuedTicket, NewFareRule, NewTicketProduct, TicketProduct};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WireError>;
