//! crates/receipt_points_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use uuid::Uuid;

/// A purchase receipt as submitted by a user.
///
/// Every field is kept exactly as it arrived so that fingerprints are computed
/// over the submitted text, not over a re-formatted value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Receipt {
    pub retailer: String,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
    /// `HH:MM`, 24-hour clock.
    pub purchase_time: String,
    pub items: Vec<LineItem>,
    /// Decimal string with exactly two fractional digits.
    pub total: String,
}

/// A single purchased item on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineItem {
    pub short_description: String,
    pub price: String,
}

impl LineItem {
    pub fn new(short_description: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            short_description: short_description.into(),
            price: price.into(),
        }
    }
}

/// The persisted outcome of a successful submission. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedReceipt {
    pub id: Uuid,
    pub user_id: i64,
    pub points: i64,
    /// Lowercase hex SHA-256 of the submitter and the receipt content.
    pub fingerprint: String,
}

/// Running total of points credited to a user across all their receipts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPointsAccount {
    pub user_id: i64,
    pub points: i64,
}
