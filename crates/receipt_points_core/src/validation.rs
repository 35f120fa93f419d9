//! crates/receipt_points_core/src/validation.rs
//!
//! Structural and format checks applied to a receipt before it is scored.
//! Rules are evaluated in a fixed order and the first violation is reported.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::Receipt;

static RETAILER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\s&-]+$").expect("retailer pattern is valid"));
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]{2}$").expect("amount pattern is valid"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("time pattern is valid"));

/// The rule a receipt violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required receipt field: {0}")]
    MissingField(&'static str),
    #[error("receipt must contain at least one item")]
    NoItems,
    #[error("invalid retailer name format: {0:?}")]
    InvalidRetailer(String),
    #[error("invalid purchase date format, expected YYYY-MM-DD: {0:?}")]
    InvalidPurchaseDate(String),
    #[error("invalid purchase time format, expected HH:MM: {0:?}")]
    InvalidPurchaseTime(String),
    #[error("invalid total format, expected a decimal with two fractional digits: {0:?}")]
    InvalidTotal(String),
    #[error("invalid price for item {index}, expected a decimal with two fractional digits: {price:?}")]
    InvalidItemPrice { index: usize, price: String },
}

/// Checks a receipt against every rule, stopping at the first failure.
pub fn validate_receipt(receipt: &Receipt) -> Result<(), ValidationError> {
    require_present(receipt)?;

    if !RETAILER_RE.is_match(&receipt.retailer) {
        return Err(ValidationError::InvalidRetailer(receipt.retailer.clone()));
    }

    if parse_purchase_date(&receipt.purchase_date).is_none() {
        return Err(ValidationError::InvalidPurchaseDate(
            receipt.purchase_date.clone(),
        ));
    }

    if parse_purchase_time(&receipt.purchase_time).is_none() {
        return Err(ValidationError::InvalidPurchaseTime(
            receipt.purchase_time.clone(),
        ));
    }

    if !is_amount(&receipt.total) {
        return Err(ValidationError::InvalidTotal(receipt.total.clone()));
    }

    if let Some((index, item)) = receipt
        .items
        .iter()
        .enumerate()
        .find(|(_, item)| !is_amount(&item.price))
    {
        return Err(ValidationError::InvalidItemPrice {
            index,
            price: item.price.clone(),
        });
    }

    Ok(())
}

fn require_present(receipt: &Receipt) -> Result<(), ValidationError> {
    let fields = [
        ("retailer", &receipt.retailer),
        ("purchaseDate", &receipt.purchase_date),
        ("purchaseTime", &receipt.purchase_time),
        ("total", &receipt.total),
    ];
    if let Some((name, _)) = fields.into_iter().find(|(_, value)| value.is_empty()) {
        return Err(ValidationError::MissingField(name));
    }
    if receipt.items.is_empty() {
        return Err(ValidationError::NoItems);
    }
    Ok(())
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub(crate) fn parse_purchase_date(value: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parses a strict `HH:MM` 24-hour time.
pub(crate) fn parse_purchase_time(value: &str) -> Option<NaiveTime> {
    if !TIME_RE.is_match(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

fn is_amount(value: &str) -> bool {
    AMOUNT_RE.is_match(value)
}
