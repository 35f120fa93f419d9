//! crates/receipt_points_core/src/scoring.rs
//!
//! The points rules. Scoring is a pure function of the receipt: no I/O, no clock,
//! and the same receipt always yields the same score.
//!
//! Monetary amounts are parsed as exact decimals so that rounding happens only
//! where a rule asks for it. An amount that does not parse contributes nothing;
//! validated receipts never hit that case.

use std::str::FromStr;

use chrono::{Datelike, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{LineItem, Receipt};
use crate::validation::{parse_purchase_date, parse_purchase_time};

const ROUND_TOTAL_POINTS: i64 = 50;
const QUARTER_MULTIPLE_POINTS: i64 = 25;
const POINTS_PER_ITEM_PAIR: i64 = 5;
const ODD_DAY_POINTS: i64 = 6;
const AFTERNOON_POINTS: i64 = 10;
const AFTERNOON_START_HOUR: u32 = 14;
const AFTERNOON_END_HOUR: u32 = 16;

/// Per-rule contributions to a receipt's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointsBreakdown {
    pub retailer_name: i64,
    pub round_total: i64,
    pub quarter_multiple: i64,
    pub item_pairs: i64,
    pub item_descriptions: i64,
    pub odd_day: i64,
    pub afternoon: i64,
}

impl PointsBreakdown {
    pub fn total(&self) -> i64 {
        self.retailer_name
            + self.round_total
            + self.quarter_multiple
            + self.item_pairs
            + self.item_descriptions
            + self.odd_day
            + self.afternoon
    }
}

/// Computes the points awarded for a receipt.
pub fn points(receipt: &Receipt) -> i64 {
    score(receipt).total()
}

/// Applies every rule and reports what each one contributed.
pub fn score(receipt: &Receipt) -> PointsBreakdown {
    let total = parse_amount(&receipt.total);

    PointsBreakdown {
        retailer_name: retailer_name_points(&receipt.retailer),
        round_total: total.map_or(0, round_total_points),
        quarter_multiple: total.map_or(0, quarter_multiple_points),
        item_pairs: item_pair_points(receipt.items.len()),
        item_descriptions: receipt.items.iter().map(item_description_points).sum(),
        odd_day: odd_day_points(&receipt.purchase_date),
        afternoon: afternoon_points(&receipt.purchase_time),
    }
}

/// One point per alphanumeric character.
fn retailer_name_points(retailer: &str) -> i64 {
    retailer.chars().filter(|c| c.is_alphanumeric()).count() as i64
}

fn round_total_points(total: Decimal) -> i64 {
    if total.fract().is_zero() {
        ROUND_TOTAL_POINTS
    } else {
        0
    }
}

/// A total too large to express in cents earns nothing.
fn quarter_multiple_points(total: Decimal) -> i64 {
    let cents = total
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i128());
    match cents {
        Some(cents) if cents % 25 == 0 => QUARTER_MULTIPLE_POINTS,
        _ => 0,
    }
}

fn item_pair_points(item_count: usize) -> i64 {
    (item_count / 2) as i64 * POINTS_PER_ITEM_PAIR
}

/// ceil(price * 0.2) when the trimmed description length, in UTF-8 bytes, is a
/// multiple of three. An empty description has length zero and therefore qualifies.
fn item_description_points(item: &LineItem) -> i64 {
    let length = item.short_description.trim().len();
    if length % 3 != 0 {
        return 0;
    }
    parse_amount(&item.price)
        .and_then(|price| price.checked_mul(Decimal::new(2, 1)))
        .and_then(|bonus| bonus.ceil().to_i64())
        .unwrap_or(0)
}

fn odd_day_points(purchase_date: &str) -> i64 {
    match parse_purchase_date(purchase_date) {
        Some(date) if date.day() % 2 == 1 => ODD_DAY_POINTS,
        _ => 0,
    }
}

/// Purchases in [14:00, 16:00) earn the afternoon bonus.
fn afternoon_points(purchase_time: &str) -> i64 {
    match parse_purchase_time(purchase_time) {
        Some(time) if (AFTERNOON_START_HOUR..AFTERNOON_END_HOUR).contains(&time.hour()) => {
            AFTERNOON_POINTS
        }
        _ => 0,
    }
}

fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value).ok()
}
