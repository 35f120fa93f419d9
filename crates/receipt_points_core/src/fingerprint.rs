//! crates/receipt_points_core/src/fingerprint.rs
//!
//! Content fingerprints used to detect repeated submissions of the same receipt
//! by the same user.

use sha2::{Digest, Sha256};

use crate::domain::Receipt;

/// Returns the lowercase hex SHA-256 of the submitter and the receipt content.
///
/// Each field is written length-prefixed so that no two different receipts
/// serialize to the same byte string (e.g. moving text between adjacent item
/// descriptions, or splitting one item into two).
pub fn fingerprint(user_id: i64, receipt: &Receipt) -> String {
    let mut hasher = Sha256::new();

    write_field(&mut hasher, &user_id.to_string());
    write_field(&mut hasher, &receipt.retailer);
    write_field(&mut hasher, &receipt.purchase_date);
    write_field(&mut hasher, &receipt.purchase_time);
    write_field(&mut hasher, &receipt.total);
    write_field(&mut hasher, &receipt.items.len().to_string());
    for item in &receipt.items {
        write_field(&mut hasher, &item.short_description);
        write_field(&mut hasher, &item.price);
    }

    format!("{:x}", hasher.finalize())
}

fn write_field(hasher: &mut Sha256, value: &str) {
    hasher.update(value.len().to_string().as_bytes());
    hasher.update(b":");
    hasher.update(value.as_bytes());
}
