//! crates/receipt_points_core/src/lookup.rs
//!
//! Read-side queries over previously processed receipts and user totals.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::domain::UserPointsAccount;
use crate::ports::{PortError, ReceiptStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("lookup failed: {0}")]
    Persistence(String),
}

impl From<PortError> for LookupError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(msg) => LookupError::NotFound(msg),
            other => {
                error!("Points lookup failed: {:?}", other);
                LookupError::Persistence(other.to_string())
            }
        }
    }
}

#[derive(Clone)]
pub struct PointsLookup {
    store: Arc<dyn ReceiptStore>,
}

impl PointsLookup {
    pub fn new(store: Arc<dyn ReceiptStore>) -> Self {
        Self { store }
    }

    /// Returns the points awarded to the receipt with the given id.
    ///
    /// Receipt ids are UUIDs, so an id that does not parse cannot exist.
    pub async fn get_points(&self, id: &str) -> Result<i64, LookupError> {
        let id = Uuid::parse_str(id)
            .map_err(|_| LookupError::NotFound(format!("No receipt found for id {}", id)))?;
        Ok(self.store.get_receipt_points(id).await?)
    }

    pub async fn get_user_points(&self, user_id: i64) -> Result<UserPointsAccount, LookupError> {
        Ok(self.store.get_user_points(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, Receipt};
    use crate::processor::ReceiptProcessor;
    use crate::test_support::MemoryStore;

    #[tokio::test]
    async fn returns_points_for_processed_receipt() {
        let store = Arc::new(MemoryStore::new());
        let receipt = Receipt {
            retailer: "Walgreens".to_string(),
            purchase_date: "2022-01-02".to_string(),
            purchase_time: "08:13".to_string(),
            items: vec![
                LineItem::new("Pepsi - 12-oz", "1.25"),
                LineItem::new("Dasani", "1.40"),
            ],
            total: "2.65".to_string(),
        };
        let processed = ReceiptProcessor::new(store.clone(), 1)
            .process(3, &receipt)
            .await
            .unwrap();
        let lookup = PointsLookup::new(store);

        assert_eq!(
            lookup.get_points(&processed.id.to_string()).await,
            Ok(processed.points)
        );
        assert_eq!(
            lookup.get_user_points(3).await,
            Ok(UserPointsAccount {
                user_id: 3,
                points: processed.points
            })
        );
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let lookup = PointsLookup::new(Arc::new(MemoryStore::new()));

        assert!(matches!(
            lookup.get_points(&Uuid::new_v4().to_string()).await,
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            lookup.get_points("not-a-uuid").await,
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            lookup.get_user_points(42).await,
            Err(LookupError::NotFound(_))
        ));
    }
}
