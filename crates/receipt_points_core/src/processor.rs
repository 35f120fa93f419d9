//! crates/receipt_points_core/src/processor.rs
//!
//! The receipt processing pipeline: validate, score, fingerprint, then hand the
//! result to the store which credits the user and records the receipt in a
//! single serializable transaction.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{ProcessedReceipt, Receipt};
use crate::fingerprint::fingerprint;
use crate::ports::{PortError, ReceiptStore};
use crate::scoring;
use crate::validation::{validate_receipt, ValidationError};

/// Why a submission was not recorded. No variant leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessError {
    #[error("invalid receipt: {0}")]
    Validation(#[from] ValidationError),
    #[error("duplicate receipt submission")]
    Duplicate,
    /// Concurrent submissions kept aborting each other. Safe to retry.
    #[error("receipt could not be recorded after {attempts} attempts due to concurrent submissions")]
    Conflict { attempts: u32 },
    #[error("could not record receipt: {0}")]
    Persistence(String),
}

/// Orchestrates a submission against an injected store.
#[derive(Clone)]
pub struct ReceiptProcessor {
    store: Arc<dyn ReceiptStore>,
    max_attempts: u32,
}

impl ReceiptProcessor {
    /// Creates a processor that tries each submission at most `max_attempts`
    /// times when the store reports a serialization conflict.
    pub fn new(store: Arc<dyn ReceiptStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Processes a receipt for `user_id` and returns the stored record.
    ///
    /// A retried attempt re-runs the whole unit of work with a fresh id. If the
    /// competing submission has committed in the meantime the retry sees its row
    /// and fails as a duplicate.
    #[tracing::instrument(skip(self, receipt), fields(retailer = %receipt.retailer))]
    pub async fn process(
        &self,
        user_id: i64,
        receipt: &Receipt,
    ) -> Result<ProcessedReceipt, ProcessError> {
        validate_receipt(receipt)?;

        let breakdown = scoring::score(receipt);
        let points = breakdown.total();
        let fingerprint = fingerprint(user_id, receipt);
        debug!(?breakdown, points, %fingerprint, "Scored receipt");

        let mut attempt = 0;
        loop {
            attempt += 1;
            let processed = ProcessedReceipt {
                id: Uuid::new_v4(),
                user_id,
                points,
                fingerprint: fingerprint.clone(),
            };

            match self.store.record_receipt(&processed).await {
                Ok(()) => {
                    info!(receipt_id = %processed.id, points, attempt, "Receipt processed");
                    return Ok(processed);
                }
                Err(PortError::Duplicate(_)) => {
                    warn!(%fingerprint, "Duplicate receipt submission rejected");
                    return Err(ProcessError::Duplicate);
                }
                Err(PortError::Conflict(reason)) if attempt < self.max_attempts => {
                    warn!(attempt, %reason, "Transaction conflict, retrying");
                }
                Err(PortError::Conflict(reason)) => {
                    warn!(attempt, %reason, "Transaction conflict, giving up");
                    return Err(ProcessError::Conflict { attempts: attempt });
                }
                Err(e) => {
                    error!("Failed to record receipt: {:?}", e);
                    return Err(ProcessError::Persistence(e.to_string()));
                }
            }
        }
    }
}
