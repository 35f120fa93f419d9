//! crates/receipt_points_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The store is the only external collaborator of the receipt pipeline, so it is
//! the only port. Adapters (Postgres, in-memory test doubles) live outside the core.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ProcessedReceipt, UserPointsAccount};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the underlying store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A receipt with the same fingerprint is already stored.
    #[error("Duplicate receipt: {0}")]
    Duplicate(String),
    /// The store aborted the transaction because of a concurrent writer.
    /// Nothing was committed and the unit of work may be retried.
    #[error("Transaction conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Atomically credits `receipt.points` to the owning user's account and stores
    /// the receipt row.
    ///
    /// Implementations must run the accumulation, the fingerprint existence check
    /// and the insert in a single serializable unit of work. If the fingerprint is
    /// already present the whole unit is rolled back and `PortError::Duplicate` is
    /// returned; no accumulation may survive any error.
    async fn record_receipt(&self, receipt: &ProcessedReceipt) -> PortResult<()>;

    /// Returns the points awarded to a stored receipt.
    async fn get_receipt_points(&self, id: Uuid) -> PortResult<i64>;

    async fn get_user_points(&self, user_id: i64) -> PortResult<UserPointsAccount>;
}
