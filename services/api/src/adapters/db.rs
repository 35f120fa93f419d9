//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ReceiptStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use receipt_points_core::domain::{ProcessedReceipt, UserPointsAccount};
use receipt_points_core::ports::{PortError, PortResult, ReceiptStore};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";
const RECEIPT_HASH_CONSTRAINT: &str = "receipts_receipt_hash_key";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ReceiptStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Steps of the receipt unit of work. The caller owns commit and rollback.
    async fn apply_receipt(
        tx: &mut Transaction<'_, Postgres>,
        receipt: &ProcessedReceipt,
    ) -> PortResult<()> {
        // Must be the first statement of the transaction.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, points)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET points = users.points + EXCLUDED.points
            "#,
        )
        .bind(receipt.user_id)
        .bind(receipt.points)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM receipts WHERE receipt_hash = $1)",
        )
        .bind(&receipt.fingerprint)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

        if exists {
            return Err(PortError::Duplicate(format!(
                "Receipt with fingerprint {} already exists",
                receipt.fingerprint
            )));
        }

        sqlx::query(
            "INSERT INTO receipts (id, user_id, points, receipt_hash) VALUES ($1, $2, $3, $4)",
        )
        .bind(receipt.id)
        .bind(receipt.user_id)
        .bind(receipt.points)
        .bind(&receipt.fingerprint)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: i64,
    points: i64,
}
impl UserRecord {
    fn to_domain(self) -> UserPointsAccount {
        UserPointsAccount {
            user_id: self.user_id,
            points: self.points,
        }
    }
}

/// Translates driver errors into port errors, singling out the ones the
/// processor handles: serialization failures and a lost race on the fingerprint.
fn map_sqlx_error(err: sqlx::Error) -> PortError {
    if let Some(db_error) = err.as_database_error() {
        match db_error.code().as_deref() {
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                return PortError::Conflict(db_error.message().to_string());
            }
            Some(UNIQUE_VIOLATION) if db_error.constraint() == Some(RECEIPT_HASH_CONSTRAINT) => {
                return PortError::Duplicate(db_error.message().to_string());
            }
            _ => {}
        }
    }
    PortError::Unexpected(err.to_string())
}

//=========================================================================================
// `ReceiptStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReceiptStore for DbAdapter {
    async fn record_receipt(&self, receipt: &ProcessedReceipt) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        match Self::apply_receipt(&mut tx, receipt).await {
            Ok(()) => {
                // Serializable conflicts can also surface at commit time.
                tx.commit().await.map_err(map_sqlx_error)?;
                debug!(receipt_id = %receipt.id, user_id = receipt.user_id, "Committed receipt");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Failed to roll back receipt transaction: {:?}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn get_receipt_points(&self, id: Uuid) -> PortResult<i64> {
        let points: Option<i64> = sqlx::query_scalar("SELECT points FROM receipts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        points.ok_or_else(|| PortError::NotFound(format!("No receipt found for id {}", id)))
    }

    async fn get_user_points(&self, user_id: i64) -> PortResult<UserPointsAccount> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, points FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }
}
