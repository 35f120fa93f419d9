//! In-memory `ReceiptStore` used by the core unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ProcessedReceipt, UserPointsAccount};
use crate::ports::{PortError, PortResult, ReceiptStore};

#[derive(Default, Clone)]
struct Tables {
    users: HashMap<i64, i64>,
    receipts: HashMap<Uuid, ProcessedReceipt>,
}

/// Applies each write to a copy of the tables and swaps it in only when every
/// step succeeded, mirroring a rolled-back transaction on failure.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    conflicts_to_inject: AtomicU32,
    twin_commits_on_conflict: bool,
    fail_inserts: bool,
    pub record_calls: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` calls to `record_receipt` abort with a conflict.
    pub fn with_conflicts(count: u32) -> Self {
        let store = Self::default();
        store.conflicts_to_inject.store(count, Ordering::SeqCst);
        store
    }

    /// The first attempt aborts with a conflict because a competing submission
    /// of the same receipt committed while it ran.
    pub fn with_racing_twin() -> Self {
        let store = Self {
            twin_commits_on_conflict: true,
            ..Self::default()
        };
        store.conflicts_to_inject.store(1, Ordering::SeqCst);
        store
    }

    /// Every receipt insert fails after the points were accumulated.
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn user_points(&self, user_id: i64) -> Option<i64> {
        self.tables.lock().unwrap().users.get(&user_id).copied()
    }

    pub fn receipt_count(&self) -> usize {
        self.tables.lock().unwrap().receipts.len()
    }
}

#[async_trait]
impl ReceiptStore for MemoryStore {
    async fn record_receipt(&self, receipt: &ProcessedReceipt) -> PortResult<()> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self
            .conflicts_to_inject
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            if self.twin_commits_on_conflict {
                let mut tables = self.tables.lock().unwrap();
                *tables.users.entry(receipt.user_id).or_insert(0) += receipt.points;
                let twin = ProcessedReceipt {
                    id: Uuid::new_v4(),
                    ..receipt.clone()
                };
                tables.receipts.insert(twin.id, twin);
            }
            return Err(PortError::Conflict("could not serialize access".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        let mut tx = tables.clone();

        *tx.users.entry(receipt.user_id).or_insert(0) += receipt.points;

        if tx
            .receipts
            .values()
            .any(|stored| stored.fingerprint == receipt.fingerprint)
        {
            return Err(PortError::Duplicate(receipt.fingerprint.clone()));
        }

        if self.fail_inserts {
            return Err(PortError::Unexpected("insert failed".to_string()));
        }
        tx.receipts.insert(receipt.id, receipt.clone());

        *tables = tx;
        Ok(())
    }

    async fn get_receipt_points(&self, id: Uuid) -> PortResult<i64> {
        self.tables
            .lock()
            .unwrap()
            .receipts
            .get(&id)
            .map(|receipt| receipt.points)
            .ok_or_else(|| PortError::NotFound(format!("Receipt {} not found", id)))
    }

    async fn get_user_points(&self, user_id: i64) -> PortResult<UserPointsAccount> {
        self.tables
            .lock()
            .unwrap()
            .users
            .get(&user_id)
            .map(|points| UserPointsAccount {
                user_id,
                points: *points,
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }
}
