//! Shared helpers for the API integration tests.

#![allow(dead_code)]

use api_lib::config::Config;
use api_lib::web::{create_app, AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use receipt_points_core::domain::{ProcessedReceipt, UserPointsAccount};
use receipt_points_core::ports::{PortError, PortResult, ReceiptStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use tracing::Level;
use uuid::Uuid;

/// A store that keeps everything in memory and commits each receipt as a unit.
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<i64, i64>>,
    receipts: Mutex<HashMap<Uuid, ProcessedReceipt>>,
    conflict_always: bool,
}

impl InMemoryStore {
    /// Every write aborts with a serialization conflict.
    pub fn always_conflicting() -> Self {
        Self {
            conflict_always: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ReceiptStore for InMemoryStore {
    async fn record_receipt(&self, receipt: &ProcessedReceipt) -> PortResult<()> {
        if self.conflict_always {
            return Err(PortError::Conflict("could not serialize access".to_string()));
        }
        let mut receipts = self.receipts.lock().unwrap();
        if receipts
            .values()
            .any(|stored| stored.fingerprint == receipt.fingerprint)
        {
            return Err(PortError::Duplicate(receipt.fingerprint.clone()));
        }
        *self
            .users
            .lock()
            .unwrap()
            .entry(receipt.user_id)
            .or_insert(0) += receipt.points;
        receipts.insert(receipt.id, receipt.clone());
        Ok(())
    }

    async fn get_receipt_points(&self, id: Uuid) -> PortResult<i64> {
        self.receipts
            .lock()
            .unwrap()
            .get(&id)
            .map(|r| r.points)
            .ok_or_else(|| PortError::NotFound(format!("No receipt found for id {}", id)))
    }

    async fn get_user_points(&self, user_id: i64) -> PortResult<UserPointsAccount> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|points| UserPointsAccount {
                user_id,
                points: *points,
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_acquire_timeout: Duration::from_secs(1),
        log_level: Level::DEBUG,
        process_max_attempts: 2,
        cors_allowed_origin: None,
    }
}

pub fn test_app(store: Arc<dyn ReceiptStore>) -> Router {
    create_app(Arc::new(AppState::new(store, Arc::new(test_config()))))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn target_submission(user_id: i64) -> Value {
    serde_json::json!({
        "userId": user_id,
        "receipt": {
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "items": [
                {"shortDescription": "Mountain Dew 12PK", "price": "6.49"},
                {"shortDescription": "Emils Cheese Pizza", "price": "12.25"},
                {"shortDescription": "Knorr Creamy Chicken", "price": "1.26"},
                {"shortDescription": "Doritos Nacho Cheese", "price": "3.35"},
                {"shortDescription": "   Klarbrunn 12-PK 12 FL OZ  ", "price": "12.00"}
            ],
            "total": "35.35"
        }
    })
}
