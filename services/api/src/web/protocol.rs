//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between HTTP clients and the API server,
//! and their conversion into core domain types.

use receipt_points_core::domain::{LineItem, Receipt};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================
// NOTE: Missing receipt fields deserialize as empty values so that the validator,
// not the JSON decoder, reports which rule was violated.
//=========================================================================================

/// Body of `POST /receipts/process`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReceiptRequest {
    pub user_id: i64,
    pub receipt: ReceiptPayload,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptPayload {
    #[schema(example = "Target")]
    pub retailer: String,
    #[schema(example = "2022-01-01")]
    pub purchase_date: String,
    #[schema(example = "13:01")]
    pub purchase_time: String,
    pub items: Vec<ItemPayload>,
    #[schema(example = "35.35")]
    pub total: String,
}

#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPayload {
    #[schema(example = "Emils Cheese Pizza")]
    pub short_description: String,
    #[schema(example = "12.25")]
    pub price: String,
}

impl From<ReceiptPayload> for Receipt {
    fn from(payload: ReceiptPayload) -> Self {
        Receipt {
            retailer: payload.retailer,
            purchase_date: payload.purchase_date,
            purchase_time: payload.purchase_time,
            items: payload.items.into_iter().map(LineItem::from).collect(),
            total: payload.total,
        }
    }
}

impl From<ItemPayload> for LineItem {
    fn from(payload: ItemPayload) -> Self {
        LineItem::new(payload.short_description, payload.price)
    }
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

/// Returned after a receipt has been processed.
#[derive(Serialize, Debug, ToSchema)]
pub struct ProcessReceiptResponse {
    pub id: Uuid,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PointsResponse {
    pub points: i64,
}

/// The running points total of a user.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPointsResponse {
    pub user_id: i64,
    pub points: i64,
}
