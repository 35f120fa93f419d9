//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use receipt_points_core::ports::ReceiptStore;
use receipt_points_core::{PointsLookup, ReceiptProcessor};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Holds no mutable data of its own; requests coordinate only through the store.
#[derive(Clone)]
pub struct AppState {
    pub processor: ReceiptProcessor,
    pub lookup: PointsLookup,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the processor and lookup service to the same store.
    pub fn new(store: Arc<dyn ReceiptStore>, config: Arc<Config>) -> Self {
        Self {
            processor: ReceiptProcessor::new(store.clone(), config.process_max_attempts),
            lookup: PointsLookup::new(store),
            config,
        }
    }
}
