//! services/api/src/lib.rs
//!
//! The HTTP service around the receipt points core: configuration, the Postgres
//! adapter, and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
