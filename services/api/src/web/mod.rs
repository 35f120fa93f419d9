pub mod app;
pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the router builder and handlers so the binaries and integration
// tests can reach them directly.
pub use app::create_app;
pub use rest::{get_points_handler, get_user_points_handler, health_handler, process_receipt_handler};
pub use state::AppState;
