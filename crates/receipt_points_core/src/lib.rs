pub mod domain;
pub mod fingerprint;
pub mod lookup;
pub mod ports;
pub mod processor;
pub mod scoring;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::{LineItem, ProcessedReceipt, Receipt, UserPointsAccount};
pub use lookup::{LookupError, PointsLookup};
pub use ports::{PortError, PortResult, ReceiptStore};
pub use processor::{ProcessError, ReceiptProcessor};
pub use validation::ValidationError;
