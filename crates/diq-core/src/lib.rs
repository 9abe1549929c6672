pub mod api;
pub mod config;
pub mod decision;
pub mod error;
pub mod notification;
pub mod session;

// Re-export common error type
pub use error::{DiqError, Result};
