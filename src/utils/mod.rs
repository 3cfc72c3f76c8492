//! Utility modules for common functionality.
//!
//! - error: context carried by every error type in the crate
//! - logging: subscriber setup

pub mod error;
pub mod logging;
