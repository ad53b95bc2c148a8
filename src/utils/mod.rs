//! Utilities module
//!
//! Contains error handling, logging, response caching and currency formatting

pub mod cache;
pub mod error;
pub mod format;
pub mod logging;
