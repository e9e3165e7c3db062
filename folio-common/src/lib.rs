//! # Folio Common Library
//!
//! Shared code for the folio portfolio site including:
//! - Error types
//! - Bootstrap configuration loading
//! - Domain models for scrobbles and code repositories
//! - Static content documents and the fallback-aware loader
//! - Human-readable time formatting
//! - Command palette model

pub mod config;
pub mod content;
pub mod error;
pub mod human_time;
pub mod models;
pub mod palette;

pub use error::{Error, Result};
