//! Shared types and helpers used across the crate.

pub mod error;
pub mod id;
pub mod timestamp;
pub mod xml;

pub use error::{Error, Result};
