//! `catalog-core`: foundation types shared by every catalog crate.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage).

pub mod error;
pub mod key;

pub use error::{ValidationError, ValidationResult};
pub use key::ItemKey;
