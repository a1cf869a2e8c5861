//! Products domain module.
//!
//! This crate contains the `Product` record and the rules for turning raw
//! request input into a validated product operation. Pure logic only (no IO,
//! no HTTP, no storage).

pub mod product;
pub mod validation;

pub use product::{Product, coerce_name, coerce_price};
pub use validation::{KeyParams, Operation, ProductRequest, RawInput, Strictness, validate};
