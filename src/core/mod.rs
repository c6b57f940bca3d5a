//! Entities, errors, code tables and amount formatting.
//!
//! Everything else in the crate builds on these types. Monetary values
//! are [`rust_decimal::Decimal`] throughout.

pub mod amount;
pub mod codes;
mod error;
mod types;

pub use codes::CodeList;
pub use error::*;
pub use types::*;
