//! Format-independent document tree.
//!
//! A [`DocumentModel`] is built from a validated [`Profile`](crate::profile::Profile)
//! and is all a renderer ever sees. It has six fixed sections: header,
//! seller, buyer, line items, tax breakdown and payment terms.

mod builder;
mod model;

pub use builder::build;
pub use model::*;
