//! # zugferd-invoices
//!
//! Loads invoices from a record source, projects them into the ZUGFeRD 1.0
//! Basic or Comfort profile and renders them as XML, HTML or PDF.
//!
//! All monetary values use [`rust_decimal::Decimal`] and are rounded half-up
//! to two decimals only when they become display strings.
//!
//! ## Quick Start
//!
//! ```rust
//! use zugferd_invoices::document::build;
//! use zugferd_invoices::profile::{ProfileKind, ProjectionSettings, project};
//! use zugferd_invoices::render::to_xml;
//! use zugferd_invoices::store::{InvoiceRepository, MemorySource};
//!
//! let source = MemorySource::from_json(r#"{
//!     "customers": [{"id": 1, "first_name": "Anna", "last_name": "Peeters",
//!                    "street": "Veldstraat 10", "postal_code": "9000",
//!                    "city": "Gent", "country_id": "BE"}],
//!     "products": [{"id": 1, "name": "Notebook", "price": "10.00", "vat": "19"}],
//!     "invoices": [{"id": 1, "customer_id": 1, "invoice_date": "2015-01-03"}],
//!     "items": [{"invoice_id": 1, "item": 1, "product_id": 1, "quantity": 2}]
//! }"#).unwrap();
//! let repo = InvoiceRepository::new(source);
//!
//! let invoice = &repo.list_invoices().unwrap()[0];
//! let profile = project(invoice, ProfileKind::Basic, &ProjectionSettings::default()).unwrap();
//! assert_eq!(profile.basic().summation.grand_total, "23.80");
//!
//! let xml = to_xml(&build(&profile)).unwrap();
//! assert!(xml.contains("<ram:ID>I/00001</ram:ID>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `xml` (default) | ZUGFeRD XML rendering, batch driver, configuration |
//! | `html` (default) | HTML rendering |
//! | `pdf` (default) | PDF rendering with the XML attached |
//! | `cli` (default) | The `zugferd-invoices` binary |

pub mod core;
pub mod document;
pub mod profile;
pub mod store;

#[cfg(feature = "xml")]
pub mod batch;

#[cfg(feature = "xml")]
pub mod config;

#[cfg(feature = "xml")]
pub mod render;

pub use crate::core::PipelineError;
