//! Record source, identity cache and invoice repository.
//!
//! The repository is the only component that talks to the record source.
//! Everything downstream works on the assembled [`Invoice`](crate::core::Invoice).

mod cache;
mod repository;
mod source;

pub use cache::{EntityStore, IdentityCache};
pub use repository::InvoiceRepository;
pub use source::{
    CustomerRow, Dataset, InvoiceRow, ItemRow, MemorySource, ProductRow, RecordSource,
};
