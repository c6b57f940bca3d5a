//! Profile projection: turning an assembled invoice into a validated
//! Basic or Comfort field set.
//!
//! [`project`] is the only entry point. It either returns a complete
//! [`Profile`] or the first error found; nothing downstream ever sees a
//! partially populated profile.

mod projector;
mod settings;
mod types;

pub use projector::project;
pub use settings::{
    BankAccount, PaymentSettings, ProjectionSettings, SellerSettings, TaxRegistrationSetting,
};
pub use types::*;
