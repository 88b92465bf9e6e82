//! API records, identifiers, and request forms.

pub mod customer;
pub mod form;
pub mod id;
pub mod measurement;

pub use customer::Customer;
pub use form::*;
pub use id::*;
pub use measurement::*;
