//! Error handling for the table core.

pub mod domain;
pub mod store;

pub use domain::DomainError;
pub use store::StoreError;
