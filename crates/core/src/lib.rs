//! `posdash-core`: shared building blocks for the dashboard crates.
//!
//! Pure types only (no IO): row identifiers and the domain error model.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ExpenseId, LaybyId, ProductId, RefundId, SaleId};
