//! HTTP surface for the store dashboard.

pub mod app;
pub mod middleware;
