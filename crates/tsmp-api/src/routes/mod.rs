//! API route modules, organized by domain.

pub mod admin;
pub mod health;
pub mod market;
