//! Repository layer: query functions organized by domain.

pub mod accounts;
pub mod applications;
pub mod market;
pub mod users;
