//! # Domain Layer
//!
//! Complaint, category and generation models plus the error taxonomy.
//! This layer is independent of external frameworks and infrastructure.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
