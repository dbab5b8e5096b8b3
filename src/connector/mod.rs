//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Generative-text provider (Gemini over HTTP, plus an offline mock)
//! - Categorization on top of the provider
//! - Complaint storage (in-memory and JSON file)
//! - The HTTP relay server and the CLI wiring

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
