//! # Application Layer
//!
//! Use cases and orchestration logic coordinating domain and connector layers.

pub mod interfaces;
pub mod retry;
pub mod use_cases;

pub use interfaces::*;
pub use retry::*;
pub use use_cases::*;
