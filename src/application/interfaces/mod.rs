mod categorizer;
mod chat_client;
mod complaint_repository;

pub use categorizer::*;
pub use chat_client::*;
pub use complaint_repository::*;
