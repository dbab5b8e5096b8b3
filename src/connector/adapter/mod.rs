mod gemini_client;
mod in_memory_complaint_repository;
mod json_file_complaint_repository;
mod llm_categorizer;
mod mock_chat_client;
pub mod relay;

pub use gemini_client::*;
pub use in_memory_complaint_repository::*;
pub use json_file_complaint_repository::*;
pub use llm_categorizer::*;
pub use mock_chat_client::*;
