pub mod categorize_controller;
pub mod chat_controller;
pub mod list_controller;
pub mod status_controller;
pub mod submit_controller;
pub mod triage_controller;

pub use categorize_controller::CategorizeController;
pub use chat_controller::ChatController;
pub use list_controller::ListController;
pub use status_controller::StatusController;
pub use submit_controller::SubmitController;
pub use triage_controller::TriageController;
