mod chat_relay;
mod submit_complaint;
mod triage_complaints;
mod update_complaint_status;

pub use chat_relay::*;
pub use submit_complaint::*;
pub use triage_complaints::*;
pub use update_complaint_status::*;
