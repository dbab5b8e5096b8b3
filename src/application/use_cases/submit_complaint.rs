use std::sync::Arc;

use tracing::info;

use crate::application::ComplaintRepository;
use crate::domain::{Complaint, DomainError, NewComplaint};

pub struct SubmitComplaintUseCase {
    complaint_repo: Arc<dyn ComplaintRepository>,
}

impl SubmitComplaintUseCase {
    pub fn new(complaint_repo: Arc<dyn ComplaintRepository>) -> Self {
        Self { complaint_repo }
    }

    pub async fn execute(&self, input: NewComplaint) -> Result<Complaint, DomainError> {
        let complaint = Complaint::submit(input)?;
        self.complaint_repo.save(&complaint).await?;

        info!(
            "Complaint {} filed under \"{}\"",
            complaint.complaint_id(),
            complaint.category()
        );

        Ok(complaint)
    }

    /// Complaints filed by one user. An empty user id matches nothing.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Complaint>, DomainError> {
        if user_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.complaint_repo.list_by_user(user_id).await
    }
}
