use std::sync::Arc;

use tracing::info;

use crate::application::ComplaintRepository;
use crate::domain::{Complaint, ComplaintStatus, DomainError};

pub struct UpdateComplaintStatusUseCase {
    complaint_repo: Arc<dyn ComplaintRepository>,
}

impl UpdateComplaintStatusUseCase {
    pub fn new(complaint_repo: Arc<dyn ComplaintRepository>) -> Self {
        Self { complaint_repo }
    }

    pub async fn execute(&self, id: &str, status: ComplaintStatus) -> Result<Complaint, DomainError> {
        let mut complaint = self
            .complaint_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Complaint {id}")))?;

        let previous = complaint.status();
        complaint.transition_to(status)?;
        self.complaint_repo.update_status(id, status).await?;

        info!(
            "Complaint {} moved from {} to {}",
            complaint.complaint_id(),
            previous,
            status
        );

        Ok(complaint)
    }
}
