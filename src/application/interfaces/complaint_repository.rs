use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintStatus, DomainError};

/// Persistence for complaint records.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn save(&self, complaint: &Complaint) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Complaint>, DomainError>;

    /// All complaints, newest first.
    async fn list(&self) -> Result<Vec<Complaint>, DomainError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Complaint>, DomainError>;

    async fn update_category(&self, id: &str, category: &str) -> Result<(), DomainError>;

    async fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<(), DomainError>;
}
