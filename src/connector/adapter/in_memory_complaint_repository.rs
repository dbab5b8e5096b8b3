use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ComplaintRepository;
use crate::domain::{Complaint, ComplaintStatus, DomainError};

pub struct InMemoryComplaintRepository {
    complaints: Arc<Mutex<HashMap<String, Complaint>>>,
}

impl InMemoryComplaintRepository {
    pub fn new() -> Self {
        Self {
            complaints: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryComplaintRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first; ties broken by id so the order is stable.
pub(crate) fn sort_newest_first(complaints: &mut [Complaint]) {
    complaints.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn save(&self, complaint: &Complaint) -> Result<(), DomainError> {
        let mut store = self.complaints.lock().await;
        store.insert(complaint.id().to_string(), complaint.clone());
        debug!("Saved complaint {} to memory", complaint.complaint_id());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Complaint>, DomainError> {
        let store = self.complaints.lock().await;
        Ok(store.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Complaint>, DomainError> {
        let store = self.complaints.lock().await;
        let mut all: Vec<Complaint> = store.values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Complaint>, DomainError> {
        let store = self.complaints.lock().await;
        let mut mine: Vec<Complaint> = store
            .values()
            .filter(|c| c.user_id() == user_id)
            .cloned()
            .collect();
        sort_newest_first(&mut mine);
        Ok(mine)
    }

    async fn update_category(&self, id: &str, category: &str) -> Result<(), DomainError> {
        let mut store = self.complaints.lock().await;
        let complaint = store
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Complaint {id}")))?;
        complaint.set_category(category);
        Ok(())
    }

    async fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<(), DomainError> {
        let mut store = self.complaints.lock().await;
        let complaint = store
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Complaint {id}")))?;
        complaint.transition_to(status)
    }
}
