use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::ComplaintRepository;
use crate::domain::{Complaint, ComplaintStatus, DomainError};

use super::in_memory_complaint_repository::sort_newest_first;

/// Complaint store backed by a JSON array on disk.
///
/// The whole file is loaded on open and rewritten after every mutation. A
/// missing file is treated as an empty store and created on first write.
pub struct JsonFileComplaintRepository {
    path: PathBuf,
    complaints: Mutex<Vec<Complaint>>,
}

impl JsonFileComplaintRepository {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();

        let complaints = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str::<Vec<Complaint>>(&contents).map_err(|e| {
                DomainError::storage(format!("Failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No complaint file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        debug!(
            "Loaded {} complaints from {}",
            complaints.len(),
            path.display()
        );

        Ok(Self {
            path,
            complaints: Mutex::new(complaints),
        })
    }

    /// Apply `change` to one complaint on a copy of the store. Memory is only
    /// updated once the copy has been written to disk.
    async fn modify<F>(&self, id: &str, change: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Complaint) -> Result<(), DomainError>,
    {
        let mut complaints = self.complaints.lock().await;
        let mut next = complaints.clone();
        let complaint = next
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| DomainError::not_found(format!("Complaint {id}")))?;
        change(complaint)?;

        self.persist(&next).await?;
        *complaints = next;
        Ok(())
    }

    async fn persist(&self, complaints: &[Complaint]) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(complaints)
            .map_err(|e| DomainError::storage(format!("Failed to serialize complaints: {e}")))?;

        // Temp file plus rename: readers never see a half-written array
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ComplaintRepository for JsonFileComplaintRepository {
    async fn save(&self, complaint: &Complaint) -> Result<(), DomainError> {
        let mut complaints = self.complaints.lock().await;
        let mut next = complaints.clone();
        match next.iter_mut().find(|c| c.id() == complaint.id()) {
            Some(existing) => *existing = complaint.clone(),
            None => next.push(complaint.clone()),
        }
        self.persist(&next).await?;
        *complaints = next;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Complaint>, DomainError> {
        let complaints = self.complaints.lock().await;
        Ok(complaints.iter().find(|c| c.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Complaint>, DomainError> {
        let mut all = self.complaints.lock().await.clone();
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Complaint>, DomainError> {
        let complaints = self.complaints.lock().await;
        let mut mine: Vec<Complaint> = complaints
            .iter()
            .filter(|c| c.user_id() == user_id)
            .cloned()
            .collect();
        sort_newest_first(&mut mine);
        Ok(mine)
    }

    async fn update_category(&self, id: &str, category: &str) -> Result<(), DomainError> {
        self.modify(id, |complaint| {
            complaint.set_category(category);
            Ok(())
        })
        .await
    }

    async fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<(), DomainError> {
        self.modify(id, |complaint| complaint.transition_to(status))
            .await
    }
}
