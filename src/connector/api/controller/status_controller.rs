use anyhow::Result;

use crate::domain::ComplaintStatus;

use super::super::Container;

pub struct StatusController<'a> {
    container: &'a Container,
}

impl<'a> StatusController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn set_status(&self, id: String, status: String) -> Result<String> {
        let status = ComplaintStatus::parse(&status)?;
        let use_case = self.container.update_status_use_case();
        let complaint = use_case.execute(&id, status).await?;

        Ok(format!(
            "Complaint {} is now {}.",
            complaint.complaint_id(),
            complaint.status()
        ))
    }
}
