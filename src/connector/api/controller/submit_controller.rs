use anyhow::Result;

use crate::domain::NewComplaint;

use super::super::Container;

pub struct SubmitController<'a> {
    container: &'a Container,
}

impl<'a> SubmitController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn submit(&self, input: NewComplaint) -> Result<String> {
        let use_case = self.container.submit_use_case();
        let complaint = use_case.execute(input).await?;

        Ok(format!(
            "Complaint submitted: {} ({})\n  Category: {}\n  Status:   {}",
            complaint.complaint_id(),
            complaint.id(),
            complaint.category(),
            complaint.status()
        ))
    }
}
