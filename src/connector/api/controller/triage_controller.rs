use anyhow::Result;

use crate::domain::Complaint;

use super::super::Container;

pub struct TriageController<'a> {
    container: &'a Container,
}

impl<'a> TriageController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn triage(&self) -> Result<String> {
        let use_case = self.container.triage_use_case();
        let complaints = use_case.execute().await?;
        Ok(self.format_complaints(&complaints))
    }

    fn format_complaints(&self, complaints: &[Complaint]) -> String {
        if complaints.is_empty() {
            return "No open complaints.".to_string();
        }

        let mut output = format!("Open complaints ({}):\n", complaints.len());
        for complaint in complaints {
            output.push_str(&format!(
                "\n  {} [{}] {}\n    Category: {}\n",
                complaint.complaint_id(),
                complaint.status(),
                complaint.title(),
                complaint.category(),
            ));
            if !complaint.room().is_empty() {
                output.push_str(&format!("    Room: {}\n", complaint.room()));
            }
            if !complaint.which_lab().is_empty() {
                output.push_str(&format!("    Lab: {}\n", complaint.which_lab()));
            }
            output.push_str(&format!("    {}\n", complaint.description()));
            if let Some(url) = complaint.image_url() {
                output.push_str(&format!("    Evidence: {}\n", url));
            }
        }
        output
    }
}
