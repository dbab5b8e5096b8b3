use anyhow::Result;

use crate::domain::Complaint;

use super::super::Container;

pub struct ListController<'a> {
    container: &'a Container,
}

impl<'a> ListController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self, user: String) -> Result<String> {
        let use_case = self.container.submit_use_case();
        let complaints = use_case.list_for_user(&user).await?;
        Ok(Self::format_complaints(&user, &complaints))
    }

    fn format_complaints(user: &str, complaints: &[Complaint]) -> String {
        if complaints.is_empty() {
            return format!("No complaints filed by {}.", user);
        }

        let mut output = format!("Complaints filed by {} ({}):\n", user, complaints.len());
        for complaint in complaints {
            output.push_str(&format!(
                "\n  {} [{}] {}\n    Category: {}\n",
                complaint.complaint_id(),
                complaint.status(),
                complaint.title(),
                complaint.category(),
            ));
        }
        output
    }
}
