use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;
use crate::domain::DomainError;

/// Submission categories that carry a room number.
const ROOM_CATEGORIES: &[&str] = &["Hostel", "Classroom", "Lab Equipment"];
const LAB_CATEGORY: &str = "Lab Equipment";

/// Lifecycle of a complaint as seen by administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "pending" => Ok(ComplaintStatus::Pending),
            "in progress" | "inprogress" => Ok(ComplaintStatus::InProgress),
            "completed" | "complete" | "done" => Ok(ComplaintStatus::Completed),
            other => Err(DomainError::invalid_input(format!(
                "Unknown complaint status '{other}'"
            ))),
        }
    }

    /// Sort key for the admin list: open work first.
    pub fn priority(&self) -> u8 {
        match self {
            ComplaintStatus::Pending => 1,
            ComplaintStatus::InProgress => 2,
            ComplaintStatus::Completed => 3,
        }
    }

    pub fn can_transition_to(&self, next: ComplaintStatus) -> bool {
        matches!(
            (self, next),
            (ComplaintStatus::Pending, ComplaintStatus::InProgress)
                | (ComplaintStatus::Pending, ComplaintStatus::Completed)
                | (ComplaintStatus::InProgress, ComplaintStatus::Completed)
        )
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student complaint. Field names follow the stored document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    id: String,
    #[serde(default)]
    complaint_id: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    room: String,
    #[serde(default)]
    which_lab: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    status: ComplaintStatus,
    #[serde(default)]
    created_at: i64,
}

/// Input for filing a new complaint.
#[derive(Debug, Clone, Default)]
pub struct NewComplaint {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub room: Option<String>,
    pub which_lab: Option<String>,
    pub image_url: Option<String>,
}

impl Complaint {
    /// Validate a submission and turn it into a pending complaint.
    pub fn submit(input: NewComplaint) -> Result<Self, DomainError> {
        if input.title.trim().is_empty() {
            return Err(DomainError::invalid_input("Complaint title is required"));
        }
        if input.description.trim().is_empty() {
            return Err(DomainError::invalid_input(
                "Complaint description is required",
            ));
        }

        let category = input
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| Category::Other.as_str().to_string());

        let room = if ROOM_CATEGORIES.contains(&category.as_str()) {
            input.room.unwrap_or_default()
        } else {
            String::new()
        };
        let which_lab = if category == LAB_CATEGORY {
            input.which_lab.unwrap_or_default()
        } else {
            String::new()
        };

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            complaint_id: generate_complaint_id(),
            user_id: input.user_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category,
            room,
            which_lab,
            image_url: input.image_url.unwrap_or_default(),
            status: ComplaintStatus::Pending,
            created_at: current_timestamp(),
        })
    }

    /// Reconstitutes from persisted data (used by adapters and tests).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: String,
        complaint_id: String,
        user_id: String,
        title: String,
        description: String,
        category: String,
        room: String,
        which_lab: String,
        image_url: Option<String>,
        status: ComplaintStatus,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            complaint_id,
            user_id,
            title,
            description,
            category,
            room,
            which_lab,
            image_url: image_url.unwrap_or_default(),
            status,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-facing complaint number. Older records without one show their
    /// storage id instead.
    pub fn complaint_id(&self) -> &str {
        if self.complaint_id.is_empty() {
            &self.id
        } else {
            &self.complaint_id
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn which_lab(&self) -> &str {
        &self.which_lab
    }

    pub fn image_url(&self) -> Option<&str> {
        if self.image_url.is_empty() {
            None
        } else {
            Some(&self.image_url)
        }
    }

    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// True when no meaningful category has been assigned yet.
    pub fn needs_categorization(&self) -> bool {
        let category = self.category.trim();
        category.is_empty() || category == Category::Other.as_str()
    }

    /// Text handed to the categorizer.
    pub fn categorization_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition_to(&mut self, next: ComplaintStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_input(format!(
                "Cannot move complaint {} from {} to {}",
                self.complaint_id(),
                self.status,
                next
            )));
        }
        self.status = next;
        Ok(())
    }
}

fn generate_complaint_id() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("CMP{n}")
}

fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
