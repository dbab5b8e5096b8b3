use serde::{Deserialize, Serialize};
use tracing::warn;

/// The closed set of labels the categorizer is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Electrical,
    Plumbing,
    Network,
    Cleanliness,
    Furniture,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electrical,
        Category::Plumbing,
        Category::Network,
        Category::Cleanliness,
        Category::Furniture,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electrical => "Electrical",
            Category::Plumbing => "Plumbing",
            Category::Network => "Network",
            Category::Cleanliness => "Cleanliness",
            Category::Furniture => "Furniture",
            Category::Other => "Other",
        }
    }

    /// Match a label against the closed set, ignoring case, surrounding
    /// whitespace, quotes and trailing punctuation. Returns `None` when the
    /// label is not one of the known categories.
    pub fn parse(label: &str) -> Option<Self> {
        let cleaned = label
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '`')
            .trim_end_matches(|c: char| c == '.' || c == '!' || c == ',')
            .trim();

        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(cleaned))
    }

    /// Comma-separated list of labels, as it appears in the prompt.
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How provider output is turned into a stored label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryPolicy {
    /// Anything outside the closed set becomes `Other`.
    #[default]
    ClosedSet,
    /// Keep whatever trimmed label the model suggests.
    FreeForm,
}

impl CategoryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryPolicy::ClosedSet => "closed",
            CategoryPolicy::FreeForm => "free",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "closed" | "closed_set" | "strict" => CategoryPolicy::ClosedSet,
            "free" | "free_form" | "freeform" => CategoryPolicy::FreeForm,
            unknown => {
                warn!(
                    "Unknown category mode '{}', defaulting to closed set",
                    unknown
                );
                CategoryPolicy::ClosedSet
            }
        }
    }

    /// Turn raw model text into the label to store. Empty text is always
    /// the fallback label.
    pub fn apply(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Category::Other.as_str().to_string();
        }

        match self {
            CategoryPolicy::ClosedSet => Category::parse(trimmed)
                .unwrap_or(Category::Other)
                .as_str()
                .to_string(),
            CategoryPolicy::FreeForm => trimmed.to_string(),
        }
    }
}
