//! User-facing notices emitted when an operation fails recoverably.

use serde::Serialize;

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A hint; the user can carry on.
    #[default]
    Info,
    /// Something the user asked for did not happen.
    Destructive,
}

/// A `{title, description, severity}` triple for the notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Short headline.
    pub title: String,
    /// One-line explanation or suggestion.
    pub description: String,
    /// Display severity.
    pub severity: Severity,
}

impl Notice {
    /// Create an informational notice.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    /// Create a destructive notice.
    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    /// The notice for a selection-gated operation attempted while idle.
    #[must_use]
    pub fn nothing_selected(action: &str) -> Self {
        Self::info(
            "No object selected",
            format!("Please select an object to {action}"),
        )
    }

    /// The notice for a bitmap that could not be fetched or decoded.
    #[must_use]
    pub fn image_load_failed() -> Self {
        Self::destructive("Error loading image", "Failed to load the image")
    }

    /// The notice for an export that could not be encoded.
    #[must_use]
    pub fn export_failed() -> Self {
        Self::destructive("Error downloading image", "Please try again")
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
