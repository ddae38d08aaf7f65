use serde::{Deserialize, Serialize};

/// Outcome summary shown after a scrape or bulk scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StatusRecord {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Progress and result of the current or last file upload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadState {
    pub uploading: bool,
    /// Percentage, 0 to 100.
    pub progress: u8,
    pub file_name: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Editable input fields of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputDrafts {
    pub message: String,
    pub scrape_url: String,
    pub bulk_scrape_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftField {
    Message,
    ScrapeUrl,
    BulkScrapeUrl,
}

impl InputDrafts {
    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Message => &mut self.message,
            DraftField::ScrapeUrl => &mut self.scrape_url,
            DraftField::BulkScrapeUrl => &mut self.bulk_scrape_url,
        }
    }

    pub fn clear(&mut self, field: DraftField) {
        self.field_mut(field).clear();
    }
}
