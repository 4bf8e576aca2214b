//! Share and export payloads

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{HistoryEntry, Preferences, RatingRecord, Restaurant};

/// Text handed to a platform share mechanism or the clipboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    /// Clipboard form: text and URL on separate lines
    pub fn clipboard_text(&self) -> String {
        format!("{}\n{}", self.text, self.url)
    }
}

/// Full dump of local user data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub version: u32,
    pub exported_at: DateTime<Local>,
    pub history: Vec<HistoryEntry>,
    pub favorites: Vec<Restaurant>,
    pub preferences: Preferences,

    #[serde(default)]
    pub ratings: Vec<RatingRecord>,
}
