use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_APP_NAME: &str = "Hydraulic Compressor Videos";

/// Longest accepted display name, in characters.
pub const MAX_NAME_LEN: usize = 200;
/// Longest accepted source URL, in characters.
pub const MAX_URL_LEN: usize = 400;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: u64,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub video_id: String,
    pub created_at: DateTime<Utc>,
}

/// The caller-supplied fields of a bookmark. The video ID is never part of
/// this; the store derives it from `url` on every write.
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub name: String,
    pub url: String,
    pub notes: Option<String>,
}

impl NewBookmark {
    pub fn new(name: impl Into<String>, url: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            notes: notes.filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub app_name: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            log_level: "info".to_string(),
        }
    }
}
