use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NamedEntity;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub gid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_text: Option<String>,
    #[serde(rename = "is_pinned")]
    pub pinned: bool,
    #[serde(rename = "sticker_name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<NamedEntity>,
}

/// コメント（ストーリー）作成リクエスト。`task_id` はパスに使われ、ボディには含まれない
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStoryRequest {
    #[serde(skip)]
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_text: Option<String>,
    #[serde(rename = "is_pinned")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(rename = "sticker_name")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<String>,
}

impl CreateStoryRequest {
    pub fn text(task_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }
}
