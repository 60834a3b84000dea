use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NamedEntity;
use crate::pagination::Paginated;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub gid: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<NamedEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub followers: Vec<NamedEntity>,
}

impl Paginated for Tag {
    const OPT_FIELDS: &'static [&'static str] =
        &["name", "color", "notes", "permalink_url", "workspace.name", "created_at"];
}

/// タグ作成リクエスト（フォームエンコードで送信される）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTagRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub name: String,
    #[serde(rename = "workspace")]
    pub workspace_id: String,
}

impl CreateTagRequest {
    pub fn new(workspace_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            color: None,
            name: name.into(),
            workspace_id: workspace_id.into(),
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
