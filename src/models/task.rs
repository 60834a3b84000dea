use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CalendarDate, CustomField, Membership, NamedEntity, Project, Tag, User};
use crate::pagination::Paginated;

/// タスクの外部データ（`external`）
pub type Metadata = HashMap<String, serde_json::Value>;

/// 担当者から見たタスクの区分。未知の値（`"new"` など）は `Other` にそのまま保持される
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssigneeStatus {
    #[default]
    Inbox,
    Later,
    Today,
    Upcoming,
    #[serde(untagged)]
    Other(String),
}

impl AssigneeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AssigneeStatus::Inbox => "inbox",
            AssigneeStatus::Later => "later",
            AssigneeStatus::Today => "today",
            AssigneeStatus::Upcoming => "upcoming",
            AssigneeStatus::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub gid: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<NamedEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_status: Option<AssigneeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub custom_fields: Vec<CustomField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<CalendarDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(rename = "external")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub followers: Vec<User>,
    #[serde(rename = "hearted")]
    pub hearted_by_me: bool,
    pub hearts: Vec<NamedEntity>,
    #[serde(rename = "num_hearts")]
    pub heart_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub projects: Vec<Project>,
    #[serde(rename = "parent")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task: Option<Box<Task>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<NamedEntity>,
    pub memberships: Vec<Membership>,
    pub tags: Vec<Tag>,
}

impl Paginated for Task {
    const OPT_FIELDS: &'static [&'static str] = &[
        "name",
        "assignee",
        "created_at",
        "completed",
        "completed_at",
        "assignee_status",
        "custom_fields",
        "due_on",
        "due_at",
        "external",
        "followers.name",
        "followers.email",
        "hearted",
        "hearts",
        "num_hearts",
        "modified_at",
        "tags.name",
        "tags.color",
        "projects.name",
        "projects.custom_fields",
    ];
}

pub const DEFAULT_TASK_LIMIT: u32 = 20;

/// タスクの作成・一覧取得に使うリクエスト記述子
///
/// 一覧取得ではクエリ文字列に、作成では `{"data": ...}` のJSONボディに変換される。
/// `num_hearts` は読み取り専用のため送信前に除去される。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(rename = "project")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_status: Option<AssigneeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<HashMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<CalendarDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(rename = "external")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub followers: Vec<String>,
    #[serde(rename = "hearted")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hearted_by_me: Option<bool>,
    #[serde(rename = "num_hearts")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(rename = "parent")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub memberships: Vec<Membership>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TaskRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace = Some(workspace_id.into());
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn due_on(mut self, due_on: CalendarDate) -> Self {
        self.due_on = Some(due_on);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// 未設定または0の `limit` に既定値を入れる
    pub(crate) fn fill_with_defaults(&mut self) {
        if self.limit.unwrap_or(0) == 0 {
            self.limit = Some(DEFAULT_TASK_LIMIT);
        }
    }
}
