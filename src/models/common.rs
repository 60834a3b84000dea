use serde::{Deserialize, Serialize};

/// 他のリソースから参照される最小限のレコード（`gid` と名前）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub gid: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl NamedEntity {
    pub fn new(gid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            gid: gid.into(),
            name: name.into(),
            resource_type: None,
        }
    }
}

/// タスクのプロジェクト・セクションへの所属
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<NamedEntity>,
}
