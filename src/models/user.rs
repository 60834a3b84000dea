use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::NamedEntity;
use crate::pagination::Paginated;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub gid: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub workspaces: Vec<NamedEntity>,
}

impl Paginated for User {
    const OPT_FIELDS: &'static [&'static str] = &["name", "email", "photo", "workspaces.name"];
}
