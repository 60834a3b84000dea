use serde::{Deserialize, Serialize};

use crate::pagination::Paginated;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub gid: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email_domains: Vec<String>,
    pub is_organization: bool,
}

impl Paginated for Workspace {
    const OPT_FIELDS: &'static [&'static str] = &["name", "email_domains", "is_organization"];
}
