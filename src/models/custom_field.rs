use serde::{Deserialize, Serialize};

use super::NamedEntity;
use crate::pagination::Paginated;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumOption {
    pub gid: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
    pub gid: String,
    pub name: String,
    #[serde(rename = "resource_subtype")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_label_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<EnumOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_value: Option<EnumOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl Paginated for CustomField {
    const OPT_FIELDS: &'static [&'static str] = &[
        "name",
        "resource_subtype",
        "description",
        "enabled",
        "currency_code",
        "custom_label",
        "custom_label_position",
        "format",
        "precision",
        "has_notifications_enabled",
        "enum_options",
    ];
}

/// プロジェクト・ポートフォリオへのカスタムフィールドの設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldSettings {
    pub gid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_field: Option<CustomField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(rename = "is_important")]
    pub important: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NamedEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateEnumOption {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// カスタムフィールド作成リクエスト（`{"data": ...}` のJSONで送信される）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCustomFieldRequest {
    pub name: String,
    #[serde(rename = "resource_subtype")]
    pub field_type: String,
    #[serde(rename = "workspace")]
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_label_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<CreateEnumOption>,
}

impl CreateCustomFieldRequest {
    pub fn new(
        workspace_id: impl Into<String>,
        name: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            workspace_id: workspace_id.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn enum_option(mut self, name: impl Into<String>, color: Option<String>) -> Self {
        self.enum_options.push(CreateEnumOption {
            name: name.into(),
            color,
            enabled: None,
        });
        self
    }
}
