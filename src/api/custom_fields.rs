use crate::client::{AsanaClient, require_id, segment};
use crate::encoding::json_data_body;
use crate::error::Result;
use crate::models::{CreateCustomFieldRequest, CustomField, CustomFieldSettings};
use crate::pagination::{CancelHandle, PageStream, Paginated};

impl Paginated for CustomFieldSettings {
    const OPT_FIELDS: &'static [&'static str] = &[
        "custom_field.name",
        "custom_field.resource_subtype",
        "is_important",
        "parent.name",
    ];
}

pub(crate) fn workspace_custom_fields_path(workspace_id: &str) -> Result<String> {
    let workspace_id = require_id(workspace_id, "workspaceID")?;
    Ok(format!("/workspaces/{}/custom_fields", segment(workspace_id)))
}

pub(crate) fn project_custom_field_settings_path(project_id: &str) -> Result<String> {
    let project_id = require_id(project_id, "projectID")?;
    Ok(format!("/projects/{}/custom_field_settings", segment(project_id)))
}

impl AsanaClient {
    pub async fn create_custom_field(
        &self,
        request: &CreateCustomFieldRequest,
    ) -> Result<CustomField> {
        let body = json_data_body(request)?;
        self.post_one(&self.url_for("/custom_fields"), body, "custom field")
            .await
    }

    pub async fn get_custom_field(&self, custom_field_id: &str) -> Result<CustomField> {
        let custom_field_id = require_id(custom_field_id, "custom_field")?;
        self.get_one(
            &format!("/custom_fields/{}", segment(custom_field_id)),
            "custom field",
            custom_field_id,
        )
        .await
    }

    pub fn list_custom_fields_for_workspace(
        &self,
        workspace_id: &str,
    ) -> Result<(PageStream<CustomField>, CancelHandle)> {
        self.paginate(workspace_custom_fields_path(workspace_id)?)
    }

    pub fn list_custom_field_settings_for_project(
        &self,
        project_id: &str,
    ) -> Result<(PageStream<CustomFieldSettings>, CancelHandle)> {
        self.paginate(project_custom_field_settings_path(project_id)?)
    }
}
