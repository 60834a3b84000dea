use crate::client::{AsanaClient, require_id, segment};
use crate::error::Result;
use crate::models::Workspace;
use crate::pagination::{CancelHandle, PageStream};

pub(crate) const MY_WORKSPACES_PATH: &str = "/workspaces";

impl AsanaClient {
    pub async fn get_workspace(&self, workspace_id: &str) -> Result<Workspace> {
        let workspace_id = require_id(workspace_id, "workspaceID")?;
        self.get_one(
            &format!("/workspaces/{}", segment(workspace_id)),
            "workspace",
            workspace_id,
        )
        .await
    }

    pub fn list_my_workspaces(&self) -> Result<(PageStream<Workspace>, CancelHandle)> {
        self.paginate(MY_WORKSPACES_PATH.to_string())
    }
}
