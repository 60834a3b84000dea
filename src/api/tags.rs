use crate::client::{AsanaClient, require_id, segment};
use crate::encoding::form_body;
use crate::error::Result;
use crate::models::{CreateTagRequest, Tag};
use crate::pagination::{CancelHandle, PageStream};

pub(crate) const ALL_TAGS_PATH: &str = "/tags";

pub(crate) fn workspace_tags_path(workspace_id: &str) -> Result<String> {
    let workspace_id = require_id(workspace_id, "workspaceID")?;
    Ok(format!("/workspaces/{}/tags", segment(workspace_id)))
}

impl AsanaClient {
    /// タグを作成する（フォームエンコード）
    pub async fn create_tag(&self, request: &CreateTagRequest) -> Result<Tag> {
        let body = form_body(request)?;
        self.post_one(&self.url_for("/tags"), body, "tag").await
    }

    pub async fn get_tag(&self, tag_id: &str) -> Result<Tag> {
        let tag_id = require_id(tag_id, "tagID")?;
        self.get_one(&format!("/tags/{}", segment(tag_id)), "tag", tag_id)
            .await
    }

    pub fn list_all_tags(&self) -> Result<(PageStream<Tag>, CancelHandle)> {
        self.paginate(ALL_TAGS_PATH.to_string())
    }

    pub fn list_tags_for_workspace(
        &self,
        workspace_id: &str,
    ) -> Result<(PageStream<Tag>, CancelHandle)> {
        self.paginate(workspace_tags_path(workspace_id)?)
    }
}
