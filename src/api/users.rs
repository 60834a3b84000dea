use crate::client::{AsanaClient, require_id, segment};
use crate::error::Result;
use crate::models::User;
use crate::pagination::{CancelHandle, PageStream};

pub(crate) const ALL_USERS_PATH: &str = "/users";

pub(crate) fn workspace_users_path(workspace_id: &str) -> Result<String> {
    let workspace_id = require_id(workspace_id, "workspaceID")?;
    Ok(format!("/workspaces/{}/users", segment(workspace_id)))
}

impl AsanaClient {
    /// ユーザーを取得する。`"me"` で認証ユーザー自身
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let user_id = require_id(user_id, "userID")?;
        self.get_one(&format!("/users/{}", segment(user_id)), "user", user_id)
            .await
    }

    pub fn list_all_users(&self) -> Result<(PageStream<User>, CancelHandle)> {
        self.paginate(ALL_USERS_PATH.to_string())
    }

    pub fn list_users_for_workspace(
        &self,
        workspace_id: &str,
    ) -> Result<(PageStream<User>, CancelHandle)> {
        self.paginate(workspace_users_path(workspace_id)?)
    }
}
