use crate::client::{AsanaClient, require_id, segment};
use crate::encoding::json_data_body;
use crate::error::Result;
use crate::models::{CreateStoryRequest, Story};

impl AsanaClient {
    /// タスクにコメントを追加する
    pub async fn create_story(&self, request: &CreateStoryRequest) -> Result<Story> {
        let task_id = require_id(&request.task_id, "taskID")?;
        let body = json_data_body(request)?;
        let url = self.url_for(&format!("/tasks/{}/stories", segment(task_id)));
        self.post_one(&url, body, "story").await
    }
}
