use crate::client::{AsanaClient, require_id, segment};
use crate::encoding::{json_data_body, to_pairs, with_query};
use crate::error::Result;
use crate::models::{SearchRequest, Task, TaskRequest};
use crate::pagination::{CancelHandle, PageStream};

/// 認証ユーザー自身を表す担当者
pub const ME: &str = "me";

pub(crate) fn my_tasks_path(request: Option<TaskRequest>) -> Result<String> {
    let mut request = request.unwrap_or_default();
    request.assignee = Some(ME.to_string());
    request.fill_with_defaults();
    Ok(with_query("/tasks", &to_pairs(&request)?))
}

pub(crate) fn project_tasks_path(request: &TaskRequest) -> Result<String> {
    let project_id = require_id(request.project_id.as_deref().unwrap_or_default(), "projectID")?;

    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(limit) = request.limit.filter(|l| *l > 0) {
        query.push(("limit", limit.to_string()));
    }
    if let Some(since) = &request.completed_since {
        query.push(("completed_since", since.clone()));
    }
    Ok(with_query(&format!("/projects/{}/tasks", segment(project_id)), &query))
}

pub(crate) fn search_tasks_path(workspace_id: &str, search: &SearchRequest) -> Result<String> {
    let workspace_id = require_id(workspace_id, "workspaceID")?;
    Ok(with_query(
        &format!("/workspaces/{}/tasks/search", segment(workspace_id)),
        search.fields(),
    ))
}

impl AsanaClient {
    /// タスクを作成する。読み取り専用フィールドは送信前に除去される
    pub async fn create_task(&self, request: &TaskRequest) -> Result<Task> {
        let body = json_data_body(request)?;
        self.post_one(&self.url_for("/tasks"), body, "task").await
    }

    pub async fn find_task_by_id(&self, task_id: &str) -> Result<Task> {
        let task_id = require_id(task_id, "taskID")?;
        self.get_one(&format!("/tasks/{}", segment(task_id)), "task", task_id)
            .await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        let task_id = require_id(task_id, "taskID")?;
        self.delete(&format!("/tasks/{}", segment(task_id))).await
    }

    /// 自分に割り当てられたタスクを一覧する（`limit` 未指定時は20件ずつ）
    pub fn list_my_tasks(
        &self,
        request: Option<TaskRequest>,
    ) -> Result<(PageStream<Task>, CancelHandle)> {
        self.paginate(my_tasks_path(request)?)
    }

    pub fn list_tasks_for_project(
        &self,
        request: &TaskRequest,
    ) -> Result<(PageStream<Task>, CancelHandle)> {
        self.paginate(project_tasks_path(request)?)
    }

    pub fn search_tasks(
        &self,
        workspace_id: &str,
        search: &SearchRequest,
    ) -> Result<(PageStream<Task>, CancelHandle)> {
        self.paginate(search_tasks_path(workspace_id, search)?)
    }
}
