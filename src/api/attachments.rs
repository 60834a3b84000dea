use crate::client::{AsanaClient, parse_data, require_id, segment};
use crate::encoding::apply_opt_fields;
use crate::error::{Error, Result};
use crate::models::{Attachment, AttachmentUpload};
use crate::multipart::{MultipartWriter, attachment_body};
use crate::sniff::sniff;
use reqwest::Method;

/// アップロード結果として要求するフィールド
pub const UPLOAD_OPT_FIELDS: &[&str] = &["name", "view_url"];

impl AsanaClient {
    pub async fn find_attachment_by_id(&self, attachment_id: &str) -> Result<Attachment> {
        let attachment_id = require_id(attachment_id, "attachmentID")?;
        self.get_one(
            &format!("/attachments/{}", segment(attachment_id)),
            "attachment",
            attachment_id,
        )
        .await
    }

    /// タスクにファイルを添付する
    ///
    /// 先頭512バイトからContent-Typeを判定し、`file` パートと `type` フィールドを
    /// 持つmultipartボディで送信する。`body` が無い場合と `task_id` が空の場合は
    /// リクエストを送らずに検証エラーを返す。
    pub async fn upload_attachment(&self, upload: AttachmentUpload) -> Result<Attachment> {
        let filename = upload.non_blank_filename();
        let AttachmentUpload { body, task_id, .. } = upload;
        let body = body.ok_or_else(|| Error::InvalidInput("expecting a non-nil body".to_string()))?;
        let task_id = require_id(&task_id, "taskID")?;

        let request_body = tokio::task::spawn_blocking(move || {
            let (content_type, mut reader) = sniff(body)?;
            attachment_body(MultipartWriter::new(), content_type, &filename, &mut reader)
        })
        .await
        .map_err(|e| Error::Unexpected(format!("attachment encoding task failed: {}", e)))??;

        let url = apply_opt_fields(
            &self.url_for(&format!("/tasks/{}/attachments", segment(task_id))),
            UPLOAD_OPT_FIELDS,
        )?;
        self.post_one(&url, request_body, "attachment").await
    }

    pub async fn list_attachments_for_task(&self, task_id: &str) -> Result<Vec<Attachment>> {
        let task_id = require_id(task_id, "taskID")?;
        let url = self.url_for(&format!("/tasks/{}/attachments", segment(task_id)));
        let response = self.send(Method::GET, &url, None).await?;
        Ok(parse_data::<Vec<Attachment>>(&response.body)?.unwrap_or_default())
    }
}
