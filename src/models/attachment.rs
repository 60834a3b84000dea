use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Seek};

use super::NamedEntity;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub gid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// 読み取り専用。asana, dropbox, gdrive, box のいずれか
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// 添付先のタスク
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NamedEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
}

/// シーク可能な読み出し元
pub trait SeekRead: Read + Seek {}

impl<T: Read + Seek> SeekRead for T {}

/// アップロードするバイト列の読み出し元
pub enum UploadBody {
    /// 先頭を読んだ後に巻き戻せる読み出し元（ファイルなど）
    Seekable(Box<dyn SeekRead + Send>),
    /// 一方向のストリーム。判定に使った先頭部分は再結合される
    Stream(Box<dyn Read + Send>),
}

impl UploadBody {
    pub fn seekable<R: Read + Seek + Send + 'static>(reader: R) -> Self {
        UploadBody::Seekable(Box::new(reader))
    }

    pub fn stream<R: Read + Send + 'static>(reader: R) -> Self {
        UploadBody::Stream(Box::new(reader))
    }
}

impl fmt::Debug for UploadBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadBody::Seekable(_) => f.write_str("UploadBody::Seekable(<reader>)"),
            UploadBody::Stream(_) => f.write_str("UploadBody::Stream(<reader>)"),
        }
    }
}

/// タスクへの添付ファイルのアップロード
///
/// `body` と `task_id` は必須。`name` が空の場合はランダムなファイル名が使われる。
#[derive(Debug, Default)]
pub struct AttachmentUpload {
    pub body: Option<UploadBody>,
    pub task_id: String,
    pub name: String,
}

impl AttachmentUpload {
    pub fn new(task_id: impl Into<String>, body: UploadBody) -> Self {
        Self {
            body: Some(body),
            task_id: task_id.into(),
            name: String::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn non_blank_filename(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_attachment_deserialization() {
        let attachment: Attachment = serde_json::from_value(json!({
            "gid": "300",
            "name": "diagram.png",
            "host": "asana",
            "download_url": null,
            "view_url": "https://app.asana.com/app/asana/-/get_asset?asset_id=300",
            "parent": {"gid": "1001", "name": "Write release notes"}
        }))
        .unwrap();

        assert_eq!(attachment.name.as_deref(), Some("diagram.png"));
        assert!(attachment.download_url.is_none());
        assert_eq!(attachment.parent.unwrap().gid, "1001");
    }

    #[test]
    fn test_non_blank_filename() {
        let upload = AttachmentUpload::new("1", UploadBody::seekable(Cursor::new(vec![1u8])));
        let generated = upload.non_blank_filename();
        assert!(uuid::Uuid::parse_str(&generated).is_ok());

        let named = upload.name("report.pdf");
        assert_eq!(named.non_blank_filename(), "report.pdf");
    }
}
