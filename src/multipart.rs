//! 添付ファイルアップロード用の `multipart/form-data` ボディ

use crate::client::RequestBody;
use crate::error::Result;
use std::io::{Read, Write};

/// ヘッダーのパラメータ値に含まれる `\` と `"` をエスケープする
pub fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

pub struct MultipartWriter {
    boundary: String,
    buf: Vec<u8>,
    parts: usize,
}

impl MultipartWriter {
    pub fn new() -> Self {
        Self::with_boundary(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
            parts: 0,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn open_part(&mut self, headers: &[(&str, String)]) -> Result<()> {
        if self.parts > 0 {
            self.buf.write_all(b"\r\n")?;
        }
        write!(self.buf, "--{}\r\n", self.boundary)?;
        for (name, value) in headers {
            write!(self.buf, "{}: {}\r\n", name, value)?;
        }
        self.buf.write_all(b"\r\n")?;
        self.parts += 1;
        Ok(())
    }

    /// 任意のヘッダーを持つパートを書き込み、コピーしたバイト数を返す
    pub fn write_part<R: Read + ?Sized>(
        &mut self,
        headers: &[(&str, String)],
        reader: &mut R,
    ) -> Result<u64> {
        self.open_part(headers)?;
        Ok(std::io::copy(reader, &mut self.buf)?)
    }

    pub fn write_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.open_part(&[(
            "Content-Disposition",
            format!("form-data; name=\"{}\"", escape_quotes(name)),
        )])?;
        self.buf.write_all(value.as_bytes())?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<RequestBody> {
        if self.parts > 0 {
            self.buf.write_all(b"\r\n")?;
        }
        write!(self.buf, "--{}--\r\n", self.boundary)?;
        Ok(RequestBody {
            content_type: self.content_type(),
            bytes: self.buf,
        })
    }
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// `file` パートと `type` フィールドを持つアップロード用ボディを組み立てる
pub fn attachment_body<R: Read + ?Sized>(
    writer: MultipartWriter,
    content_type: &str,
    filename: &str,
    file: &mut R,
) -> Result<RequestBody> {
    let mut writer = writer;
    writer.write_part(
        &[
            (
                "Content-Disposition",
                format!(
                    "form-data; name=\"file\"; type=\"{}\"; filename=\"{}\"",
                    escape_quotes(content_type),
                    escape_quotes(filename)
                ),
            ),
            ("Content-Type", content_type.to_string()),
        ],
        file,
    )?;
    writer.write_field("type", content_type)?;
    writer.finish()
}
