//! アップロードするバイト列のContent-Type判定
//!
//! 先頭の最大512バイトだけを見て判定し、読み出し元は欠けることなく復元する。

use crate::error::{Error, Result};
use crate::models::UploadBody;
use std::io::{Cursor, Read, Seek, SeekFrom};

pub const SNIFF_LEN: usize = 512;

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

const EXACT_SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"\xFE\xFF", "text/plain; charset=utf-16be"),
    (b"\xFF\xFE", "text/plain; charset=utf-16le"),
    (b"\xEF\xBB\xBF", TEXT_PLAIN),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"\x00\x00\x02\x00", "image/x-icon"),
    (b"OggS\x00", "application/ogg"),
    (b"ID3", "audio/mpeg"),
    (b"\x1A\x45\xDF\xA3", "video/webm"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    (b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    (b"\x00asm", "application/wasm"),
];

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

fn html_match(data: &[u8], tag: &[u8]) -> bool {
    if data.len() < tag.len() + 1 {
        return false;
    }
    let prefix_matches = data
        .iter()
        .zip(tag)
        .all(|(d, t)| d.to_ascii_uppercase() == *t);
    let terminator = data[tag.len()];
    prefix_matches && (terminator == b' ' || terminator == b'>')
}

/// 先頭バイト列からContent-Typeを判定する。判定できない場合は `application/octet-stream`
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let first_non_ws = data.iter().position(|b| !is_whitespace(*b)).unwrap_or(data.len());
    let trimmed = &data[first_non_ws..];
    if HTML_TAGS.iter().any(|tag| html_match(trimmed, tag)) {
        return "text/html; charset=utf-8";
    }
    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    if let Some((_, content_type)) = EXACT_SIGNATURES.iter().find(|(sig, _)| data.starts_with(sig)) {
        return *content_type;
    }

    if data.len() >= 12 && data.starts_with(b"RIFF") {
        match &data[8..12] {
            b"WEBP" => return "image/webp",
            b"WAVE" => return "audio/wave",
            b"AVI " => return "video/avi",
            _ => {}
        }
    }
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return "video/mp4";
    }

    if data.is_empty() || data.iter().any(|b| is_binary(*b)) {
        return OCTET_STREAM;
    }
    TEXT_PLAIN
}

fn read_prefix<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    reader.take(SNIFF_LEN as u64).read_to_end(&mut prefix)?;
    if prefix.is_empty() {
        return Err(Error::InvalidInput("attachment body is empty".to_string()));
    }
    Ok(prefix)
}

/// 読み出し元の先頭を判定し、Content-Typeと元と同一のバイト列を返す読み出し元を返す。
///
/// シーク可能なら読んだ分だけ巻き戻す。巻き戻せない場合や一方向のストリームでは
/// 判定に使った先頭部分を残りの前に連結する。
pub fn sniff(body: UploadBody) -> Result<(&'static str, Box<dyn Read + Send>)> {
    match body {
        UploadBody::Seekable(mut reader) => {
            let prefix = read_prefix(&mut reader)?;
            let content_type = detect_content_type(&prefix);
            match reader.seek(SeekFrom::Current(-(prefix.len() as i64))) {
                Ok(_) => Ok((content_type, Box::new(reader))),
                Err(_) => Ok((content_type, Box::new(Cursor::new(prefix).chain(reader)))),
            }
        }
        UploadBody::Stream(mut reader) => {
            let prefix = read_prefix(&mut reader)?;
            let content_type = detect_content_type(&prefix);
            Ok((content_type, Box::new(Cursor::new(prefix).chain(reader))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00\x00\x0DIHDR";

    /// Seekを持たない読み出し元
    struct OneWay(Cursor<Vec<u8>>);

    impl Read for OneWay {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.0.read(buf)
        }
    }

    /// 1回の読み出しで少しずつしか返さない読み出し元
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(7);
            self.0.read(&mut buf[..n])
        }
    }

    fn png_bytes(len: usize) -> Vec<u8> {
        let mut data = PNG_HEADER.to_vec();
        data.extend((0..len).map(|i| (i % 251) as u8));
        data
    }

    #[test]
    fn test_detect_content_type() {
        assert_eq!(detect_content_type(PNG_HEADER), "image/png");
        assert_eq!(detect_content_type(b"\xFF\xD8\xFF\xE0"), "image/jpeg");
        assert_eq!(detect_content_type(b"GIF89a...."), "image/gif");
        assert_eq!(detect_content_type(b"%PDF-1.7"), "application/pdf");
        assert_eq!(detect_content_type(b"PK\x03\x04rest"), "application/zip");
        assert_eq!(detect_content_type(b"  <html><body>"), "text/html; charset=utf-8");
        assert_eq!(detect_content_type(b"<?xml version=\"1.0\"?>"), "text/xml; charset=utf-8");
        assert_eq!(detect_content_type(b"hello, world\n"), TEXT_PLAIN);
        assert_eq!(detect_content_type(b"\x00\x01\x02\x03binary"), OCTET_STREAM);
        assert_eq!(detect_content_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_sniff_stream_reconstructs_bytes() {
        let original = png_bytes(2048);
        let body = UploadBody::stream(OneWay(Cursor::new(original.clone())));

        let (content_type, mut reader) = sniff(body).unwrap();

        assert_eq!(content_type, "image/png");
        let mut restored = Vec::new();
        reader.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_sniff_seekable_rewinds() {
        let original = png_bytes(100);
        let body = UploadBody::seekable(Cursor::new(original.clone()));

        let (content_type, mut reader) = sniff(body).unwrap();

        assert_eq!(content_type, "image/png");
        let mut restored = Vec::new();
        reader.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_sniff_short_reads() {
        let original = b"plain text that arrives in small chunks".repeat(40);
        let body = UploadBody::stream(Trickle(Cursor::new(original.clone())));

        let (content_type, mut reader) = sniff(body).unwrap();

        assert_eq!(content_type, TEXT_PLAIN);
        let mut restored = Vec::new();
        reader.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_sniff_empty_body() {
        let body = UploadBody::stream(OneWay(Cursor::new(Vec::new())));
        assert!(matches!(sniff(body), Err(Error::InvalidInput(_))));
    }
}
