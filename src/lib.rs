pub mod api;
pub mod client;
pub mod encoding;
pub mod error;
pub mod models;
pub mod multipart;
pub mod pagination;
pub mod sniff;

pub use client::{AsanaClient, AsanaConfig, Auth, DEFAULT_BASE_URL, RawResponse, RequestBody};
pub use error::{Error, Result};
pub use models::*;

// Pagination re-exports
pub use pagination::{CancelHandle, NextPage, Page, PageStream, Paginated};

// Attachment helpers re-exports
pub use multipart::MultipartWriter;
pub use sniff::detect_content_type;
