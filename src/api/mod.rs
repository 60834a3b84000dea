//! リソースごとの操作（`impl AsanaClient`）
//!
//! 一覧系の操作は初期パスを組み立ててページネーションエンジンに渡すだけで、
//! 自身ではI/Oを行わない。

pub mod attachments;
pub mod custom_fields;
pub mod stories;
pub mod tags;
pub mod tasks;
pub mod users;
pub mod workspaces;
