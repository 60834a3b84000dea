pub mod attachment;
pub mod common;
pub mod custom_field;
pub mod date;
pub mod project;
pub mod search;
pub mod story;
pub mod tag;
pub mod task;
pub mod user;
pub mod workspace;

pub use attachment::*;
pub use common::*;
pub use custom_field::*;
pub use date::*;
pub use project::*;
pub use search::*;
pub use story::*;
pub use tag::*;
pub use task::*;
pub use user::*;
pub use workspace::*;
