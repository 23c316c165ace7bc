//! Output formatters for tool results (JSON) and resources (Markdown).

mod json;
mod markdown;

pub use self::json::*;
pub use markdown::*;
