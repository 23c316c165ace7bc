//! Data models: paper records, topics and tool inputs.

mod inputs;
mod paper;
mod topic;

pub use inputs::*;
pub use paper::PaperRecord;
pub use topic::{InvalidTopic, Topic};
