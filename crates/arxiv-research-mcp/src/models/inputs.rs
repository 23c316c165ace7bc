//! Validated inputs for MCP tool and prompt parameters.
//!
//! Each tool's arguments deserialize into a raw serde struct; range and
//! topic checks run afterwards. Any failure is reported as
//! [`ToolError::InvalidArguments`] naming the offending field, so no tool
//! runs with half-valid input.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Topic;
use crate::config::api;
use crate::error::{ToolError, ToolResult};

/// Deserialize a tool's argument object. `null` is treated as `{}`.
fn from_arguments<T: DeserializeOwned>(tool: &str, args: &Value) -> ToolResult<T> {
    let empty = Value::Object(serde_json::Map::new());
    let args = match args {
        Value::Null => &empty,
        Value::Object(_) => args,
        _ => return Err(ToolError::invalid_arguments(tool, "arguments", "must be a JSON object")),
    };

    serde_path_to_error::deserialize(args).map_err(|e| {
        let field = match e.path().to_string() {
            p if p == "." => "arguments".to_string(),
            p => p,
        };
        ToolError::invalid_arguments(tool, field, e.into_inner().to_string())
    })
}

/// Check an optional count against `1..=api::MAX_RESULTS_LIMIT`.
///
/// Out-of-range values are rejected, never clamped.
fn bounded_count(tool: &str, field: &str, value: Option<u64>) -> ToolResult<Option<usize>> {
    let Some(n) = value else {
        return Ok(None);
    };
    if n == 0 {
        return Err(ToolError::invalid_arguments(tool, field, "must be a positive integer"));
    }
    usize::try_from(n)
        .ok()
        .filter(|n| *n <= api::MAX_RESULTS_LIMIT)
        .map(Some)
        .ok_or_else(|| {
            ToolError::invalid_arguments(
                tool,
                field,
                format!("must be at most {}", api::MAX_RESULTS_LIMIT),
            )
        })
}

fn required(tool: &str, field: &str, value: Option<String>) -> ToolResult<String> {
    value.ok_or_else(|| ToolError::invalid_arguments(tool, field, "is required"))
}

fn parse_topic(tool: &str, field: &str, raw: &str) -> ToolResult<Topic> {
    Topic::parse(raw).map_err(|e| ToolError::invalid_arguments(tool, field, e.to_string()))
}

#[derive(Debug, Deserialize)]
struct RawSearchPapers {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    max_results: Option<u64>,
}

/// Input for `search_papers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPapersInput {
    /// Topic searched and filed under.
    pub topic: Topic,
    /// Upper bound on returned papers.
    pub max_results: usize,
}

impl SearchPapersInput {
    /// Tool this input belongs to.
    pub const TOOL: &'static str = "search_papers";

    /// Validate raw arguments, filling in `default_max_results` when absent.
    pub fn parse(args: &Value, default_max_results: usize) -> ToolResult<Self> {
        let raw: RawSearchPapers = from_arguments(Self::TOOL, args)?;
        let topic = required(Self::TOOL, "topic", raw.topic)?;
        let max_results = bounded_count(Self::TOOL, "max_results", raw.max_results)?
            .unwrap_or(default_max_results);

        Ok(Self { topic: parse_topic(Self::TOOL, "topic", &topic)?, max_results })
    }
}

#[derive(Debug, Deserialize)]
struct RawExtractInfo {
    #[serde(default)]
    paper_id: Option<String>,
}

/// Input for `extract_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractInfoInput {
    /// Paper to look up, taken verbatim. Unknown ids are simply not found.
    pub paper_id: String,
}

impl ExtractInfoInput {
    /// Tool this input belongs to.
    pub const TOOL: &'static str = "extract_info";

    /// Validate raw arguments.
    pub fn parse(args: &Value) -> ToolResult<Self> {
        let raw: RawExtractInfo = from_arguments(Self::TOOL, args)?;
        Ok(Self { paper_id: required(Self::TOOL, "paper_id", raw.paper_id)? })
    }
}

/// Input for `list_topics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ListTopicsInput {}

impl ListTopicsInput {
    /// Tool this input belongs to.
    pub const TOOL: &'static str = "list_topics";

    /// Validate raw arguments (only the object shape is checked).
    pub fn parse(args: &Value) -> ToolResult<Self> {
        from_arguments(Self::TOOL, args)
    }
}

#[derive(Debug, Deserialize)]
struct RawPaperCount {
    #[serde(default)]
    topic: Option<String>,
}

/// Input for `get_paper_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperCountInput {
    /// Topic to count; `None` counts every topic.
    pub topic: Option<Topic>,
}

impl PaperCountInput {
    /// Tool this input belongs to.
    pub const TOOL: &'static str = "get_paper_count";

    /// Validate raw arguments. A blank topic means "all topics".
    pub fn parse(args: &Value) -> ToolResult<Self> {
        let raw: RawPaperCount = from_arguments(Self::TOOL, args)?;
        let topic = match raw.topic {
            Some(t) if !t.trim().is_empty() => Some(parse_topic(Self::TOOL, "topic", &t)?),
            _ => None,
        };
        Ok(Self { topic })
    }
}

/// MCP clients send prompt arguments as strings, so counts come either way.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PromptCount {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawSearchPrompt {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    num_papers: Option<PromptCount>,
}

/// Input for the `generate_search_prompt` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPromptInput {
    /// Topic as the caller wrote it.
    pub topic: String,
    /// Papers to ask for.
    pub num_papers: usize,
}

impl SearchPromptInput {
    /// Prompt this input belongs to.
    pub const PROMPT: &'static str = "generate_search_prompt";

    /// Validate raw prompt arguments.
    ///
    /// `num_papers` is accepted either as an integer or as a decimal string.
    pub fn parse(args: &Value) -> ToolResult<Self> {
        let raw: RawSearchPrompt = from_arguments(Self::PROMPT, args)?;

        let topic = required(Self::PROMPT, "topic", raw.topic)?.trim().to_string();
        if topic.is_empty() {
            return Err(ToolError::invalid_arguments(Self::PROMPT, "topic", "must not be empty"));
        }

        let count = match raw.num_papers {
            Some(PromptCount::Number(n)) => Some(n),
            Some(PromptCount::Text(s)) => Some(s.trim().parse::<u64>().map_err(|_| {
                ToolError::invalid_arguments(Self::PROMPT, "num_papers", "must be a positive integer")
            })?),
            None => None,
        };
        let num_papers = bounded_count(Self::PROMPT, "num_papers", count)?
            .unwrap_or(api::DEFAULT_MAX_RESULTS);

        Ok(Self { topic, num_papers })
    }
}
