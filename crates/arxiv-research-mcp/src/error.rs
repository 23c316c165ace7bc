//! Error types for the arXiv research MCP server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from the external search gateway.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Provider answered with a non-success status
    #[error("Search provider returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Response body is not a readable Atom feed
    #[error("Failed to parse search feed: {0}")]
    Feed(String),

    /// Provider rejected the query inside an otherwise successful response
    #[error("Search provider rejected the query: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status { status, message: message.into() }
    }

    /// Returns true if a later identical call might succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Feed(_) | Self::Rejected(_) => false,
        }
    }
}

/// Errors from the local paper registry.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    /// Disk, permission or other I/O fault.
    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A topic's persisted catalog could not be parsed.
    #[error("Catalog for topic '{topic}' is corrupt: {source}")]
    CorruptCatalog {
        /// Display name of the affected topic
        topic: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    /// Create a storage error for `path`.
    #[must_use]
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage { path: path.into(), source }
    }

    /// Create a corrupt catalog error.
    #[must_use]
    pub fn corrupt(topic: impl Into<String>, source: serde_json::Error) -> Self {
        Self::CorruptCatalog { topic: topic.into(), source }
    }

    /// Topic affected by this error, if the error is topic-scoped.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::CorruptCatalog { topic, .. } => Some(topic),
            Self::Storage { .. } => None,
        }
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Arguments failed validation; nothing was executed.
    #[error("Invalid arguments for '{tool}': field '{field}' {message}")]
    InvalidArguments {
        /// Tool being invoked
        tool: String,
        /// Offending argument name
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Error from the search gateway
    #[error("Search failed: {0}")]
    Gateway(#[from] GatewayError),

    /// Error from the paper registry
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// No tool with this name is registered
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// Internal tool logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_arguments(
        tool: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidArguments { tool: tool.into(), field: field.into(), message: message.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true for caller mistakes (bad arguments, unknown tool).
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArguments { .. } | Self::UnknownTool(_))
    }

    /// Convert to a user-friendly error message for MCP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::InvalidArguments { tool, field, message } => {
                format!("Invalid input for '{field}' in {tool}: {message}")
            }
            Self::Gateway(e) if e.is_transient() => {
                format!("arXiv search is temporarily unavailable ({e}). Please try again.")
            }
            Self::Registry(RegistryError::CorruptCatalog { topic, .. }) => {
                format!(
                    "The saved papers for topic '{topic}' are unreadable. \
                     Other topics are unaffected."
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn test_gateway_error_transient() {
        assert!(GatewayError::Timeout(Duration::from_secs(30)).is_transient());
        assert!(GatewayError::status(503, "unavailable").is_transient());
        assert!(GatewayError::status(429, "slow down").is_transient());

        assert!(!GatewayError::status(400, "bad query").is_transient());
        assert!(!GatewayError::Feed("not xml".into()).is_transient());
        assert!(!GatewayError::Rejected("max_results must be less than 30000".into()).is_transient());
    }

    #[test]
    fn test_registry_error_topic() {
        let err = RegistryError::corrupt("quantum computing", parse_error());
        assert_eq!(err.topic(), Some("quantum computing"));

        let err = RegistryError::storage(
            "/papers/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.topic(), None);
        assert!(err.to_string().contains("/papers/x"));
    }

    #[test]
    fn test_tool_error_user_message() {
        let err = ToolError::invalid_arguments("search_papers", "max_results", "must be positive");
        let msg = err.to_user_message();
        assert!(msg.contains("max_results"));
        assert!(msg.contains("search_papers"));
        assert!(msg.contains("must be positive"));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_corrupt_catalog_user_message_names_topic() {
        let err = ToolError::from(RegistryError::corrupt("graph theory", parse_error()));
        assert!(err.to_user_message().contains("graph theory"));
        assert!(!err.is_caller_error());
    }
}
