//! Error types for the InfraNodus MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the InfraNodus MCP Server
#[derive(Error, Debug)]
pub enum InfraNodusMcpError {
    /// InfraNodus API errors
    #[error("InfraNodus API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl InfraNodusMcpError {
    /// Message shown to the MCP caller.
    ///
    /// Service-reported and empty-result errors are passed through verbatim,
    /// everything else uses the full error chain.
    pub fn user_message(&self) -> String {
        match self {
            InfraNodusMcpError::Api(ApiError::Service { message })
            | InfraNodusMcpError::Api(ApiError::EmptyResult { message }) => message.clone(),
            InfraNodusMcpError::Validation(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

/// InfraNodus API errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with an explicit `error` field
    #[error("{message}")]
    Service { message: String },

    /// Non-success HTTP status without a service error body
    #[error("Request to {endpoint} failed ({status}): {body}")]
    RequestFailed {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The service answered with something that is not JSON
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// Structurally valid response that carries nothing usable
    #[error("{message}")]
    EmptyResult { message: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API base URL: {url}")]
    InvalidApiBase { url: String },
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid parameter: {name} - {message}")]
    InvalidParameter { name: String, message: String },
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(err: validator::ValidationErrors) -> Self {
        ValidationError::InvalidArguments {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for InfraNodusMcpError {
    fn from(err: validator::ValidationErrors) -> Self {
        InfraNodusMcpError::Validation(ValidationError::from(err))
    }
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Unknown resource: {uri}")]
    UnknownResource { uri: String },

    #[error("Unknown prompt: {name}")]
    UnknownPrompt { name: String },

    #[error("Missing prompt argument: {name}")]
    MissingPromptArgument { name: String },

    #[error("Invalid request parameters: {message}")]
    InvalidParams { message: String },
}

/// Result type alias for InfraNodus MCP operations
pub type Result<T> = std::result::Result<T, InfraNodusMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_is_verbatim() {
        let err: InfraNodusMcpError = ApiError::Service {
            message: "Graph not found".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "Graph not found");
        assert!(err.to_string().starts_with("InfraNodus API error"));
    }

    #[test]
    fn test_validation_message() {
        let err: InfraNodusMcpError = ValidationError::MissingField {
            field: "text".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "Missing required field: text");
    }

    #[test]
    fn test_error_conversion() {
        let err: InfraNodusMcpError = McpError::UnknownTool {
            name: "nope".to_string(),
        }
        .into();
        assert!(matches!(err, InfraNodusMcpError::Mcp(_)));
        assert!(err.user_message().contains("nope"));
    }
}
