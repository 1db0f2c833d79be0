//! Static resources exposed by the server

use crate::config::infranodus::{API_ACCESS_URL, API_KEY_ENV};
use crate::error::{McpError, Result};
use crate::mcp::tools::catalog;
use crate::mcp::types::{ReadResourceResult, Resource, ResourceContent};

pub const ABOUT_URI: &str = "info://about";

const ABOUT_DESCRIPTION: &str = "InfraNodus MCP server can generate knowledge graphs and perform \
text analysis using the InfraNodus API. It works with your existing InfraNodus graphs or with the \
text you submit, extracts the main topics, identifies content gaps and uses the built-in AI to \
generate research questions that can augment your LLM's responses.";

pub fn list_resources() -> Vec<Resource> {
    vec![Resource {
        uri: ABOUT_URI.to_string(),
        name: "About InfraNodus MCP Server".to_string(),
        description: Some(ABOUT_DESCRIPTION.to_string()),
        mime_type: Some("text/plain".to_string()),
    }]
}

pub fn read_resource(uri: &str) -> Result<ReadResourceResult> {
    if uri != ABOUT_URI {
        return Err(McpError::UnknownResource {
            uri: uri.to_string(),
        }
        .into());
    }

    Ok(ReadResourceResult {
        contents: vec![ResourceContent {
            uri: ABOUT_URI.to_string(),
            mime_type: Some("text/plain".to_string()),
            text: about_text(),
        }],
    })
}

/// Server overview; the tool list is generated from the live catalogue
fn about_text() -> String {
    let mut text = String::from(
        "InfraNodus MCP Server\n\n\
         This server provides tools for text analysis and knowledge graph generation using the InfraNodus API.\n\n\
         Available Tools:\n",
    );

    for (i, tool) in catalog().iter().enumerate() {
        let summary = tool.description.as_deref().unwrap_or_default();
        text.push_str(&format!("{}. {} - {}\n", i + 1, tool.name, summary));
    }

    text.push_str(
        "\nKey Features:\n\
         - Topic modeling and clustering\n\
         - Content gap detection (finding missing connections)\n\
         - Network statistics (modularity, centrality, etc.)\n\
         - AI-powered topic naming\n\
         - Entity detection for cleaner graphs\n",
    );

    text.push_str(&format!(
        "\nConfiguration:\n\
         - Set the {} environment variable (anonymous access is rate-limited)\n\
         - Get your API key at: {}\n\n\
         Learn more: https://infranodus.com\n",
        API_KEY_ENV, API_ACCESS_URL
    ));

    text
}
