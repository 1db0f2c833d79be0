//! Prompt templates for common InfraNodus workflows
//!
//! Each prompt renders a single user message that points the model at the
//! tools to use.

use std::collections::HashMap;

use crate::error::{McpError, Result};
use crate::mcp::types::{GetPromptResult, Prompt, PromptArgument, PromptMessage};

struct PromptTemplate {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    arguments: &'static [(&'static str, &'static str, bool)],
}

const PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "analyze-text",
        title: "Analyze text as a knowledge graph",
        description: "Generate a knowledge graph from text to identify main topics, concepts, and gaps",
        arguments: &[("text", "The text to analyze", true)],
    },
    PromptTemplate {
        name: "gap-analysis",
        title: "Find the gaps in a text",
        description: "Find the gaps in a text based on the knowledge graph analysis",
        arguments: &[("text", "The text to find the gaps in", true)],
    },
    PromptTemplate {
        name: "topic-analysis",
        title: "Find the topics in a text",
        description: "Find the main topics and topical clusters in a text based on the knowledge graph analysis",
        arguments: &[("text", "The text to find the topics in", true)],
    },
    PromptTemplate {
        name: "compare-texts",
        title: "Compare two texts",
        description: "Find overlaps and differences between two texts using knowledge graphs",
        arguments: &[
            ("text1", "The main text: what's in it that is not in the second one", true),
            ("text2", "The second text to compare for similarities and differences", true),
        ],
    },
    PromptTemplate {
        name: "research-ideas",
        title: "Generate research ideas",
        description: "Generate research questions and ideas from text or an existing graph",
        arguments: &[
            ("text", "The text to generate research ideas from", false),
            ("graphName", "Name of an existing graph to use instead of a text", false),
        ],
    },
    PromptTemplate {
        name: "seo-topic-analysis",
        title: "SEO analysis of a topic",
        description: "Analyze search queries and results to identify search intent, the main topics for topical authority, and queries not served by search results",
        arguments: &[("queries", "The most likely search queries for a topic, comma-separated", true)],
    },
    PromptTemplate {
        name: "seo-content-analysis",
        title: "SEO analysis of a content",
        description: "Analyze the content to identify SEO opportunities and gaps",
        arguments: &[("content", "The text or website content to analyze", true)],
    },
    PromptTemplate {
        name: "seo-competition-analysis",
        title: "SEO analysis of the competition",
        description: "Analyze the highest-ranking websites of your competition to find their main topics and gaps",
        arguments: &[
            ("yourWebsite", "The URL of your website", true),
            ("competitionWebsites", "URLs of the highest-ranking competitors, comma-separated", true),
        ],
    },
    PromptTemplate {
        name: "develop-text",
        title: "Develop and expand text",
        description: "Develop text using knowledge graph analysis to fill gaps and expand ideas",
        arguments: &[("text", "The text to develop and expand", true)],
    },
    PromptTemplate {
        name: "save-memory",
        title: "Save text to InfraNodus memory",
        description: "Save important information to your InfraNodus knowledge base",
        arguments: &[
            ("graphName", "Name for the saved graph", true),
            ("text", "The text to save", true),
        ],
    },
];

/// All prompt definitions
pub fn list_prompts() -> Vec<Prompt> {
    PROMPTS
        .iter()
        .map(|template| Prompt {
            name: template.name.to_string(),
            title: Some(template.title.to_string()),
            description: Some(template.description.to_string()),
            arguments: template
                .arguments
                .iter()
                .map(|(name, description, required)| PromptArgument {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    required: *required,
                })
                .collect(),
        })
        .collect()
}

/// Render a prompt with the caller's arguments
pub fn get_prompt(name: &str, args: &HashMap<String, String>) -> Result<GetPromptResult> {
    let template = PROMPTS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| McpError::UnknownPrompt {
            name: name.to_string(),
        })?;

    for (arg, _, required) in template.arguments {
        if *required && arg_value(args, arg).is_none() {
            return Err(McpError::MissingPromptArgument {
                name: arg.to_string(),
            }
            .into());
        }
    }

    let text = render(template.name, args)?;
    Ok(GetPromptResult {
        description: Some(template.description.to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}

fn arg_value<'a>(args: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    args.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn render(name: &str, args: &HashMap<String, String>) -> Result<String> {
    let arg = |key: &str| arg_value(args, key).unwrap_or_default();

    let text = match name {
        "analyze-text" => format!(
            "Please analyze the following text using InfraNodus to generate a knowledge graph. \
             Show me the main topics, topical clusters, key concepts, relationships, and any \
             structural gaps you identify:\n\n{}\n\n\
             Use the generate_knowledge_graph tool to get a detailed analysis.",
            arg("text")
        ),
        "gap-analysis" => format!(
            "Please analyze the following text using InfraNodus to find the gaps within it that \
             could be bridged to improve the content and generate new ideas:\n\n{}\n\n\
             Use the generate_content_gaps tool to get a detailed analysis.",
            arg("text")
        ),
        "topic-analysis" => format!(
            "Please analyze the following text using InfraNodus to find its main topics and \
             topical clusters:\n\n{}\n\n\
             Use the generate_topical_clusters tool to get a detailed analysis.",
            arg("text")
        ),
        "compare-texts" => format!(
            "Please compare these two texts using InfraNodus:\n\n\
             Text 1:\n{}\n\nText 2:\n{}\n\n\
             First, use the overlap_between_texts tool to find common themes and concepts.\n\
             Then, use the difference_between_texts tool to identify what's present in the first \
             text that is not in the second one.\n\
             Provide a summary of the main similarities and differences.",
            arg("text1"),
            arg("text2")
        ),
        "research-ideas" => match (arg_value(args, "graphName"), arg_value(args, "text")) {
            (Some(graph), _) => format!(
                "Please generate research ideas for the graph \"{}\":\n\n\
                 1. Use the generate_research_questions_from_graph tool to create research questions\n\
                 2. Use the generate_responses_from_graph tool to generate potential responses\n\n\
                 Provide a comprehensive research agenda based on the analysis.",
                graph
            ),
            (None, Some(text)) => format!(
                "Please help me generate research ideas based on this text:\n\n\"{}\"\n\n\
                 Use the develop_text_tool tool to generate research ideas based on the content \
                 gaps, conceptual bridges, and latent topics identified in the text.\n\n\
                 Provide a structured research plan with key questions and areas to investigate.",
                text
            ),
            (None, None) => {
                return Err(McpError::MissingPromptArgument {
                    name: "text".to_string(),
                }
                .into())
            }
        },
        "seo-topic-analysis" => format!(
            "Please perform an SEO analysis for the following search queries: \"{}\"\n\n\
             1. First, use the analyze_related_search_queries tool to analyze related search queries\n\
             2. Then, use the analyze_google_search_results tool to analyze the top search results\n\
             3. Use the search_queries_vs_search_results tool to find gaps between queries and results\n\n\
             Provide insights about the search landscape and content opportunities based on the \
             gaps identified.",
            arg("queries")
        ),
        "seo-content-analysis" => format!(
            "Please perform an SEO analysis for the following content:\n\n{}\n\n\
             Use the generate_seo_report tool to provide a full report on the SEO opportunities \
             and gaps identified in the content.\n\n\
             Provide insights about the main topics for topical authority, high-volume search \
             queries, content gaps and other SEO opportunities.",
            arg("content")
        ),
        "seo-competition-analysis" => format!(
            "Extract the content of the main and highest-ranking pages on Google for my website \
             \"{}\" and the content of the highest-ranking pages of the following competitor \
             websites: \"{}\"\n\n\
             Then use the difference_between_texts tool to find keyword combinations that are \
             present in the competitors' websites but not in mine.\n\n\
             Then use the analyze_related_search_queries tool with these keyword combinations to \
             identify high-volume, low-competition search queries.\n\n\
             Then use the generate_seo_report tool on the competitors' content to see what they \
             are missing.\n\n\
             Then run the analyze_google_search_results tool on the gaps identified to extract \
             the main topics to target for topical authority.\n\n\
             Provide comprehensive advice on how to improve my website's SEO based on this analysis.",
            arg("yourWebsite"),
            arg("competitionWebsites")
        ),
        "develop-text" => format!(
            "Please help me develop and expand this text using InfraNodus:\n\n{}\n\n\
             Use the develop_text_tool tool to generate research ideas based on the content gaps, \
             conceptual bridges, and latent topics identified in the text.",
            arg("text")
        ),
        "save-memory" => format!(
            "Please save the following text to my InfraNodus memory with the name \"{}\":\n\n{}\n\n\
             Use the memory_add_relations tool to save this information.",
            arg("graphName"),
            arg("text")
        ),
        other => {
            return Err(McpError::UnknownPrompt {
                name: other.to_string(),
            }
            .into())
        }
    };

    Ok(text)
}
