//! Tool parameter definitions
//!
//! Each struct is the validated argument object of one tool (or a family of
//! tools). The same derive produces the published JSON schema (`schemars`),
//! the parser (`serde`) and the constraint checks (`validator`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Result, ValidationError};

fn default_true() -> bool {
    true
}

/// Text processing mode applied by the service before building the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TextMode {
    /// Plain text, gap and topical analysis
    #[default]
    None,
    /// Mix entities and words
    DetectEntities,
    /// Entities only, for ontologies and entity extraction
    ExtractEntitiesOnly,
}

impl TextMode {
    /// Entity-only graphs need the compact graph in the response
    pub fn extracts_entities(self) -> bool {
        self == TextMode::ExtractEntitiesOnly
    }
}

/// AI model used by the service for advice generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AiModel {
    #[serde(rename = "claude-opus-4.1")]
    ClaudeOpus41,
    #[serde(rename = "claude-sonnet-4")]
    ClaudeSonnet4,
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-5")]
    Gpt5,
    #[serde(rename = "gpt-5-mini")]
    Gpt5Mini,
}

/// Language of search-derived imports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    #[default]
    En,
    De,
    Fr,
    Es,
    It,
    Pt,
    Ru,
    Cn,
    Jp,
    Nl,
    Tw,
}

/// Country of search-derived imports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    Ar,
    Au,
    Br,
    Ca,
    Ch,
    Cn,
    De,
    Es,
    Fr,
    Gb,
    Hk,
    In,
    It,
    Jp,
    Mx,
    Nl,
    No,
    Nz,
    Pt,
    Ru,
    Sv,
    Tw,
    #[default]
    Us,
}

/// Source of related search queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum KeywordsSource {
    /// Google suggestions
    #[default]
    Related,
    /// Google Ads suggestions, broader range
    Adwords,
}

/// Analyze text and build a knowledge graph without saving it
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateGraphParams {
    /// Text to analyze. Use new lines to separate statements or paragraphs (not sentences). Use [[wikilinks]] to mark entities.
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,

    /// Include processed statements in the response (only if explicitly needed)
    #[serde(default)]
    pub include_statements: bool,

    /// Include the graph structure in the response (only if explicitly needed)
    #[serde(default)]
    pub include_graph: bool,

    /// Include nodes and edges in the response (not recommended for longer texts)
    #[serde(default)]
    pub add_nodes_and_edges: bool,

    /// Text processing: none (text, gap and topical analysis), detectEntities (mix entities and words), extractEntitiesOnly (entities only, for ontologies and entity extraction)
    #[serde(default)]
    pub modify_analyzed_text: TextMode,
}

/// Build a knowledge graph from text and save it under a name
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGraphParams {
    /// Name of the graph to create in InfraNodus
    #[validate(length(min = 1, message = "Graph name is required"))]
    pub graph_name: String,

    /// Text to analyze. Use new lines to separate statements or paragraphs (not sentences).
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,

    /// Include processed statements in the response (only if explicitly needed)
    #[serde(default)]
    pub include_statements: bool,

    /// Include the graph structure in the response (only if explicitly needed)
    #[serde(default)]
    pub include_graph: bool,

    /// Include nodes and edges in the response (not recommended for longer texts)
    #[serde(default)]
    pub add_nodes_and_edges: bool,

    /// Entity detection: none, detectEntities or extractEntitiesOnly
    #[serde(default)]
    pub modify_analyzed_text: TextMode,
}

/// Add relations to a memory graph
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemoryParams {
    /// Memory graph name: lowercase, dashes for spaces, no special characters. Derive it from the conversation, the client or project name, or use the name the user provided.
    #[validate(length(
        min = 1,
        max = 28,
        message = "Graph name is required and must be less than 28 characters"
    ))]
    pub graph_name: String,

    /// Statements to remember, one per line. Mark entities with [[wikilinks]] (at least two per statement) unless automatic entity detection is requested.
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,

    /// Include processed statements in the response
    #[serde(default)]
    pub include_statements: bool,

    /// Include the graph structure in the response
    #[serde(default)]
    pub include_graph: bool,

    /// Include nodes and edges in the response (not recommended for longer texts)
    #[serde(default)]
    pub add_nodes_and_edges: bool,

    /// Entity detection: none (default) or extractEntitiesOnly (automatic extraction, only if requested)
    #[serde(default)]
    pub modify_analyzed_text: TextMode,
}

/// Retrieve and analyze a saved graph
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeExistingGraphParams {
    /// Name of the existing InfraNodus graph in your account
    #[validate(length(min = 1, message = "Graph name is required"))]
    pub graph_name: String,

    /// Include processed statements in the response
    #[serde(default = "default_true")]
    pub include_statements: bool,

    /// Include the graph structure in the response (only if explicitly needed)
    #[serde(default)]
    pub include_graph: bool,

    /// Include nodes and edges in the response (not recommended for larger graphs)
    #[serde(default)]
    pub add_nodes_and_edges: bool,

    /// Include the AI-generated graph summary for RAG prompt augmentation
    #[serde(default)]
    pub include_graph_summary: bool,

    /// Entity detection: none, detectEntities or extractEntitiesOnly
    #[serde(default)]
    pub modify_analyzed_text: TextMode,
}

/// Any tool that only needs a text
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TextParams {
    /// Text to analyze. Use new lines to separate statements or paragraphs (not sentences).
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,
}

/// Research questions or ideas from a text
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResearchParams {
    /// Text to generate questions or ideas from. Use new lines to separate statements or paragraphs (not sentences).
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,

    /// Generate output for several content gaps found in the text
    #[serde(default)]
    pub use_several_gaps: bool,

    /// Depth of content gaps to generate output for
    #[serde(default)]
    pub gap_depth: u32,

    /// AI model to use
    #[serde(default)]
    pub model_to_use: AiModel,
}

/// Latent topics or conceptual bridges from a text
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LatentParams {
    /// Text to develop through the latent concepts that connect it to a broader discourse
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,

    /// AI model to use
    #[serde(default)]
    pub model_to_use: AiModel,
}

/// Research questions from a saved graph
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GraphResearchParams {
    /// Name of the existing InfraNodus graph in your account
    #[validate(length(min = 1, message = "Graph name is required"))]
    pub graph_name: String,

    /// Generate questions for several content gaps found in the graph
    #[serde(default)]
    pub use_several_gaps: bool,

    /// Depth of content gaps to generate questions for
    #[serde(default)]
    pub gap_depth: u32,

    /// AI model to use
    #[serde(default)]
    pub model_to_use: AiModel,
}

/// Responses to a prompt grounded in a saved graph
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GraphResponsesParams {
    /// Name of the existing InfraNodus graph in your account
    #[validate(length(min = 1, message = "Graph name is required"))]
    pub graph_name: String,

    /// Prompt to generate responses to from the graph
    #[validate(length(min = 1, message = "Prompt is required"))]
    pub prompt: String,

    /// AI model to use
    #[serde(default)]
    pub model_to_use: AiModel,
}

/// Combined text development workflow
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DevelopTextParams {
    /// Text to think about and develop. Use new lines to separate statements or paragraphs (not sentences).
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,

    /// Generate questions for several content gaps found in the text
    #[serde(default)]
    pub use_several_gaps: bool,

    /// Depth of content gaps to generate questions for
    #[serde(default)]
    pub gap_depth: u32,

    /// Generate ideas instead of questions. Only if explicitly requested or a previous run was insufficient.
    #[serde(default)]
    pub extended_ideation_mode: bool,

    /// AI model to use
    #[serde(default)]
    pub model_to_use: AiModel,
}

/// One text of a multi-context comparison
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContextInput {
    /// Text content. Use new lines to separate statements (not sentences).
    #[validate(length(min = 1, message = "Text is required for analysis"))]
    pub text: String,

    /// Entity detection: none, detectEntities or extractEntitiesOnly
    #[serde(default)]
    pub modify_analyzed_text: TextMode,
}

/// Overlap or difference between two or more texts
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompareParams {
    /// Texts to compare. For the difference, the FIRST text is the target analyzed for missing parts and the remaining ones are references.
    #[validate(length(min = 2, message = "At least two contexts are required"))]
    pub contexts: Vec<ContextInput>,

    /// Include processed statements in the response
    #[serde(default)]
    pub include_statements: bool,

    /// Include the graph structure in the response
    #[serde(default)]
    pub include_graph: bool,

    /// Include nodes and edges in the response (not recommended for longer texts)
    #[serde(default)]
    pub add_nodes_and_edges: bool,
}

/// Knowledge graph of Google search results
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultsParams {
    /// Queries to get Google search results for
    #[validate(length(min = 1, message = "Queries are required for analysis"))]
    pub queries: Vec<String>,

    /// Only include the search results (no knowledge graph and keywords)
    #[serde(default)]
    pub include_search_results_only: bool,

    /// Only include the graph structure and keywords (no search results)
    #[serde(default = "default_true")]
    pub show_graph_only: bool,

    /// Include extended graph information (only if explicitly needed)
    #[serde(default)]
    pub show_extended_graph_info: bool,

    /// Language of the search queries; use the language of the conversation
    #[serde(default)]
    pub import_language: Language,

    /// Country of the search queries; use the one most suitable for the language
    #[serde(default)]
    pub import_country: Country,
}

/// Knowledge graph of related search queries
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueriesParams {
    /// Queries to get related Google queries for
    #[validate(length(min = 1, message = "Queries are required for analysis"))]
    pub queries: Vec<String>,

    /// Only include the search queries (no knowledge graph and keywords)
    #[serde(default)]
    pub include_search_queries_only: bool,

    /// Keyword source: related (Google suggestions) or adwords (Google Ads, broader range)
    #[serde(default)]
    pub keywords_source: KeywordsSource,

    /// Only include the graph structure and keywords (no search queries)
    #[serde(default = "default_true")]
    pub show_graph_only: bool,

    /// Include extended graph information (only if explicitly needed)
    #[serde(default)]
    pub show_extended_graph_info: bool,

    /// Language of the search queries; use the language of the conversation
    #[serde(default)]
    pub import_language: Language,

    /// Country of the search queries; use the one most suitable for the language
    #[serde(default)]
    pub import_country: Country,
}

/// What people search for versus what they find
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResultsVsQueriesParams {
    /// Queries to compare search intent and search results for
    #[validate(length(min = 1, message = "Queries are required for analysis"))]
    pub queries: Vec<String>,

    /// Only include the graph structure and keywords (no search results)
    #[serde(default = "default_true")]
    pub show_graph_only: bool,

    /// Include extended graph information (only if explicitly needed)
    #[serde(default)]
    pub show_extended_graph_info: bool,

    /// Language of the search queries; use the language of the conversation
    #[serde(default)]
    pub import_language: Language,

    /// Country of the search queries; use the one most suitable for the language
    #[serde(default)]
    pub import_country: Country,
}

/// SEO comparison of a text against search results and search intent
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeoParams {
    /// Content to optimize. Use new lines to separate statements or paragraphs (not sentences).
    #[validate(length(min = 1, message = "Text is required for SEO analysis"))]
    pub text: String,

    /// Language of the content and search queries
    #[serde(default)]
    pub import_language: Language,

    /// Country for the search analysis
    #[serde(default)]
    pub import_country: Country,
}

/// Relations stored in memory graphs
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GetMemoryParams {
    /// Entity to get relations for, as [[wikilink]] with underscores for spaces. Leave empty when memoryContextName is provided.
    #[serde(default)]
    pub entity_name: String,

    /// Memory graph to search in (empty searches all memory graphs)
    #[serde(default)]
    pub memory_context_name: String,
}

/// Full-text search across saved graphs
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Query to search for in existing InfraNodus graphs
    #[validate(length(min = 1, message = "Search query is required"))]
    pub query: String,

    /// Graphs to search in (empty for all)
    #[serde(default)]
    pub context_names: Vec<String>,
}

/// Retrieve one search result
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    /// ID of the search result: username:graph_name:search_query
    #[validate(length(min = 1, message = "ID of the search result is required"))]
    pub id: String,
}

/// Identifier of a search result, `user:graph:query`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultId {
    pub user_name: String,
    pub graph_name: String,
    pub query: String,
}

impl SearchResultId {
    /// Parse an id; the query part may itself contain colons
    pub fn parse(id: &str) -> Result<Self> {
        let mut parts = id.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(graph), Some(query)) if !graph.is_empty() && !query.is_empty() => {
                Ok(Self {
                    user_name: user.to_string(),
                    graph_name: graph.to_string(),
                    query: query.to_string(),
                })
            }
            _ => Err(ValidationError::InvalidParameter {
                name: "id".to_string(),
                message: format!("expected username:graph_name:search_query, got '{}'", id),
            }
            .into()),
        }
    }

    /// Render back to the wire form
    pub fn render(user_name: &str, graph_name: &str, query: &str) -> String {
        format!("{}:{}:{}", user_name, graph_name, query)
    }
}

/// Check nested contexts, which `validator` does not descend into here
pub fn validate_contexts(contexts: &[ContextInput]) -> Result<()> {
    for context in contexts {
        context.validate()?;
    }
    Ok(())
}
