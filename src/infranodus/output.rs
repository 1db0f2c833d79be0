//! Tool output shapes
//!
//! The narrowed objects returned to the MCP caller. List fields are always
//! serialized (empty when the service had nothing); optional fields are
//! omitted when absent or not requested.

use serde::Serialize;
use serde_json::Value;

use crate::infranodus::types::StatementRecord;

/// Graph-level numbers
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub modularity: f64,
    pub node_count: usize,
    pub edge_count: usize,
    pub cluster_count: usize,
}

/// Node without layout coordinates
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeOutput {
    pub id: String,
    pub label: String,
    pub degree: f64,
    pub bc: f64,
    pub community: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EdgeOutput {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Nodes and edges, on request
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct KnowledgeGraph {
    pub nodes: Vec<NodeOutput>,
    pub edges: Vec<EdgeOutput>,
}

/// A cluster reduced to its name and concepts
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOutput {
    pub community: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub concepts: Vec<String>,
    pub statement_ids: Vec<i64>,
}

/// Output of the knowledge-graph family of tools
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGraphOutput {
    pub statistics: GraphStatistics,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_summary: Option<String>,

    pub content_gaps: Vec<String>,
    pub main_topical_clusters: Vec<String>,
    pub main_concepts: Vec<String>,
    pub conceptual_gateways: Vec<String>,
    pub top_relations: Vec<String>,
    pub top_bigrams: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements: Option<Vec<StatementRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_graph: Option<KnowledgeGraph>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_graph_by_cluster: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_clusters: Option<Vec<ClusterOutput>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GapsOutput {
    pub content_gaps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicsOutput {
    pub topical_clusters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphOverview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_overview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct ResearchQuestionsOutput {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct ResearchIdeasOutput {
    pub ideas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct ResponsesOutput {
    pub responses: Vec<String>,
}

/// Conceptual bridges: gateways to a broader discourse
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatentConceptsOutput {
    pub ideas: Vec<String>,
    pub latent_concepts_to_develop: Vec<String>,
    pub latent_concepts_relations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatentTopicsOutput {
    pub ideas: Vec<String>,
    pub main_topics: Vec<String>,
    pub latent_topics_to_develop: Vec<String>,
}

/// Result of the develop-text workflow
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DevelopTextOutput {
    pub content_gap_ideas: Vec<String>,
    pub latent_topics_ideas: Vec<String>,
    pub conceptual_bridges_ideas: Vec<String>,
    pub content_gaps: Vec<String>,
    pub conceptual_bridges: Vec<String>,
    pub latent_topics: Vec<String>,
    pub main_topics: Vec<String>,
}

/// Extended summary reduced to what a comparison needs
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightsOutput {
    pub content_gaps: Vec<String>,
    pub main_topics: Vec<String>,
    pub main_concepts: Vec<String>,
    pub concepts_to_develop: Vec<String>,
    pub top_keyword_combinations: Vec<String>,
}

/// Result of the SEO workflow
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeoReport {
    pub in_search_results_not_in_text: InsightsOutput,
    pub in_search_queries_not_in_text: InsightsOutput,
    pub in_search_queries_not_in_results: InsightsOutput,
    pub top_missing_queries: Vec<String>,
}

/// Statements retrieved from memory
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryOutput {
    pub statements: Vec<String>,
    pub graph_names: Vec<String>,
    pub graph_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct SearchOutput {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FetchOutput {
    pub id: String,
    pub title: String,
    pub text: String,
    pub url: String,
}
