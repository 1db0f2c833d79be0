//! InfraNodus API type definitions
//!
//! These types mirror the InfraNodus API responses and are used for deserialization.
//! Every field is optional or defaulted: the service omits keys depending on the
//! query flags of the request, and a `null` or mistyped value decodes as the
//! default instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Field decoder that maps `null` and values of an unexpected type to the default
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A node of the knowledge graph
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient")]
    pub label: String,

    #[serde(default, deserialize_with = "lenient")]
    pub degree: f64,

    /// Betweenness centrality
    #[serde(default, deserialize_with = "lenient")]
    pub bc: f64,

    /// Community (cluster) id, numeric or string depending on the endpoint
    #[serde(default, deserialize_with = "lenient")]
    pub community: Value,

}

/// An edge of the knowledge graph
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphEdge {
    #[serde(default, deserialize_with = "lenient")]
    pub source: String,

    #[serde(default, deserialize_with = "lenient")]
    pub target: String,

    #[serde(default, deserialize_with = "lenient")]
    pub weight: f64,
}

/// A node entry inside a cluster
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    #[serde(default, deserialize_with = "lenient")]
    pub node_name: String,

    #[serde(default, deserialize_with = "lenient")]
    pub degree: f64,

    #[serde(default, deserialize_with = "lenient")]
    pub bc: f64,
}

/// A topical cluster as computed by the service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopCluster {
    #[serde(default, deserialize_with = "lenient")]
    pub community: Value,

    #[serde(default, deserialize_with = "lenient")]
    pub nodes: Vec<ClusterNode>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub statements: Option<Vec<i64>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub statement_ids: Option<Vec<i64>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub top_statement_id: Option<i64>,

    /// AI-assigned cluster name
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ai_name: Option<String>,
}

/// A structural gap between two clusters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphGap {
    #[serde(default, deserialize_with = "lenient")]
    pub source: String,

    #[serde(default, deserialize_with = "lenient")]
    pub target: String,

    #[serde(default, deserialize_with = "lenient")]
    pub weight: f64,

    #[serde(default, deserialize_with = "lenient")]
    pub concepts: Vec<String>,
}

/// Graph-level statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphAttributes {
    #[serde(default, deserialize_with = "lenient")]
    pub modularity: f64,

    #[serde(default, deserialize_with = "lenient")]
    pub top_nodes: Vec<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub top_clusters: Vec<TopCluster>,

    #[serde(default, deserialize_with = "lenient")]
    pub gaps: Vec<GraphGap>,

    #[serde(default, rename = "dotGraphByCluster", skip_serializing_if = "Option::is_none")]
    pub dot_graph_by_cluster: Option<Value>,
}

/// Graphology-style graph export
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphologyGraph {
    #[serde(default, deserialize_with = "lenient")]
    pub attributes: GraphAttributes,

    #[serde(default, deserialize_with = "lenient")]
    pub nodes: Vec<GraphNode>,

    #[serde(default, deserialize_with = "lenient")]
    pub edges: Vec<GraphEdge>,
}

/// Graph container as returned by the service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    #[serde(default, deserialize_with = "lenient")]
    pub graphology_graph: GraphologyGraph,
}

/// A parsed input statement
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<Value>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sort_id: Option<Value>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub statement_hashtags: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub statement_communities: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub top_statement_community: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub top_statement_of_community: Option<String>,
}

/// Statements come back as objects, or as bare strings in compact mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatementRecord {
    Plain(String),
    Detailed(Statement),
    /// Anything else is passed through untouched
    Other(Value),
}

impl StatementRecord {
    /// Text of the statement, if any
    pub fn content(&self) -> Option<&str> {
        match self {
            StatementRecord::Plain(text) => Some(text.as_str()),
            StatementRecord::Detailed(statement) => statement.content.as_deref(),
            StatementRecord::Other(_) => None,
        }
    }
}

/// Text-level summary produced alongside the graph
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedGraphSummary {
    #[serde(default, deserialize_with = "lenient")]
    pub content_gaps: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub main_topics: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub main_topic_names: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub main_concepts: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub top_relations: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub top_bigrams: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub topics_to_develop: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub conceptual_gateways: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub conceptual_gateways_graph: Option<Vec<String>>,
}

/// One AI advice entry
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AiAdvice {
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Response of the graph endpoints (`graphAndStatements`, `graphAndAdvice`,
/// `graphsAndStatements` and the search imports)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GraphResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub statements: Option<Vec<StatementRecord>>,

    #[serde(default, deserialize_with = "lenient")]
    pub graph: Option<GraphData>,

    #[serde(default, deserialize_with = "lenient")]
    pub graph_summary: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub extended_graph_summary: Option<ExtendedGraphSummary>,

    #[serde(default, deserialize_with = "lenient")]
    pub user_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub graph_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub graph_url: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub is_public: Option<bool>,

    #[serde(default, deserialize_with = "lenient")]
    pub ai_advice: Option<Vec<AiAdvice>>,
}

impl GraphResponse {
    /// Graph export, if the request asked for it
    pub fn graphology(&self) -> Option<&GraphologyGraph> {
        self.graph.as_ref().map(|g| &g.graphology_graph)
    }

    /// Extended summary, or an empty one
    pub fn summary(&self) -> ExtendedGraphSummary {
        self.extended_graph_summary.clone().unwrap_or_default()
    }
}

/// Entries matched by a search
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchEntries {
    #[serde(default, deserialize_with = "lenient")]
    pub ids: Vec<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub texts: Vec<String>,
}

/// Response of the `search` endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub entries_added: Option<SearchEntries>,

    #[serde(default, deserialize_with = "lenient")]
    pub graph: Option<GraphData>,

    #[serde(default, deserialize_with = "lenient")]
    pub user_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub graph_urls: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub graph_names: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graph_response_deserialize() {
        let value = json!({
            "graph": {
                "graphologyGraph": {
                    "attributes": {
                        "modularity": 0.42,
                        "top_nodes": ["mammal"],
                        "top_clusters": [{"community": "0", "nodes": [{"nodeName": "cat", "degree": 2, "bc": 0.1}], "aiName": "Pets"}],
                        "gaps": []
                    },
                    "nodes": [{"id": "cat", "label": "cat", "degree": 2, "bc": 0.1, "community": 0, "x": 1.5, "y": -3.0, "weighedDegree": 2}],
                    "edges": [{"source": "cat", "target": "mammal", "id": "e1", "weight": 3}]
                },
                "statementHashtags": []
            },
            "extendedGraphSummary": {"contentGaps": ["cats <-> birds"]}
        });

        let response: GraphResponse = serde_json::from_value(value).unwrap();
        let graph = response.graphology().unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.attributes.top_clusters[0].ai_name.as_deref(), Some("Pets"));
        assert_eq!(response.summary().content_gaps.unwrap(), vec!["cats <-> birds"]);
    }

    #[test]
    fn test_statement_records() {
        let records: Vec<StatementRecord> =
            serde_json::from_value(json!(["plain text", {"id": 3, "content": "object text"}, {"id": 4}]))
                .unwrap();
        assert_eq!(records[0].content(), Some("plain text"));
        assert_eq!(records[1].content(), Some("object text"));
        assert_eq!(records[2].content(), None);
    }

    #[test]
    fn test_null_and_mistyped_fields() {
        let value = json!({
            "graph": {
                "graphologyGraph": {
                    "attributes": {"modularity": null, "top_clusters": [{"community": 1, "statementIds": ["a", "b"], "aiName": null}]},
                    "nodes": [{"id": "cat", "label": "cat", "degree": null, "bc": "high", "x": null, "y": null}],
                    "edges": [{"source": "cat", "target": "dog", "id": 7, "weight": null}]
                }
            },
            "statements": [{"id": "s-1", "content": "Cats are mammals.", "sortId": null}, 42, "Dogs bark."],
            "extendedGraphSummary": {"contentGaps": null, "mainTopics": "not a list"},
            "aiAdvice": [{"text": null}]
        });

        let response: GraphResponse = serde_json::from_value(value).unwrap();
        let graph = response.graphology().unwrap();
        assert_eq!(graph.attributes.modularity, 0.0);
        assert_eq!(graph.attributes.top_clusters[0].statement_ids, None);
        assert_eq!(graph.nodes[0].label, "cat");
        assert_eq!(graph.nodes[0].degree, 0.0);
        assert_eq!(graph.nodes[0].bc, 0.0);
        assert_eq!(graph.edges[0].weight, 0.0);

        let statements = response.statements.as_ref().unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].content(), Some("Cats are mammals."));
        assert_eq!(statements[1].content(), None);
        assert_eq!(statements[2].content(), Some("Dogs bark."));

        assert!(response.summary().content_gaps.is_none());
        assert!(response.summary().main_topics.is_none());
        assert_eq!(response.ai_advice.unwrap()[0].text, "");
    }

    #[test]
    fn test_empty_response() {
        let response: GraphResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.graphology().is_none());
        assert!(response.summary().main_topics.is_none());
    }
}
