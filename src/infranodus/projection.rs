//! Response projection
//!
//! Pure functions that narrow a decoded InfraNodus document to the shape a
//! tool returns. Nothing here inspects the graph beyond copying what the
//! service computed.

use crate::error::{ApiError, Result};
use crate::infranodus::output::{
    ClusterOutput, DevelopTextOutput, EdgeOutput, FetchOutput, GapsOutput, GraphOverview,
    GraphStatistics, InsightsOutput, KnowledgeGraph, KnowledgeGraphOutput, LatentConceptsOutput,
    LatentTopicsOutput, MemoryOutput, NodeOutput, ResearchIdeasOutput, ResearchQuestionsOutput,
    ResponsesOutput, SearchOutput, SearchResult, TopicsOutput,
};
use crate::infranodus::params::{SearchResultId, TextMode};
use crate::infranodus::types::{GraphResponse, GraphologyGraph, SearchResponse};

/// Opt-in parts of a knowledge graph output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    pub include_statements: bool,
    pub include_graph: bool,
    pub add_nodes_and_edges: bool,
    pub text_mode: TextMode,
}

fn list(field: &Option<Vec<String>>) -> Vec<String> {
    field.clone().unwrap_or_default()
}

fn statistics(graph: Option<&GraphologyGraph>) -> GraphStatistics {
    match graph {
        Some(graph) => GraphStatistics {
            modularity: graph.attributes.modularity,
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            cluster_count: graph.attributes.top_clusters.len(),
        },
        None => GraphStatistics::default(),
    }
}

fn nodes_and_edges(graph: &GraphologyGraph) -> KnowledgeGraph {
    KnowledgeGraph {
        nodes: graph
            .nodes
            .iter()
            .map(|n| NodeOutput {
                id: n.id.clone(),
                label: n.label.clone(),
                degree: n.degree,
                bc: n.bc,
                community: n.community.clone(),
            })
            .collect(),
        edges: graph
            .edges
            .iter()
            .map(|e| EdgeOutput {
                source: e.source.clone(),
                target: e.target.clone(),
                weight: e.weight,
            })
            .collect(),
    }
}

fn clusters(graph: &GraphologyGraph) -> Vec<ClusterOutput> {
    graph
        .attributes
        .top_clusters
        .iter()
        .map(|c| ClusterOutput {
            community: c.community.clone(),
            name: c.ai_name.clone(),
            concepts: c.nodes.iter().map(|n| n.node_name.clone()).collect(),
            statement_ids: c
                .statement_ids
                .clone()
                .or_else(|| c.statements.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Knowledge graph family: generation, saved graphs, comparisons and imports
pub fn knowledge_graph(doc: &GraphResponse, options: &ProjectionOptions) -> KnowledgeGraphOutput {
    let summary = doc.summary();
    let graph = doc.graphology();
    let entities_only = options.text_mode.extracts_entities();
    let wants_clusters = options.include_graph || entities_only;

    KnowledgeGraphOutput {
        statistics: statistics(graph),
        graph_summary: doc.graph_summary.clone().filter(|s| !s.is_empty()),
        content_gaps: list(&summary.content_gaps),
        main_topical_clusters: list(&summary.main_topics),
        main_concepts: list(&summary.main_concepts),
        conceptual_gateways: list(&summary.conceptual_gateways),
        top_relations: list(&summary.top_relations),
        top_bigrams: list(&summary.top_bigrams),
        statements: if options.include_statements {
            Some(doc.statements.clone().unwrap_or_default())
        } else {
            None
        },
        knowledge_graph: if options.add_nodes_and_edges {
            Some(graph.map(nodes_and_edges).unwrap_or_default())
        } else {
            None
        },
        knowledge_graph_by_cluster: if wants_clusters {
            graph.and_then(|g| g.attributes.dot_graph_by_cluster.clone())
        } else {
            None
        },
        top_clusters: if wants_clusters {
            Some(graph.map(clusters).unwrap_or_default())
        } else {
            None
        },
        entities: if entities_only {
            Some(
                graph
                    .map(|g| g.nodes.iter().map(|n| n.label.clone()).collect())
                    .unwrap_or_default(),
            )
        } else {
            None
        },
        user_name: doc.user_name.clone(),
        graph_name: doc.graph_name.clone(),
        graph_url: doc.graph_url.clone(),
        is_public: doc.is_public,
    }
}

pub fn content_gaps(doc: &GraphResponse) -> GapsOutput {
    GapsOutput {
        content_gaps: list(&doc.summary().content_gaps),
    }
}

pub fn topical_clusters(doc: &GraphResponse) -> TopicsOutput {
    TopicsOutput {
        topical_clusters: list(&doc.summary().main_topics),
    }
}

pub fn contextual_hint(doc: &GraphResponse) -> GraphOverview {
    GraphOverview {
        text_overview: doc.graph_summary.clone().filter(|s| !s.is_empty()),
    }
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    for bullet in ["-", "*", "•"] {
        if let Some(rest) = line.strip_prefix(bullet) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }

    line
}

/// Split advice texts into discrete items, one per non-empty line
pub fn advice_items(doc: &GraphResponse) -> Vec<String> {
    doc.ai_advice
        .iter()
        .flatten()
        .flat_map(|advice| advice.text.lines())
        .map(strip_list_marker)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn research_questions(doc: &GraphResponse) -> ResearchQuestionsOutput {
    ResearchQuestionsOutput {
        questions: advice_items(doc),
    }
}

pub fn research_ideas(doc: &GraphResponse) -> ResearchIdeasOutput {
    ResearchIdeasOutput {
        ideas: advice_items(doc),
    }
}

pub fn responses(doc: &GraphResponse) -> ResponsesOutput {
    ResponsesOutput {
        responses: advice_items(doc),
    }
}

pub fn latent_topics(doc: &GraphResponse) -> LatentTopicsOutput {
    let summary = doc.summary();
    LatentTopicsOutput {
        ideas: advice_items(doc),
        main_topics: list(&summary.main_topics),
        latent_topics_to_develop: list(&summary.topics_to_develop),
    }
}

pub fn conceptual_bridges(doc: &GraphResponse) -> LatentConceptsOutput {
    let summary = doc.summary();
    LatentConceptsOutput {
        ideas: advice_items(doc),
        latent_concepts_to_develop: list(&summary.conceptual_gateways),
        latent_concepts_relations: list(&summary.conceptual_gateways_graph),
    }
}

/// Combine the three stages of the develop-text workflow
pub fn develop_text(
    gaps: &GraphResponse,
    latent: &GraphResponse,
    bridges: &GraphResponse,
) -> DevelopTextOutput {
    let gaps_summary = gaps.summary();
    let latent_summary = latent.summary();
    DevelopTextOutput {
        content_gap_ideas: advice_items(gaps),
        latent_topics_ideas: advice_items(latent),
        conceptual_bridges_ideas: advice_items(bridges),
        content_gaps: list(&gaps_summary.content_gaps),
        conceptual_bridges: list(&bridges.summary().conceptual_gateways),
        latent_topics: list(&latent_summary.topics_to_develop),
        main_topics: list(&latent_summary.main_topics),
    }
}

/// Keywords from the top bigrams, `"a <-> b"` becomes `"a b"`
pub fn keywords_from_bigrams(doc: &GraphResponse) -> Vec<String> {
    list(&doc.summary().top_bigrams)
        .iter()
        .map(|bigram| {
            bigram
                .split("<->")
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// AI topic names, falling back to the cluster names of the graph
pub fn topic_names(doc: &GraphResponse) -> Vec<String> {
    if let Some(names) = doc.summary().main_topic_names.filter(|n| !n.is_empty()) {
        return names;
    }
    doc.graphology()
        .map(|g| {
            g.attributes
                .top_clusters
                .iter()
                .filter_map(|c| c.ai_name.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Deduplicate exact strings, keeping first-seen order
pub fn merge_unique<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut merged: Vec<String> = Vec::new();
    for value in values {
        if !merged.contains(&value) {
            merged.push(value);
        }
    }
    merged
}

/// Search queries derived from a text graph: three keywords, three topics
pub fn seo_queries(doc: &GraphResponse) -> Vec<String> {
    merge_unique(
        keywords_from_bigrams(doc)
            .into_iter()
            .take(3)
            .chain(topic_names(doc).into_iter().take(3)),
    )
}

/// Main topics followed by content gaps, one per line
pub fn summary_from_topics_and_gaps(doc: &GraphResponse) -> String {
    let summary = doc.summary();
    list(&summary.main_topics)
        .into_iter()
        .chain(list(&summary.content_gaps))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn insights(doc: &GraphResponse) -> InsightsOutput {
    let summary = doc.summary();
    InsightsOutput {
        content_gaps: list(&summary.content_gaps),
        main_topics: list(&summary.main_topics),
        main_concepts: list(&summary.main_concepts),
        concepts_to_develop: list(&summary.topics_to_develop),
        top_keyword_combinations: list(&summary.top_bigrams),
    }
}

/// Text of every statement that has one
pub fn statement_strings(doc: &GraphResponse) -> Vec<String> {
    doc.statements
        .iter()
        .flatten()
        .filter_map(|s| s.content())
        .map(str::to_string)
        .collect()
}

/// Relations found by an entity search across memory graphs
pub fn memory_from_search(response: &SearchResponse) -> Result<MemoryOutput> {
    let statements = response
        .entries_added
        .as_ref()
        .map(|e| e.texts.clone())
        .unwrap_or_default();
    if statements.is_empty() {
        return Err(ApiError::EmptyResult {
            message: "No statements found in memory for the given entity".to_string(),
        }
        .into());
    }

    Ok(MemoryOutput {
        statements,
        graph_names: response.graph_names.clone().unwrap_or_default(),
        graph_urls: response.graph_urls.clone().unwrap_or_default(),
        user_name: response.user_name.clone(),
    })
}

/// All statements of one memory graph
pub fn memory_from_graph(doc: &GraphResponse, context_name: &str) -> MemoryOutput {
    MemoryOutput {
        statements: statement_strings(doc),
        graph_names: vec![doc
            .graph_name
            .clone()
            .unwrap_or_else(|| context_name.to_string())],
        graph_urls: doc.graph_url.iter().cloned().collect(),
        user_name: doc.user_name.clone(),
    }
}

/// One result per matching graph
pub fn search_results(response: &SearchResponse, query: &str) -> SearchOutput {
    let user_name = response.user_name.clone().unwrap_or_default();
    let urls = response.graph_urls.clone().unwrap_or_default();
    let results = response
        .graph_names
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, graph_name)| SearchResult {
            id: SearchResultId::render(&user_name, graph_name, query),
            title: graph_name.clone(),
            url: urls.get(i).cloned().unwrap_or_default(),
        })
        .collect();
    SearchOutput { results }
}

/// Matched statements of one search result
pub fn fetch_result(response: &SearchResponse, id: &SearchResultId) -> FetchOutput {
    let text = response
        .entries_added
        .as_ref()
        .map(|e| e.texts.join("\n"))
        .unwrap_or_default();
    FetchOutput {
        id: SearchResultId::render(&id.user_name, &id.graph_name, &id.query),
        title: id.graph_name.clone(),
        text,
        url: response
            .graph_urls
            .as_ref()
            .and_then(|urls| urls.first().cloned())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph_doc() -> GraphResponse {
        serde_json::from_value(json!({
            "graph": {
                "graphologyGraph": {
                    "attributes": {
                        "modularity": 0.5,
                        "top_clusters": [
                            {"community": 0, "nodes": [{"nodeName": "cat"}, {"nodeName": "dog"}], "aiName": "Pets", "statementIds": [1, 2]},
                            {"community": 1, "nodes": [{"nodeName": "bird"}], "aiName": "Flight"}
                        ],
                        "dotGraphByCluster": {"0": "cat -> dog"}
                    },
                    "nodes": [
                        {"id": "cat", "label": "cat", "degree": 2, "bc": 0.3, "community": 0, "x": 10.0, "y": 20.0},
                        {"id": "dog", "label": "dog", "degree": 1, "bc": 0.1, "community": 0, "x": 11.0, "y": 21.0}
                    ],
                    "edges": [{"source": "cat", "target": "dog", "weight": 2}]
                }
            },
            "statements": [{"id": 1, "content": "Cats are mammals."}, "Dogs are mammals."],
            "extendedGraphSummary": {
                "contentGaps": ["pets <-> flight"],
                "mainTopics": ["Pets: cat dog"],
                "topBigrams": ["cat <-> dog", "dog <-> mammal", "cat <-> dog", "bird <-> fly"],
                "mainTopicNames": ["Pets", "Flight"]
            },
            "userName": "alice",
            "graphName": "animals"
        }))
        .unwrap()
    }

    #[test]
    fn test_knowledge_graph_minimal() {
        let output = knowledge_graph(&graph_doc(), &ProjectionOptions::default());
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["statistics"]["nodeCount"], json!(2));
        assert_eq!(value["statistics"]["clusterCount"], json!(2));
        assert_eq!(value["contentGaps"], json!(["pets <-> flight"]));
        assert_eq!(value["mainConcepts"], json!([]));
        assert!(value.get("statements").is_none());
        assert!(value.get("knowledgeGraph").is_none());
        assert!(value.get("topClusters").is_none());
        assert!(value.get("entities").is_none());
        assert!(value.get("graphUrl").is_none());
        assert_eq!(value["graphName"], json!("animals"));
    }

    #[test]
    fn test_knowledge_graph_opt_in_fields() {
        let options = ProjectionOptions {
            include_statements: true,
            include_graph: true,
            add_nodes_and_edges: true,
            text_mode: TextMode::None,
        };
        let value = serde_json::to_value(knowledge_graph(&graph_doc(), &options)).unwrap();

        assert_eq!(value["statements"][1], json!("Dogs are mammals."));
        assert_eq!(value["knowledgeGraph"]["nodes"][0]["label"], json!("cat"));
        assert!(value["knowledgeGraph"]["nodes"][0].get("x").is_none());
        assert!(value["knowledgeGraph"]["nodes"][0].get("y").is_none());
        assert_eq!(value["topClusters"][0]["concepts"], json!(["cat", "dog"]));
        assert_eq!(value["topClusters"][0]["statementIds"], json!([1, 2]));
        assert_eq!(value["knowledgeGraphByCluster"]["0"], json!("cat -> dog"));
    }

    #[test]
    fn test_entities_from_node_labels() {
        let options = ProjectionOptions {
            text_mode: TextMode::ExtractEntitiesOnly,
            ..ProjectionOptions::default()
        };
        let output = knowledge_graph(&graph_doc(), &options);
        assert_eq!(output.entities, Some(vec!["cat".to_string(), "dog".to_string()]));
        assert!(output.top_clusters.is_some());
    }

    #[test]
    fn test_advice_items() {
        let doc: GraphResponse = serde_json::from_value(json!({
            "aiAdvice": [
                {"text": "1. How do cats fly?\n2) Why do birds purr?\n\n- What links them?"},
                {"text": "• Last one\n* 1.5 million birds"}
            ]
        }))
        .unwrap();
        assert_eq!(
            advice_items(&doc),
            vec![
                "How do cats fly?",
                "Why do birds purr?",
                "What links them?",
                "Last one",
                "1.5 million birds"
            ]
        );
        assert!(advice_items(&GraphResponse::default()).is_empty());
    }

    #[test]
    fn test_seo_queries_dedup() {
        let doc = graph_doc();
        assert_eq!(keywords_from_bigrams(&doc)[0], "cat dog");
        assert_eq!(seo_queries(&doc), vec!["cat dog", "dog mammal", "Pets", "Flight"]);
    }

    #[test]
    fn test_topic_names_fallback() {
        let mut doc = graph_doc();
        doc.extended_graph_summary = None;
        assert_eq!(topic_names(&doc), vec!["Pets", "Flight"]);
    }

    #[test]
    fn test_merge_unique_order() {
        let merged = merge_unique(
            ["b", "a", "b", "c", "a"].iter().map(|s| s.to_string()),
        );
        assert_eq!(merged, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_summary_and_statements() {
        let doc = graph_doc();
        assert_eq!(summary_from_topics_and_gaps(&doc), "Pets: cat dog\npets <-> flight");
        assert_eq!(statement_strings(&doc), vec!["Cats are mammals.", "Dogs are mammals."]);
    }

    #[test]
    fn test_memory_from_search_empty() {
        let response: SearchResponse =
            serde_json::from_value(json!({"entriesAdded": {"ids": [], "texts": []}})).unwrap();
        let err = memory_from_search(&response).unwrap_err();
        assert_eq!(err.user_message(), "No statements found in memory for the given entity");
    }

    #[test]
    fn test_search_and_fetch() {
        let response: SearchResponse = serde_json::from_value(json!({
            "entriesAdded": {"ids": [1, 2], "texts": ["first", "second"]},
            "userName": "alice",
            "graphNames": ["notes", "ideas"],
            "graphUrls": ["https://infranodus.com/alice/notes"]
        }))
        .unwrap();

        let output = search_results(&response, "rust");
        assert_eq!(output.results.len(), 2);
        assert_eq!(output.results[0].id, "alice:notes:rust");
        assert_eq!(output.results[1].url, "");

        let id = SearchResultId::parse("alice:notes:rust").unwrap();
        let fetched = fetch_result(&response, &id);
        assert_eq!(fetched.text, "first\nsecond");
        assert_eq!(fetched.url, "https://infranodus.com/alice/notes");
    }
}
