//! Integration tests for InfraNodus MCP Server
//!
//! These tests drive the MCP protocol handling and tool invocations against
//! a fixture-backed API. No network calls are made.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use infranodus_mcp_server::error::Result;
use infranodus_mcp_server::infranodus::client::InfraNodusApi;
use infranodus_mcp_server::infranodus::progress::ProgressSink;
use infranodus_mcp_server::infranodus::request::{ApiRequest, Endpoint};
use infranodus_mcp_server::mcp::server::McpServer;
use infranodus_mcp_server::mcp::tools::ToolHandler;
use infranodus_mcp_server::mcp::types::CallToolResult;

/// Answers every call with one fixture document and records the requests
struct FixtureApi {
    fixture: Value,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FixtureApi {
    fn new(fixture: Value) -> Arc<Self> {
        Arc::new(Self {
            fixture,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InfraNodusApi for FixtureApi {
    async fn post(&self, request: &ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.fixture.clone())
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<(u8, String)>>);

impl ProgressSink for RecordingSink {
    fn report(&self, percentage: u8, message: &str) {
        self.0.lock().unwrap().push((percentage, message.to_string()));
    }
}

/// A graph document for "Cats are mammals. Dogs are mammals. Birds can fly."
fn animals_fixture() -> Value {
    json!({
        "graph": {
            "graphologyGraph": {
                "attributes": {
                    "modularity": 0.37,
                    "top_clusters": [
                        {"community": 0, "nodes": [{"nodeName": "mammal"}, {"nodeName": "cat"}, {"nodeName": "dog"}], "aiName": "Mammals"},
                        {"community": 1, "nodes": [{"nodeName": "bird"}, {"nodeName": "fly"}], "aiName": "Flight"}
                    ]
                },
                "nodes": [
                    {"id": "mammal", "label": "mammal", "degree": 2, "bc": 0.5, "community": 0, "x": -12.5, "y": 3.25},
                    {"id": "cat", "label": "cat", "degree": 1, "bc": 0.0, "community": 0, "x": 1.0, "y": 2.0},
                    {"id": "bird", "label": "bird", "degree": 1, "bc": 0.0, "community": 1, "x": 8.0, "y": -4.0}
                ],
                "edges": [
                    {"source": "cat", "target": "mammal", "weight": 1},
                    {"source": "bird", "target": "fly", "weight": 1}
                ]
            }
        },
        "statements": [
            {"id": 1, "content": "Cats are mammals."},
            {"id": 2, "content": "Dogs are mammals."},
            {"id": 3, "content": "Birds can fly."}
        ],
        "extendedGraphSummary": {
            "contentGaps": ["Mammals <-> Flight"],
            "mainTopics": ["1. Mammals: mammal cat dog", "2. Flight: bird fly"],
            "mainConcepts": ["mammal", "bird"],
            "topBigrams": ["cat <-> mammal", "dog <-> mammal", "bird <-> fly"],
            "mainTopicNames": ["Mammals", "Flight"]
        },
        "aiAdvice": [{"text": "1. How might mammals relate to flight?\n2. Which mammals can fly?"}]
    })
}

/// Helper to create a JSON-RPC request
fn make_request(id: i64, method: &str, params: Option<Value>) -> Value {
    let mut request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
    });
    if let Some(p) = params {
        request["params"] = p;
    }
    request
}

/// Helper to parse a JSON-RPC response or notification line
fn parse_response(json_str: &str) -> Value {
    serde_json::from_str(json_str).expect("Failed to parse JSON response")
}

fn body(result: &CallToolResult) -> Value {
    parse_response(result.first_text().unwrap())
}

/// One valid argument set per tool
fn all_tools() -> Vec<(&'static str, Value)> {
    vec![
        ("generate_knowledge_graph", json!({"text": "Cats are mammals."})),
        ("create_knowledge_graph", json!({"graphName": "animals", "text": "Cats are mammals."})),
        ("analyze_existing_graph_by_name", json!({"graphName": "animals"})),
        ("generate_content_gaps", json!({"text": "Cats are mammals."})),
        ("generate_topical_clusters", json!({"text": "Cats are mammals."})),
        ("generate_contextual_hint", json!({"text": "Cats are mammals."})),
        ("generate_research_questions", json!({"text": "Cats are mammals."})),
        ("generate_research_ideas", json!({"text": "Cats are mammals."})),
        ("generate_research_questions_from_graph", json!({"graphName": "animals"})),
        ("generate_responses_from_graph", json!({"graphName": "animals", "prompt": "Why?"})),
        ("develop_conceptual_bridges", json!({"text": "Cats are mammals."})),
        ("develop_latent_topics", json!({"text": "Cats are mammals."})),
        ("develop_text_tool", json!({"text": "Cats are mammals."})),
        ("overlap_between_texts", json!({"contexts": [{"text": "a"}, {"text": "b"}]})),
        ("difference_between_texts", json!({"contexts": [{"text": "a"}, {"text": "b"}]})),
        ("analyze_google_search_results", json!({"queries": ["cats"]})),
        ("analyze_related_search_queries", json!({"queries": ["cats"]})),
        ("search_queries_vs_search_results", json!({"queries": ["cats"]})),
        ("generate_seo_report", json!({"text": "Cats are mammals."})),
        ("memory_add_relations", json!({"graphName": "animals", "text": "[[cat]] is a [[mammal]]"})),
        ("memory_get_relations", json!({"entityName": "[[cat]]"})),
        ("search", json!({"query": "cats"})),
        ("fetch", json!({"id": "alice:animals:cats"})),
    ]
}

mod tool_tests {
    use super::*;

    #[tokio::test]
    async fn test_cats_scenario() {
        let api = FixtureApi::new(animals_fixture());
        let handler = ToolHandler::new(api.clone());

        let result = handler
            .call_tool(
                "generate_knowledge_graph",
                json!({
                    "text": "Cats are mammals.\nDogs are mammals.\nBirds can fly.",
                    "includeGraph": false,
                    "includeStatements": false
                }),
                None,
            )
            .await;

        assert!(!result.is_error);
        let output = body(&result);
        assert_eq!(output["contentGaps"], json!(["Mammals <-> Flight"]));
        assert_eq!(output["mainTopicalClusters"].as_array().unwrap().len(), 2);
        assert!(output.get("knowledgeGraph").is_none());
        assert!(output.get("statements").is_none());
        assert_eq!(output["statistics"]["modularity"], json!(0.37));

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].endpoint, Endpoint::GraphAndStatements);
        assert_eq!(requests[0].query.get("includeGraph"), Some("false"));
        assert_eq!(requests[0].query.get("doNotSave"), Some("true"));
    }

    #[tokio::test]
    async fn test_service_error_is_verbatim_for_every_tool() {
        let api = FixtureApi::new(json!({"error": "Upstream says no: quota exceeded"}));
        let handler = ToolHandler::new(api);

        for (name, args) in all_tools() {
            let result = handler.call_tool(name, args, None).await;
            assert!(result.is_error, "{}", name);
            assert_eq!(
                body(&result),
                json!({"error": "Upstream says no: quota exceeded"}),
                "{}",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_every_tool_succeeds_on_fixture() {
        let mut fixture = animals_fixture();
        fixture["entriesAdded"] = json!({"ids": [1], "texts": ["[[cat]] is a [[mammal]]"]});
        fixture["graphNames"] = json!(["animals"]);
        fixture["graphUrls"] = json!(["https://infranodus.com/alice/animals"]);
        fixture["userName"] = json!("alice");
        let handler = ToolHandler::new(FixtureApi::new(fixture));

        for (name, args) in all_tools() {
            let result = handler.call_tool(name, args, None).await;
            assert!(!result.is_error, "{}: {:?}", name, result.first_text());
        }
    }

    #[tokio::test]
    async fn test_no_layout_coordinates_leak() {
        let handler = ToolHandler::new(FixtureApi::new(animals_fixture()));
        let result = handler
            .call_tool(
                "generate_knowledge_graph",
                json!({"text": "Cats are mammals.", "addNodesAndEdges": true, "includeGraph": true}),
                None,
            )
            .await;
        let text = result.first_text().unwrap();
        let output: Value = serde_json::from_str(text).unwrap();
        for node in output["knowledgeGraph"]["nodes"].as_array().unwrap() {
            assert!(node.get("x").is_none());
            assert!(node.get("y").is_none());
        }
        assert!(!text.contains("-12.5"));
    }

    #[tokio::test]
    async fn test_same_input_same_output() {
        let handler = ToolHandler::new(FixtureApi::new(animals_fixture()));
        let args = json!({"text": "Cats are mammals.", "includeStatements": true});

        let first = handler.call_tool("generate_knowledge_graph", args.clone(), None).await;
        let second = handler.call_tool("generate_knowledge_graph", args, None).await;
        assert_eq!(first.first_text(), second.first_text());
    }

    #[tokio::test]
    async fn test_difference_is_order_sensitive() {
        let api = FixtureApi::new(animals_fixture());
        let handler = ToolHandler::new(api.clone());

        handler
            .call_tool(
                "difference_between_texts",
                json!({"contexts": [{"text": "target text"}, {"text": "reference text"}]}),
                None,
            )
            .await;
        handler
            .call_tool(
                "difference_between_texts",
                json!({"contexts": [{"text": "reference text"}, {"text": "target text"}]}),
                None,
            )
            .await;

        let requests = api.requests();
        assert_eq!(requests[0].body["contexts"][0]["text"], json!("target text"));
        assert_eq!(requests[1].body["contexts"][0]["text"], json!("reference text"));
        assert_eq!(requests[0].query.get("compareMode"), Some("difference"));
    }

    #[tokio::test]
    async fn test_compare_needs_two_contexts() {
        let api = FixtureApi::new(animals_fixture());
        let handler = ToolHandler::new(api.clone());
        let result = handler
            .call_tool("overlap_between_texts", json!({"contexts": [{"text": "alone"}]}), None)
            .await;
        assert!(result.is_error);
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_research_questions_are_split() {
        let handler = ToolHandler::new(FixtureApi::new(animals_fixture()));
        let result = handler
            .call_tool("generate_research_questions", json!({"text": "Cats are mammals."}), None)
            .await;
        assert_eq!(
            body(&result)["questions"],
            json!(["How might mammals relate to flight?", "Which mammals can fly?"])
        );
    }

    #[tokio::test]
    async fn test_seo_report_progress_and_dedup() {
        let mut fixture = animals_fixture();
        fixture["extendedGraphSummary"]["mainTopicNames"] = json!(["Mammals", "bird fly", "Flight"]);
        let api = FixtureApi::new(fixture);
        let handler = ToolHandler::new(api.clone());
        let sink = RecordingSink::default();

        let result = handler
            .call_tool("generate_seo_report", json!({"text": "Cats are mammals."}), Some(&sink))
            .await;
        assert!(!result.is_error);

        let requests = api.requests();
        assert_eq!(requests.len(), 6);
        assert_eq!(
            requests[1].body["searchQuery"],
            json!("cat mammal,dog mammal,bird fly,Mammals,Flight")
        );

        let percentages: Vec<u8> = sink.0.lock().unwrap().iter().map(|(p, _)| *p).collect();
        assert!(percentages.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(percentages.last(), Some(&100));
    }

    #[tokio::test]
    async fn test_entity_extraction() {
        let api = FixtureApi::new(animals_fixture());
        let handler = ToolHandler::new(api.clone());
        let result = handler
            .call_tool(
                "generate_knowledge_graph",
                json!({"text": "[[cat]] and [[bird]]", "modifyAnalyzedText": "extractEntitiesOnly"}),
                None,
            )
            .await;
        assert_eq!(body(&result)["entities"], json!(["mammal", "cat", "bird"]));
        assert_eq!(api.requests()[0].query.get("compactGraph"), Some("true"));
    }
}

mod mcp_protocol_tests {
    use super::*;

    async fn roundtrip(server: &mut McpServer, request: Value) -> Option<Value> {
        let (tx, _rx) = mpsc::unbounded_channel();
        server
            .handle_message(&request.to_string(), &tx)
            .await
            .map(|r| serde_json::to_value(r).unwrap())
    }

    #[tokio::test]
    async fn test_initialize() {
        let mut server = McpServer::new(FixtureApi::new(json!({})));
        let response = roundtrip(
            &mut server,
            make_request(
                1,
                "initialize",
                Some(json!({
                    "protocolVersion": "2024-11-05",
                    "clientInfo": {"name": "test-client", "version": "1.0.0"},
                    "capabilities": {}
                })),
            ),
        )
        .await
        .unwrap();

        assert_eq!(response["id"], json!(1));
        assert_eq!(response["result"]["protocolVersion"], json!("2024-11-05"));
        assert_eq!(response["result"]["serverInfo"]["name"], json!("infranodus"));
        assert!(response["result"]["capabilities"]["tools"].is_object());
        assert!(response["result"]["capabilities"]["prompts"].is_object());
    }

    #[tokio::test]
    async fn test_list_tools() {
        let mut server = McpServer::new(FixtureApi::new(json!({})));
        let response = roundtrip(
            &mut server,
            make_request(2, "tools/list", None),
        )
        .await
        .unwrap();

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), all_tools().len());
        for tool in tools {
            assert_eq!(tool["inputSchema"]["type"], json!("object"), "{}", tool["name"]);
            assert!(tool["annotations"]["readOnlyHint"].is_boolean());
        }
    }

    #[tokio::test]
    async fn test_notifications_are_silent() {
        let mut server = McpServer::new(FixtureApi::new(json!({})));
        let response = roundtrip(
            &mut server,
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_call_tool_error_shape() {
        let mut server = McpServer::new(FixtureApi::new(json!({"error": "Graph not found"})));
        let response = roundtrip(
            &mut server,
            json!({
                "jsonrpc": "2.0",
                "id": "call-1",
                "method": "tools/call",
                "params": {"name": "analyze_existing_graph_by_name", "arguments": {"graphName": "missing"}}
            }),
        )
        .await
        .unwrap();

        assert_eq!(response["result"]["isError"], json!(true));
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let error: Value = serde_json::from_str(text).unwrap();
        assert_eq!(error, json!({"error": "Graph not found"}));
    }

    #[tokio::test]
    async fn test_progress_notifications_are_streamed() {
        let mut server = McpServer::new(FixtureApi::new(animals_fixture()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = make_request(
            7,
            "tools/call",
            Some(json!({
                "name": "develop_text_tool",
                "arguments": {"text": "Cats are mammals."},
                "_meta": {"progressToken": "dev-1"}
            })),
        );

        let response = server.handle_message(&request.to_string(), &tx).await.unwrap();
        assert!(response.error.is_none());

        let mut progress = Vec::new();
        while let Ok(line) = rx.try_recv() {
            let notification = parse_response(&line);
            assert_eq!(notification["method"], json!("notifications/progress"));
            assert_eq!(notification["params"]["progressToken"], json!("dev-1"));
            progress.push(notification["params"]["progress"].as_u64().unwrap());
        }
        assert_eq!(progress, vec![10, 35, 40, 60, 70, 90, 100]);
    }

    #[tokio::test]
    async fn test_no_token_no_progress() {
        let mut server = McpServer::new(FixtureApi::new(animals_fixture()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = make_request(
            8,
            "tools/call",
            Some(json!({"name": "develop_text_tool", "arguments": {"text": "Cats are mammals."}})),
        );
        server.handle_message(&request.to_string(), &tx).await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resources_and_prompts() {
        let mut server = McpServer::new(FixtureApi::new(json!({})));

        let response = roundtrip(
            &mut server,
            make_request(1, "resources/read", Some(json!({"uri": "info://about"}))),
        )
        .await
        .unwrap();
        let text = response["result"]["contents"][0]["text"].as_str().unwrap();
        assert!(text.contains("generate_seo_report"));

        let response = roundtrip(
            &mut server,
            make_request(
                2,
                "prompts/get",
                Some(json!({"name": "save-memory", "arguments": {"graphName": "notes", "text": "[[a]] b [[c]]"}})),
            ),
        )
        .await
        .unwrap();
        assert_eq!(response["result"]["messages"][0]["role"], json!("user"));
        assert_eq!(response["result"]["messages"][0]["content"]["type"], json!("text"));
    }

    #[test]
    fn test_blocking_ping() {
        let mut server = McpServer::new(FixtureApi::new(json!({})));
        let response = tokio_test::block_on(roundtrip(
            &mut server,
            make_request(9, "ping", None),
        ))
        .unwrap();
        assert_eq!(response["result"], json!({}));
    }
}
