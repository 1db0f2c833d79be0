//! MCP Tool definitions and handlers
//!
//! Defines all available tools and their implementations. Every handler
//! follows the same path: parse and validate arguments, compose the request,
//! call the API, check for a service error and project the response.

use std::sync::Arc;

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{McpError, Result, ValidationError};
use crate::infranodus::client::{call, InfraNodusApi};
use crate::infranodus::output::{
    DevelopTextOutput, FetchOutput, GapsOutput, GraphOverview, KnowledgeGraphOutput,
    LatentConceptsOutput, LatentTopicsOutput, MemoryOutput, ResearchIdeasOutput,
    ResearchQuestionsOutput, ResponsesOutput, SearchOutput, SeoReport, TopicsOutput,
};
use crate::infranodus::params::*;
use crate::infranodus::progress::ProgressSink;
use crate::infranodus::projection::{self, ProjectionOptions};
use crate::infranodus::request::{self, AdviceOptimize, ApiRequest, CompareMode};
use crate::infranodus::types::{GraphResponse, SearchResponse};
use crate::infranodus::workflows;
use crate::mcp::types::{CallToolResult, Tool, ToolAnnotations};

/// Tool handler
pub struct ToolHandler {
    api: Arc<dyn InfraNodusApi>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(api: Arc<dyn InfraNodusApi>) -> Self {
        Self { api }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        catalog()
    }

    /// Call a tool by name
    pub async fn call_tool(
        &self,
        name: &str,
        args: Value,
        progress: Option<&dyn ProgressSink>,
    ) -> CallToolResult {
        tracing::info!("Calling tool {}", name);

        match name {
            "generate_knowledge_graph" => respond(self.generate_knowledge_graph(args).await),
            "create_knowledge_graph" => respond(self.create_knowledge_graph(args).await),
            "analyze_existing_graph_by_name" => respond(self.analyze_existing_graph(args).await),
            "generate_content_gaps" => respond(self.content_gaps(args).await),
            "generate_topical_clusters" => respond(self.topical_clusters(args).await),
            "generate_contextual_hint" => respond(self.contextual_hint(args).await),
            "generate_research_questions" => respond(self.research_questions(args).await),
            "generate_research_ideas" => respond(self.research_ideas(args).await),
            "generate_research_questions_from_graph" => {
                respond(self.graph_research_questions(args).await)
            }
            "generate_responses_from_graph" => respond(self.graph_responses(args).await),
            "develop_conceptual_bridges" => respond(self.conceptual_bridges(args).await),
            "develop_latent_topics" => respond(self.latent_topics(args).await),
            "develop_text_tool" => respond(self.develop_text(args, progress).await),
            "overlap_between_texts" => respond(self.compare(args, CompareMode::Overlap).await),
            "difference_between_texts" => {
                respond(self.compare(args, CompareMode::Difference).await)
            }
            "analyze_google_search_results" => respond(self.search_results_graph(args).await),
            "analyze_related_search_queries" => respond(self.search_queries_graph(args).await),
            "search_queries_vs_search_results" => {
                respond(self.results_vs_queries_graph(args).await)
            }
            "generate_seo_report" => respond(self.seo_report(args, progress).await),
            "memory_add_relations" => respond(self.add_memory(args).await),
            "memory_get_relations" => respond(self.get_memory(args).await),
            "search" => respond(self.search(args).await),
            "fetch" => respond(self.fetch(args).await),
            _ => respond::<Value>(Err(McpError::UnknownTool {
                name: name.to_string(),
            }
            .into())),
        }
    }

    /// Call the API, check the `error` field, then project the typed document
    pub async fn pipeline<T, O, F>(&self, request: &ApiRequest, project: F) -> Result<O>
    where
        T: DeserializeOwned,
        F: FnOnce(&T) -> O,
    {
        self.try_pipeline(request, |doc: &T| Ok(project(doc))).await
    }

    /// Same as [`pipeline`](Self::pipeline) for projections that can reject the document
    pub async fn try_pipeline<T, O, F>(&self, request: &ApiRequest, project: F) -> Result<O>
    where
        T: DeserializeOwned,
        F: FnOnce(&T) -> Result<O>,
    {
        let doc: T = call(self.api.as_ref(), request).await?;
        project(&doc)
    }

    async fn graph_tool(
        &self,
        request: &ApiRequest,
        options: ProjectionOptions,
    ) -> Result<KnowledgeGraphOutput> {
        self.pipeline(request, |doc: &GraphResponse| {
            projection::knowledge_graph(doc, &options)
        })
        .await
    }

    // ==================== Knowledge graphs ====================

    async fn generate_knowledge_graph(&self, args: Value) -> Result<KnowledgeGraphOutput> {
        let params: GenerateGraphParams = parse_args(args)?;
        let options = ProjectionOptions {
            include_statements: params.include_statements,
            include_graph: params.include_graph,
            add_nodes_and_edges: params.add_nodes_and_edges,
            text_mode: params.modify_analyzed_text,
        };
        self.graph_tool(&request::generate_graph(&params), options).await
    }

    async fn create_knowledge_graph(&self, args: Value) -> Result<KnowledgeGraphOutput> {
        let params: CreateGraphParams = parse_args(args)?;
        let options = ProjectionOptions {
            include_statements: params.include_statements,
            include_graph: params.include_graph,
            add_nodes_and_edges: params.add_nodes_and_edges,
            text_mode: params.modify_analyzed_text,
        };
        self.graph_tool(&request::create_graph(&params), options).await
    }

    async fn analyze_existing_graph(&self, args: Value) -> Result<KnowledgeGraphOutput> {
        let params: AnalyzeExistingGraphParams = parse_args(args)?;
        let options = ProjectionOptions {
            include_statements: params.include_statements,
            include_graph: params.include_graph,
            add_nodes_and_edges: params.add_nodes_and_edges,
            text_mode: params.modify_analyzed_text,
        };
        self.graph_tool(&request::analyze_existing_graph(&params), options).await
    }

    // ==================== Text summaries ====================

    async fn content_gaps(&self, args: Value) -> Result<GapsOutput> {
        let params: TextParams = parse_args(args)?;
        self.pipeline(&request::text_summary(&params.text, false), projection::content_gaps)
            .await
    }

    async fn topical_clusters(&self, args: Value) -> Result<TopicsOutput> {
        let params: TextParams = parse_args(args)?;
        self.pipeline(&request::text_summary(&params.text, false), projection::topical_clusters)
            .await
    }

    async fn contextual_hint(&self, args: Value) -> Result<GraphOverview> {
        let params: TextParams = parse_args(args)?;
        self.pipeline(&request::text_summary(&params.text, true), projection::contextual_hint)
            .await
    }

    // ==================== AI advice ====================

    async fn research_questions(&self, args: Value) -> Result<ResearchQuestionsOutput> {
        let params: ResearchParams = parse_args(args)?;
        self.pipeline(&request::research_questions(&params), projection::research_questions)
            .await
    }

    async fn research_ideas(&self, args: Value) -> Result<ResearchIdeasOutput> {
        let params: ResearchParams = parse_args(args)?;
        self.pipeline(&request::research_ideas(&params), projection::research_ideas)
            .await
    }

    async fn graph_research_questions(&self, args: Value) -> Result<ResearchQuestionsOutput> {
        let params: GraphResearchParams = parse_args(args)?;
        self.pipeline(
            &request::graph_research_questions(&params),
            projection::research_questions,
        )
        .await
    }

    async fn graph_responses(&self, args: Value) -> Result<ResponsesOutput> {
        let params: GraphResponsesParams = parse_args(args)?;
        self.pipeline(&request::graph_responses(&params), projection::responses)
            .await
    }

    async fn conceptual_bridges(&self, args: Value) -> Result<LatentConceptsOutput> {
        let params: LatentParams = parse_args(args)?;
        self.pipeline(
            &request::latent(&params, AdviceOptimize::Imagine),
            projection::conceptual_bridges,
        )
        .await
    }

    async fn latent_topics(&self, args: Value) -> Result<LatentTopicsOutput> {
        let params: LatentParams = parse_args(args)?;
        self.pipeline(
            &request::latent(&params, AdviceOptimize::Latent),
            projection::latent_topics,
        )
        .await
    }

    async fn develop_text(
        &self,
        args: Value,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<DevelopTextOutput> {
        let params: DevelopTextParams = parse_args(args)?;
        workflows::develop_text(self.api.as_ref(), &params, progress).await
    }

    // ==================== Comparison ====================

    async fn compare(&self, args: Value, mode: CompareMode) -> Result<KnowledgeGraphOutput> {
        let params: CompareParams = parse_args(args)?;
        validate_contexts(&params.contexts)?;
        let options = ProjectionOptions {
            include_statements: params.include_statements,
            include_graph: params.include_graph,
            add_nodes_and_edges: params.add_nodes_and_edges,
            text_mode: TextMode::None,
        };
        self.graph_tool(&request::compare(&params, mode), options).await
    }

    // ==================== Search imports ====================

    async fn search_results_graph(&self, args: Value) -> Result<KnowledgeGraphOutput> {
        let params: SearchResultsParams = parse_args(args)?;
        let options = import_options(params.show_graph_only, params.show_extended_graph_info);
        self.graph_tool(&request::search_results_graph(&params), options).await
    }

    async fn search_queries_graph(&self, args: Value) -> Result<KnowledgeGraphOutput> {
        let params: SearchQueriesParams = parse_args(args)?;
        let options = import_options(params.show_graph_only, params.show_extended_graph_info);
        self.graph_tool(&request::search_queries_graph(&params), options).await
    }

    async fn results_vs_queries_graph(&self, args: Value) -> Result<KnowledgeGraphOutput> {
        let params: ResultsVsQueriesParams = parse_args(args)?;
        let options = import_options(params.show_graph_only, params.show_extended_graph_info);
        self.graph_tool(&request::results_vs_queries_graph(&params), options).await
    }

    async fn seo_report(
        &self,
        args: Value,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<SeoReport> {
        let params: SeoParams = parse_args(args)?;
        workflows::seo_report(self.api.as_ref(), &params, progress).await
    }

    // ==================== Memory ====================

    async fn add_memory(&self, args: Value) -> Result<KnowledgeGraphOutput> {
        let params: AddMemoryParams = parse_args(args)?;
        let options = ProjectionOptions {
            include_statements: params.include_statements,
            include_graph: params.include_graph,
            add_nodes_and_edges: params.add_nodes_and_edges,
            text_mode: params.modify_analyzed_text,
        };
        self.graph_tool(&request::add_memory(&params), options).await
    }

    async fn get_memory(&self, args: Value) -> Result<MemoryOutput> {
        let params: GetMemoryParams = parse_args(args)?;
        let entity = params.entity_name.trim();
        let context = params.memory_context_name.trim();

        if entity.is_empty() && context.is_empty() {
            return Err(ValidationError::MissingField {
                field: "entityName or memoryContextName".to_string(),
            }
            .into());
        }

        if entity.is_empty() {
            return self
                .pipeline(&request::memory_context(context), |doc: &GraphResponse| {
                    projection::memory_from_graph(doc, context)
                })
                .await;
        }

        let contexts: Vec<String> = if context.is_empty() {
            Vec::new()
        } else {
            vec![context.to_string()]
        };
        self.try_pipeline(&request::search(entity, &contexts), projection::memory_from_search)
            .await
    }

    // ==================== Search ====================

    async fn search(&self, args: Value) -> Result<SearchOutput> {
        let params: SearchParams = parse_args(args)?;
        let query = params.query.clone();
        self.pipeline(
            &request::search(&params.query, &params.context_names),
            |response: &SearchResponse| projection::search_results(response, &query),
        )
        .await
    }

    async fn fetch(&self, args: Value) -> Result<FetchOutput> {
        let params: FetchParams = parse_args(args)?;
        let id = SearchResultId::parse(&params.id)?;
        self.pipeline(
            &request::search(&id.query, &[id.graph_name.clone()]),
            |response: &SearchResponse| projection::fetch_result(response, &id),
        )
        .await
    }
}

/// Search imports show statements only when more than the graph is wanted
fn import_options(show_graph_only: bool, show_extended_graph_info: bool) -> ProjectionOptions {
    ProjectionOptions {
        include_statements: !show_graph_only,
        include_graph: show_extended_graph_info,
        add_nodes_and_edges: false,
        text_mode: TextMode::None,
    }
}

/// Deserialize and validate tool arguments; a missing object counts as `{}`
pub fn parse_args<P>(args: Value) -> Result<P>
where
    P: DeserializeOwned + Validate,
{
    let args = if args.is_null() { json!({}) } else { args };
    let params: P = serde_json::from_value(args).map_err(|e| ValidationError::InvalidArguments {
        message: e.to_string(),
    })?;
    params.validate()?;
    Ok(params)
}

/// Wrap any tool outcome into the caller-facing result
pub fn respond<T: Serialize>(result: Result<T>) -> CallToolResult {
    let text = result.and_then(|output| Ok(serde_json::to_string_pretty(&output)?));
    match text {
        Ok(text) => CallToolResult::text(text),
        Err(e) => {
            tracing::warn!("Tool call failed: {}", e);
            CallToolResult::error(e.user_message())
        }
    }
}

/// JSON schema of a parameter struct, with nested definitions inlined
pub fn input_schema<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<T>();

    match serde_json::to_value(schema) {
        Ok(Value::Object(mut map)) => {
            map.remove("title");
            Value::Object(map)
        }
        _ => json!({"type": "object", "properties": {}}),
    }
}

fn read_only() -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: true,
        destructive_hint: false,
        idempotent_hint: true,
        open_world_hint: true,
    }
}

fn saving() -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: false,
        destructive_hint: false,
        idempotent_hint: false,
        open_world_hint: true,
    }
}

fn tool_def<T: JsonSchema>(
    name: &str,
    title: &str,
    description: &str,
    annotations: ToolAnnotations,
) -> Tool {
    Tool {
        name: name.to_string(),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        input_schema: input_schema::<T>(),
        annotations: Some(annotations),
    }
}

/// The full tool catalogue
pub fn catalog() -> Vec<Tool> {
    vec![
        tool_def::<GenerateGraphParams>(
            "generate_knowledge_graph",
            "Generate Knowledge Graph from Text",
            "Analyze text and generate a knowledge graph with main topics, topical clusters, concepts, concepts relations and structural gaps.",
            read_only(),
        ),
        tool_def::<CreateGraphParams>(
            "create_knowledge_graph",
            "Create a Knowledge Graph in InfraNodus from Text",
            "Create a knowledge graph in InfraNodus from text, save it, and provide its name and a link to it for future use.",
            saving(),
        ),
        tool_def::<AnalyzeExistingGraphParams>(
            "analyze_existing_graph_by_name",
            "Analyze or Extract an Existing InfraNodus Graph",
            "Extract and analyze an existing graph from your InfraNodus account.",
            read_only(),
        ),
        tool_def::<TextParams>(
            "generate_content_gaps",
            "Generate Content Gaps from Text",
            "Analyze text and identify the structural gaps between its topical clusters.",
            read_only(),
        ),
        tool_def::<TextParams>(
            "generate_topical_clusters",
            "Generate Topical Clusters from Text",
            "Generate topics and clusters of keywords from text using knowledge graph analysis.",
            read_only(),
        ),
        tool_def::<TextParams>(
            "generate_contextual_hint",
            "Generate Contextual Hint for a Text",
            "Generate information about the main topics and concepts in a text to augment RAG retrieval and text analysis.",
            read_only(),
        ),
        tool_def::<ResearchParams>(
            "generate_research_questions",
            "Generate Research Questions from Text",
            "Analyze text and generate research questions based on the content gaps between its topical clusters.",
            read_only(),
        ),
        tool_def::<ResearchParams>(
            "generate_research_ideas",
            "Generate Research Ideas from Text",
            "Analyze text and generate innovative research ideas based on the content gaps identified between the topical clusters inside the text.",
            read_only(),
        ),
        tool_def::<GraphResearchParams>(
            "generate_research_questions_from_graph",
            "Generate Research Questions from an Existing Graph",
            "Generate research questions based on the content gaps of an existing InfraNodus graph.",
            read_only(),
        ),
        tool_def::<GraphResponsesParams>(
            "generate_responses_from_graph",
            "Generate Responses from an Existing Graph",
            "Generate responses to a prompt grounded in an existing InfraNodus graph or ontology.",
            read_only(),
        ),
        tool_def::<LatentParams>(
            "develop_conceptual_bridges",
            "Develop Conceptual Bridges in Text",
            "Analyze text and get ideas on how to develop conceptual bridges in this text to link it to a broader discourse.",
            read_only(),
        ),
        tool_def::<LatentParams>(
            "develop_latent_topics",
            "Develop Latent Topics in Text",
            "Analyze text, extract underdeveloped topics and get an idea on how to develop them.",
            read_only(),
        ),
        tool_def::<DevelopTextParams>(
            "develop_text_tool",
            "Develop a Text Based on Content Gaps and Latent Topics",
            "Analyze text to extract research questions, develop latent topics, and identify content gaps in a single workflow with progress tracking.",
            read_only(),
        ),
        tool_def::<CompareParams>(
            "overlap_between_texts",
            "Generate Overlap Knowledge Graph from Texts",
            "Extract the common relationships and similarities between texts and generate an overlap graph.",
            read_only(),
        ),
        tool_def::<CompareParams>(
            "difference_between_texts",
            "Generate Difference Knowledge Graph from Texts",
            "Extract the conceptual relations that are not present in the first text but are in the other texts.",
            read_only(),
        ),
        tool_def::<SearchResultsParams>(
            "analyze_google_search_results",
            "Analyze the Main Topics in Google Search Results",
            "Generate a knowledge graph and topical clusters from Google search results for provided search queries.",
            read_only(),
        ),
        tool_def::<SearchQueriesParams>(
            "analyze_related_search_queries",
            "Analyze Google Search Intent Related to Given Queries",
            "Generate a knowledge graph and identify main topical clusters in the search requests related to the search queries provided.",
            read_only(),
        ),
        tool_def::<ResultsVsQueriesParams>(
            "search_queries_vs_search_results",
            "Generate a Knowledge Graph of Search Queries vs Search Results",
            "Find the combinations of keywords and topics people search for that don't appear in the search results for the same queries.",
            read_only(),
        ),
        tool_def::<SeoParams>(
            "generate_seo_report",
            "Generate SEO Analysis Report",
            "Analyze content for SEO optimization by comparing its knowledge graph with the graphs of Google search results and search queries to identify content gaps and opportunities.",
            read_only(),
        ),
        tool_def::<AddMemoryParams>(
            "memory_add_relations",
            "Add Relations to the InfraNodus Memory",
            "Add relations to the InfraNodus memory from text, save it, and provide its name and a link to it for future use.",
            saving(),
        ),
        tool_def::<GetMemoryParams>(
            "memory_get_relations",
            "Get Relations from the InfraNodus Memory",
            "Provide a list of relations from the InfraNodus memory for a given concept or entity.",
            read_only(),
        ),
        tool_def::<SearchParams>(
            "search",
            "Search Existing InfraNodus Graphs",
            "Search through existing InfraNodus graphs and return the matching graphs.",
            read_only(),
        ),
        tool_def::<FetchParams>(
            "fetch",
            "Fetch a Search Result",
            "Fetch the matching statements of a specific search result from an InfraNodus graph.",
            read_only(),
        ),
    ]
}
