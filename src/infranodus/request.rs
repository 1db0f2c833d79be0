//! Request composition
//!
//! Turns validated tool parameters into an [`ApiRequest`]: endpoint, string
//! query flags and JSON body. Everything here is pure; the client performs
//! the actual call.

use serde_json::{json, Map, Value};

use crate::infranodus::params::{
    AddMemoryParams, AiModel, AnalyzeExistingGraphParams, CompareParams, ContextInput,
    CreateGraphParams, Country, DevelopTextParams, GenerateGraphParams, GraphResearchParams,
    GraphResponsesParams, KeywordsSource, Language, LatentParams, ResearchParams,
    ResultsVsQueriesParams, SearchQueriesParams, SearchResultsParams, TextMode,
};

/// InfraNodus endpoints used by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Graph and statements for one text or saved graph
    GraphAndStatements,
    /// Graph plus AI-generated advice
    GraphAndAdvice,
    /// Multi-context comparison
    GraphsAndStatements,
    /// Import of Google search results
    GoogleSearchResults,
    /// Import of Google search intent (related queries)
    GoogleSearchIntent,
    /// Search intent versus search results
    GoogleSearchVsIntent,
    /// Full-text search across saved graphs
    Search,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::GraphAndStatements => "/graphAndStatements",
            Endpoint::GraphAndAdvice => "/graphAndAdvice",
            Endpoint::GraphsAndStatements => "/graphsAndStatements",
            Endpoint::GoogleSearchResults => "/import/googleSearchResultsGraph",
            Endpoint::GoogleSearchIntent => "/import/googleSearchIntentGraph",
            Endpoint::GoogleSearchVsIntent => "/import/googleSearchVsIntentGraph",
            Endpoint::Search => "/search",
        }
    }
}

/// Ordered, string-valued query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFlags {
    pairs: Vec<(&'static str, String)>,
}

impl QueryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boolean flag, sent as `"true"` / `"false"`
    pub fn flag(self, name: &'static str, value: bool) -> Self {
        self.param(name, if value { "true" } else { "false" })
    }

    /// Arbitrary string parameter; a repeated name replaces the earlier value
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL-encoded `a=b&c=d` form
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A fully composed call to the InfraNodus API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub query: QueryFlags,
    pub body: Value,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint, query: QueryFlags, body: Value) -> Self {
        Self {
            endpoint,
            query,
            body,
        }
    }

    /// Path plus encoded query string, appended to the API base
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.endpoint.path().to_string()
        } else {
            format!("{}?{}", self.endpoint.path(), self.query.encode())
        }
    }
}

/// Shape options shared by the knowledge-graph style tools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    pub save: bool,
    pub include_statements: bool,
    pub include_graph: bool,
    pub include_graph_summary: bool,
    pub text_mode: TextMode,
}

impl GraphOptions {
    /// The compact graph is needed whenever entities are extracted, since
    /// the entity list is read from its node labels
    pub fn wants_graph(&self) -> bool {
        self.include_graph || self.text_mode.extracts_entities()
    }
}

/// Flags of a `graphAndStatements` call
pub fn graph_flags(options: &GraphOptions) -> QueryFlags {
    let wants_graph = options.wants_graph();
    QueryFlags::new()
        .flag("doNotSave", !options.save)
        .flag("addStats", true)
        .flag("includeStatements", options.include_statements)
        .flag("includeGraphSummary", options.include_graph_summary)
        .flag("extendedGraphSummary", true)
        .flag("includeGraph", wants_graph)
        .flag("compactGraph", wants_graph)
        .flag("compactStatements", options.include_statements)
        .flag("aiTopics", true)
        .param("optimize", "develop")
}

fn with_text_mode(mut body: Map<String, Value>, mode: TextMode) -> Value {
    if mode != TextMode::None {
        body.insert("modifyAnalyzedText".to_string(), json!(mode));
    }
    Value::Object(body)
}

fn text_body(text: &str, graph_name: Option<&str>, mode: TextMode) -> Value {
    let mut body = Map::new();
    if let Some(name) = graph_name {
        body.insert("name".to_string(), json!(name));
    }
    body.insert("text".to_string(), json!(text));
    body.insert("aiTopics".to_string(), json!("true"));
    with_text_mode(body, mode)
}

/// `generate_knowledge_graph`
pub fn generate_graph(params: &GenerateGraphParams) -> ApiRequest {
    let options = GraphOptions {
        include_statements: params.include_statements,
        include_graph: params.include_graph,
        text_mode: params.modify_analyzed_text,
        ..GraphOptions::default()
    };
    ApiRequest::new(
        Endpoint::GraphAndStatements,
        graph_flags(&options),
        text_body(&params.text, None, params.modify_analyzed_text),
    )
}

/// `create_knowledge_graph`
pub fn create_graph(params: &CreateGraphParams) -> ApiRequest {
    let options = GraphOptions {
        save: true,
        include_statements: params.include_statements,
        include_graph: params.include_graph,
        text_mode: params.modify_analyzed_text,
        ..GraphOptions::default()
    };
    ApiRequest::new(
        Endpoint::GraphAndStatements,
        graph_flags(&options),
        text_body(&params.text, Some(&params.graph_name), params.modify_analyzed_text),
    )
}

/// `memory_add_relations`
pub fn add_memory(params: &AddMemoryParams) -> ApiRequest {
    let options = GraphOptions {
        save: true,
        include_statements: params.include_statements,
        include_graph: params.include_graph,
        text_mode: params.modify_analyzed_text,
        ..GraphOptions::default()
    };
    ApiRequest::new(
        Endpoint::GraphAndStatements,
        graph_flags(&options),
        text_body(&params.text, Some(&params.graph_name), params.modify_analyzed_text),
    )
}

/// `analyze_existing_graph_by_name`
pub fn analyze_existing_graph(params: &AnalyzeExistingGraphParams) -> ApiRequest {
    let options = GraphOptions {
        include_statements: params.include_statements,
        include_graph: params.include_graph,
        include_graph_summary: params.include_graph_summary,
        text_mode: params.modify_analyzed_text,
        ..GraphOptions::default()
    };
    let mut body = Map::new();
    body.insert("name".to_string(), json!(params.graph_name));
    body.insert("aiTopics".to_string(), json!("true"));
    ApiRequest::new(
        Endpoint::GraphAndStatements,
        graph_flags(&options),
        with_text_mode(body, params.modify_analyzed_text),
    )
}

/// Text summary call: extended summary for gaps and topics, AI summary on request
pub fn text_summary(text: &str, include_graph_summary: bool) -> ApiRequest {
    let query = QueryFlags::new()
        .flag("doNotSave", true)
        .flag("addStats", true)
        .flag("includeGraphSummary", include_graph_summary)
        .flag("extendedGraphSummary", !include_graph_summary)
        .flag("includeGraph", false)
        .flag("includeStatements", false)
        .flag("aiTopics", true);
    ApiRequest::new(
        Endpoint::GraphAndStatements,
        query,
        json!({ "text": text, "aiTopics": "true" }),
    )
}

/// Statements of one memory graph
pub fn memory_context(context_name: &str) -> ApiRequest {
    let query = QueryFlags::new()
        .flag("doNotSave", true)
        .flag("addStats", true)
        .flag("includeStatements", true)
        .flag("includeGraphSummary", false)
        .flag("extendedGraphSummary", false)
        .flag("includeGraph", true)
        .flag("compactGraph", true)
        .flag("compactStatements", true)
        .flag("aiTopics", false)
        .param("optimize", "develop");
    ApiRequest::new(
        Endpoint::GraphAndStatements,
        query,
        json!({ "name": context_name, "aiTopics": "false" }),
    )
}

/// What the advice endpoint is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceOptimize {
    /// Bridge the structural gaps
    Gap,
    /// Develop underdeveloped topics
    Latent,
    /// Conceptual gateways to a broader discourse
    Imagine,
}

impl AdviceOptimize {
    fn as_str(self) -> &'static str {
        match self {
            AdviceOptimize::Gap => "gap",
            AdviceOptimize::Latent => "latent",
            AdviceOptimize::Imagine => "imagine",
        }
    }
}

/// Form of the generated advice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Question,
    Response,
    Custom,
}

impl RequestMode {
    fn as_str(self) -> &'static str {
        match self {
            RequestMode::Question => "question",
            RequestMode::Response => "response",
            RequestMode::Custom => "custom",
        }
    }
}

/// Source of an advice call: raw text or a saved graph
#[derive(Debug, Clone, Copy)]
pub enum AdviceSource<'a> {
    Text(&'a str),
    Graph(&'a str),
}

/// A `graphAndAdvice` call
#[derive(Debug, Clone)]
pub struct AdviceRequest<'a> {
    pub source: AdviceSource<'a>,
    pub optimize: AdviceOptimize,
    pub request_mode: RequestMode,
    pub model: AiModel,
    /// `(extendedAdvice, gapDepth)`; only sent for gap advice
    pub gaps: Option<(bool, u32)>,
    pub prompt: Option<&'a str>,
}

pub fn advice(request: &AdviceRequest<'_>) -> ApiRequest {
    let mut query = QueryFlags::new()
        .flag("doNotSave", true)
        .flag("addStats", true)
        .param("optimize", request.optimize.as_str())
        .flag("includeStatements", false)
        .flag("includeGraphSummary", false)
        .flag("extendedGraphSummary", true)
        .flag("includeGraph", false)
        .flag("aiTopics", true);
    if let Some((several, depth)) = request.gaps {
        query = query
            .flag("extendedAdvice", several)
            .param("gapDepth", depth.to_string());
    }

    let mut body = Map::new();
    match request.source {
        AdviceSource::Text(text) => body.insert("text".to_string(), json!(text)),
        AdviceSource::Graph(name) => body.insert("name".to_string(), json!(name)),
    };
    body.insert("aiTopics".to_string(), json!("true"));
    body.insert("requestMode".to_string(), json!(request.request_mode.as_str()));
    body.insert("modelToUse".to_string(), json!(request.model));
    if let Some(prompt) = request.prompt {
        body.insert("prompt".to_string(), json!(prompt));
    }

    ApiRequest::new(Endpoint::GraphAndAdvice, query, Value::Object(body))
}

/// `generate_research_questions`
pub fn research_questions(params: &ResearchParams) -> ApiRequest {
    advice(&AdviceRequest {
        source: AdviceSource::Text(&params.text),
        optimize: AdviceOptimize::Gap,
        request_mode: RequestMode::Question,
        model: params.model_to_use,
        gaps: Some((params.use_several_gaps, params.gap_depth)),
        prompt: None,
    })
}

/// `generate_research_ideas`
pub fn research_ideas(params: &ResearchParams) -> ApiRequest {
    advice(&AdviceRequest {
        source: AdviceSource::Text(&params.text),
        optimize: AdviceOptimize::Gap,
        request_mode: RequestMode::Response,
        model: params.model_to_use,
        gaps: Some((params.use_several_gaps, params.gap_depth)),
        prompt: None,
    })
}

/// `generate_research_questions_from_graph`
pub fn graph_research_questions(params: &GraphResearchParams) -> ApiRequest {
    advice(&AdviceRequest {
        source: AdviceSource::Graph(&params.graph_name),
        optimize: AdviceOptimize::Gap,
        request_mode: RequestMode::Question,
        model: params.model_to_use,
        gaps: Some((params.use_several_gaps, params.gap_depth)),
        prompt: None,
    })
}

/// `generate_responses_from_graph`
pub fn graph_responses(params: &GraphResponsesParams) -> ApiRequest {
    advice(&AdviceRequest {
        source: AdviceSource::Graph(&params.graph_name),
        optimize: AdviceOptimize::Gap,
        request_mode: RequestMode::Custom,
        model: params.model_to_use,
        gaps: None,
        prompt: Some(&params.prompt),
    })
}

/// `develop_latent_topics` and `develop_conceptual_bridges`
pub fn latent(params: &LatentParams, optimize: AdviceOptimize) -> ApiRequest {
    advice(&AdviceRequest {
        source: AdviceSource::Text(&params.text),
        optimize,
        request_mode: RequestMode::Question,
        model: params.model_to_use,
        gaps: None,
        prompt: None,
    })
}

/// One stage of the develop-text workflow
pub fn develop_stage(params: &DevelopTextParams, optimize: AdviceOptimize) -> ApiRequest {
    let request_mode = if params.extended_ideation_mode {
        RequestMode::Response
    } else {
        RequestMode::Question
    };
    let gaps =
        (optimize == AdviceOptimize::Gap).then_some((params.use_several_gaps, params.gap_depth));
    advice(&AdviceRequest {
        source: AdviceSource::Text(&params.text),
        optimize,
        request_mode,
        model: params.model_to_use,
        gaps,
        prompt: None,
    })
}

/// Overlap or difference between contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    Overlap,
    Difference,
}

/// Flags of a `graphsAndStatements` call
pub fn compare_flags(include_statements: bool, include_graph: bool, mode: CompareMode) -> QueryFlags {
    let query = QueryFlags::new()
        .flag("doNotSave", true)
        .flag("addStats", true)
        .flag("includeStatements", include_statements)
        .flag("includeGraphSummary", false)
        .flag("extendedGraphSummary", true)
        .flag("includeGraph", include_graph)
        .flag("compactGraph", true)
        .flag("compactStatements", true)
        .flag("aiTopics", true)
        .param("optimize", "develop");
    match mode {
        CompareMode::Overlap => query,
        CompareMode::Difference => query.param("compareMode", "difference"),
    }
}

/// Context list in the given order; element 0 is the target of a difference
pub fn compare_contexts(
    contexts: &[ContextInput],
    mode: CompareMode,
    include_statements: bool,
    include_graph: bool,
) -> ApiRequest {
    let contexts: Vec<Value> = contexts
        .iter()
        .map(|c| json!({ "text": c.text, "modifyAnalyzedText": c.modify_analyzed_text }))
        .collect();
    ApiRequest::new(
        Endpoint::GraphsAndStatements,
        compare_flags(include_statements, include_graph, mode),
        json!({ "contexts": contexts, "aiTopics": "true" }),
    )
}

/// `overlap_between_texts` and `difference_between_texts`
pub fn compare(params: &CompareParams, mode: CompareMode) -> ApiRequest {
    compare_contexts(&params.contexts, mode, params.include_statements, params.include_graph)
}

/// Flags shared by the search-derived imports
pub fn import_flags(
    include_graph_summary: bool,
    include_graph: bool,
    include_statements: bool,
) -> QueryFlags {
    QueryFlags::new()
        .flag("doNotSave", true)
        .flag("addStats", true)
        .flag("includeGraphSummary", include_graph_summary)
        .flag("extendedGraphSummary", true)
        .flag("includeGraph", include_graph)
        .flag("includeStatements", include_statements)
        .flag("compactGraph", true)
        .flag("compactStatements", true)
        .flag("aiTopics", true)
}

fn import_body(queries: &[String], language: Language, country: Country) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("searchQuery".to_string(), json!(queries.join(",")));
    body.insert("aiTopics".to_string(), json!("true"));
    body.insert("importLanguage".to_string(), json!(language));
    body.insert("importCountry".to_string(), json!(country));
    body
}

/// `analyze_google_search_results`
pub fn search_results_graph(params: &SearchResultsParams) -> ApiRequest {
    let mut body = import_body(&params.queries, params.import_language, params.import_country);
    body.insert(
        "doNotAddGraph".to_string(),
        json!(if params.include_search_results_only { "true" } else { "false" }),
    );
    ApiRequest::new(
        Endpoint::GoogleSearchResults,
        import_flags(true, params.show_extended_graph_info, !params.show_graph_only),
        Value::Object(body),
    )
}

/// `analyze_related_search_queries`
pub fn search_queries_graph(params: &SearchQueriesParams) -> ApiRequest {
    let mut body = import_body(&params.queries, params.import_language, params.import_country);
    body.insert(
        "doNotAddGraph".to_string(),
        json!(if params.include_search_queries_only { "true" } else { "false" }),
    );
    body.insert("keywordsSource".to_string(), json!(params.keywords_source));
    ApiRequest::new(
        Endpoint::GoogleSearchIntent,
        import_flags(true, params.show_extended_graph_info, !params.show_graph_only),
        Value::Object(body),
    )
}

/// `search_queries_vs_search_results`
pub fn results_vs_queries_graph(params: &ResultsVsQueriesParams) -> ApiRequest {
    ApiRequest::new(
        Endpoint::GoogleSearchVsIntent,
        import_flags(true, params.show_extended_graph_info, !params.show_graph_only),
        Value::Object(import_body(&params.queries, params.import_language, params.import_country)),
    )
}

/// Search import used inside the SEO workflow
pub fn seo_import(
    endpoint: Endpoint,
    queries: &[String],
    language: Language,
    country: Country,
) -> ApiRequest {
    let mut body = import_body(queries, language, country);
    let include_statements = endpoint == Endpoint::GoogleSearchVsIntent;
    if endpoint == Endpoint::GoogleSearchIntent {
        body.insert("keywordsSource".to_string(), json!(KeywordsSource::Related));
    }
    ApiRequest::new(
        endpoint,
        import_flags(!include_statements, false, include_statements),
        Value::Object(body),
    )
}

/// Full-text search; `context_names` may be empty to search everywhere
pub fn search(query: &str, context_names: &[String]) -> ApiRequest {
    ApiRequest::new(
        Endpoint::Search,
        QueryFlags::new(),
        json!({ "query": query, "contextNames": context_names.join(",") }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generate_params(mode: TextMode) -> GenerateGraphParams {
        GenerateGraphParams {
            text: "Cats are mammals.\nDogs are mammals.".to_string(),
            include_statements: false,
            include_graph: false,
            add_nodes_and_edges: false,
            modify_analyzed_text: mode,
        }
    }

    #[test]
    fn test_flags_are_strings() {
        let request = generate_graph(&generate_params(TextMode::None));
        assert_eq!(request.query.get("doNotSave"), Some("true"));
        assert_eq!(request.query.get("includeGraph"), Some("false"));
        assert_eq!(request.query.get("compactStatements"), Some("false"));
        assert!(request.body.get("modifyAnalyzedText").is_none());
    }

    #[test]
    fn test_entity_extraction_forces_graph() {
        let request = generate_graph(&generate_params(TextMode::ExtractEntitiesOnly));
        assert_eq!(request.query.get("includeGraph"), Some("true"));
        assert_eq!(request.query.get("compactGraph"), Some("true"));
        assert_eq!(request.body["modifyAnalyzedText"], json!("extractEntitiesOnly"));

        let request = generate_graph(&generate_params(TextMode::DetectEntities));
        assert_eq!(request.query.get("includeGraph"), Some("false"));
        assert_eq!(request.body["modifyAnalyzedText"], json!("detectEntities"));
    }

    #[test]
    fn test_path_and_query_encoding() {
        let request = ApiRequest::new(
            Endpoint::GraphAndAdvice,
            QueryFlags::new().param("optimize", "gap").param("q", "a b&c"),
            json!({}),
        );
        assert_eq!(request.path_and_query(), "/graphAndAdvice?optimize=gap&q=a%20b%26c");

        let search_request = search("cats", &[]);
        assert_eq!(search_request.path_and_query(), "/search");
        assert_eq!(search_request.body["contextNames"], json!(""));
    }

    #[test]
    fn test_repeated_param_replaces() {
        let flags = QueryFlags::new().flag("a", true).flag("a", false);
        assert_eq!(flags.encode(), "a=false");
    }

    #[test]
    fn test_compare_keeps_order() {
        let contexts = vec![
            ContextInput { text: "target".to_string(), modify_analyzed_text: TextMode::None },
            ContextInput { text: "reference".to_string(), modify_analyzed_text: TextMode::DetectEntities },
        ];
        let request = compare_contexts(&contexts, CompareMode::Difference, false, false);
        assert_eq!(request.endpoint, Endpoint::GraphsAndStatements);
        assert_eq!(request.query.get("compareMode"), Some("difference"));
        assert_eq!(request.body["contexts"][0]["text"], json!("target"));
        assert_eq!(request.body["contexts"][1]["modifyAnalyzedText"], json!("detectEntities"));

        let overlap = compare_contexts(&contexts, CompareMode::Overlap, false, false);
        assert_eq!(overlap.query.get("compareMode"), None);
    }

    #[test]
    fn test_advice_gap_params() {
        let params = ResearchParams {
            text: "text".to_string(),
            use_several_gaps: true,
            gap_depth: 2,
            model_to_use: AiModel::Gpt5Mini,
        };
        let request = research_questions(&params);
        assert_eq!(request.endpoint, Endpoint::GraphAndAdvice);
        assert_eq!(request.query.get("optimize"), Some("gap"));
        assert_eq!(request.query.get("extendedAdvice"), Some("true"));
        assert_eq!(request.query.get("gapDepth"), Some("2"));
        assert_eq!(request.body["requestMode"], json!("question"));
        assert_eq!(request.body["modelToUse"], json!("gpt-5-mini"));

        let ideas = research_ideas(&params);
        assert_eq!(ideas.body["requestMode"], json!("response"));

        let latent_request = latent(
            &LatentParams { text: "t".to_string(), model_to_use: AiModel::default() },
            AdviceOptimize::Latent,
        );
        assert_eq!(latent_request.query.get("gapDepth"), None);
    }

    #[test]
    fn test_import_body() {
        let params = SearchResultsParams {
            queries: vec!["rust".to_string(), "ownership".to_string()],
            include_search_results_only: false,
            show_graph_only: true,
            show_extended_graph_info: false,
            import_language: Language::Fr,
            import_country: Country::Ca,
        };
        let request = search_results_graph(&params);
        assert_eq!(request.body["searchQuery"], json!("rust,ownership"));
        assert_eq!(request.body["importLanguage"], json!("FR"));
        assert_eq!(request.body["importCountry"], json!("CA"));
        assert_eq!(request.query.get("includeStatements"), Some("false"));
    }
}
