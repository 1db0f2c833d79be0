//! Multi-stage workflows
//!
//! Each stage is one remote call built from the previous stage's projected
//! output. Stages run strictly in sequence and the first error ends the run.

use crate::error::{ApiError, Result};
use crate::infranodus::client::{call, InfraNodusApi};
use crate::infranodus::output::{DevelopTextOutput, SeoReport};
use crate::infranodus::params::{ContextInput, DevelopTextParams, SeoParams, TextMode};
use crate::infranodus::progress::{ProgressSink, Reporter};
use crate::infranodus::projection;
use crate::infranodus::request::{self, AdviceOptimize, CompareMode, Endpoint};
use crate::infranodus::types::GraphResponse;

fn difference_request(target: &str, reference: String) -> request::ApiRequest {
    let contexts = [
        ContextInput {
            text: target.to_string(),
            modify_analyzed_text: TextMode::None,
        },
        ContextInput {
            text: reference,
            modify_analyzed_text: TextMode::None,
        },
    ];
    request::compare_contexts(&contexts, CompareMode::Difference, false, false)
}

/// Compare a text with what people search for and what they find
pub async fn seo_report(
    api: &dyn InfraNodusApi,
    params: &SeoParams,
    progress: Option<&dyn ProgressSink>,
) -> Result<SeoReport> {
    let progress = Reporter::new(progress);
    let (language, country) = (params.import_language, params.import_country);

    progress.report(5, "Analyzing the text");
    let text_graph: GraphResponse = call(api, &request::text_summary(&params.text, false)).await?;
    let queries = projection::seo_queries(&text_graph);
    if queries.is_empty() {
        return Err(ApiError::EmptyResult {
            message: "No keywords found in the text for SEO analysis".to_string(),
        }
        .into());
    }
    tracing::info!("SEO queries: {}", queries.join(", "));
    progress.report(15, "Extracted search queries from the text");

    progress.report(25, "Analyzing Google search results");
    let results: GraphResponse = call(
        api,
        &request::seo_import(Endpoint::GoogleSearchResults, &queries, language, country),
    )
    .await?;
    let results_summary = projection::summary_from_topics_and_gaps(&results);

    progress.report(40, "Analyzing related search queries");
    let intent: GraphResponse = call(
        api,
        &request::seo_import(Endpoint::GoogleSearchIntent, &queries, language, country),
    )
    .await?;
    let intent_summary = projection::summary_from_topics_and_gaps(&intent);

    progress.report(55, "Comparing the text with search results");
    let results_diff: GraphResponse =
        call(api, &difference_request(&params.text, results_summary)).await?;

    progress.report(70, "Comparing the text with search queries");
    let intent_diff: GraphResponse =
        call(api, &difference_request(&params.text, intent_summary)).await?;

    progress.report(85, "Comparing search queries with search results");
    let vs: GraphResponse = call(
        api,
        &request::seo_import(Endpoint::GoogleSearchVsIntent, &queries, language, country),
    )
    .await?;

    progress.report(95, "Building the report");
    let report = SeoReport {
        in_search_results_not_in_text: projection::insights(&results_diff),
        in_search_queries_not_in_text: projection::insights(&intent_diff),
        in_search_queries_not_in_results: projection::insights(&vs),
        top_missing_queries: projection::statement_strings(&vs),
    };
    progress.report(100, "SEO report complete");

    Ok(report)
}

/// Gaps, latent topics and conceptual bridges for one text
pub async fn develop_text(
    api: &dyn InfraNodusApi,
    params: &DevelopTextParams,
    progress: Option<&dyn ProgressSink>,
) -> Result<DevelopTextOutput> {
    let progress = Reporter::new(progress);

    progress.report(10, "Generating ideas for content gaps");
    let gaps: GraphResponse =
        call(api, &request::develop_stage(params, AdviceOptimize::Gap)).await?;
    progress.report(35, "Content gaps done");

    progress.report(40, "Developing latent topics");
    let latent: GraphResponse =
        call(api, &request::develop_stage(params, AdviceOptimize::Latent)).await?;
    progress.report(60, "Latent topics done");

    progress.report(70, "Developing conceptual bridges");
    let bridges: GraphResponse =
        call(api, &request::develop_stage(params, AdviceOptimize::Imagine)).await?;
    progress.report(90, "Conceptual bridges done");

    let output = projection::develop_text(&gaps, &latent, &bridges);
    progress.report(100, "Text development complete");

    Ok(output)
}
