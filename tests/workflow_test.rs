//! Research pipeline integration tests
//!
//! Drives the full pipeline through the public library API with a scripted
//! search double and a queued mock LLM, so every run is deterministic and
//! offline.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use toolscout::llm::MockResponse;
use toolscout::{MockLLMClient, ResearchWorkflow, SearchError, SearchHit, SearchProvider};

/// Search double that answers `search` calls in FIFO order and serves one
/// fixed page for every `scrape`
struct ScriptedSearch {
    searches: Mutex<Vec<Result<Vec<SearchHit>, String>>>,
    page: String,
}

impl ScriptedSearch {
    fn new(searches: Vec<Result<Vec<SearchHit>, String>>, page: &str) -> Self {
        let mut searches = searches;
        searches.reverse();
        Self {
            searches: Mutex::new(searches),
            page: page.to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<SearchHit>, SearchError> {
        match self.searches.lock().unwrap().pop() {
            Some(Ok(hits)) => Ok(hits),
            Some(Err(msg)) => Err(SearchError::Api(msg)),
            None => Err(SearchError::Api("script exhausted".to_string())),
        }
    }

    async fn scrape(&self, _url: &str) -> Result<String, SearchError> {
        Ok(self.page.clone())
    }
}

fn hit(url: &str, title: &str, markdown: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.to_string(),
        markdown: markdown.to_string(),
    }
}

#[tokio::test]
async fn full_pipeline_produces_deterministic_recommendation() {
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(vec![
        // tool extraction
        MockResponse::text("Buildkite\nCircleCI"),
        // analysis for Buildkite
        MockResponse::text(
            r#"{"pricing_model":"Freemium","is_open_source":false,"tech_stack":["Go"],
                "description":"Hosted CI agents","api_available":true,
                "language_support":["any"],"integration_capabilities":["GitHub"]}"#,
        ),
        // analysis for CircleCI
        MockResponse::text(
            r#"{"pricing_model":"Paid","tech_stack":["Clojure"],"description":"Cloud CI"}"#,
        ),
        // final recommendation
        MockResponse::text("Pick Buildkite for self-hosted agents."),
    ]);

    let search = Arc::new(ScriptedSearch::new(
        vec![
            Ok(vec![hit("https://article.dev/ci", "Best CI tools", "")]),
            Ok(vec![hit("https://buildkite.com", "Buildkite", "snippet")]),
            Ok(vec![hit("https://circleci.com", "CircleCI", "snippet")]),
        ],
        "homepage markdown",
    ));

    let workflow = ResearchWorkflow::new(llm.clone(), search);
    let state = workflow.run("CI pipeline runners").await;

    assert_eq!(state.query, "CI pipeline runners");
    assert_eq!(state.extracted_tools, vec!["Buildkite", "CircleCI"]);
    assert_eq!(state.companies.len(), 2);
    assert_eq!(state.companies[0].name, "Buildkite");
    assert_eq!(state.companies[0].website, "https://buildkite.com");
    assert_eq!(state.companies[0].pricing_model, "Freemium");
    assert_eq!(state.companies[1].tech_stack, vec!["Clojure"]);
    assert_eq!(
        state.analysis.as_deref(),
        Some("Pick Buildkite for self-hosted agents.")
    );
    assert_eq!(llm.remaining_responses(), 0);
}

#[tokio::test]
async fn failed_searches_yield_no_companies_message() {
    let llm = Arc::new(MockLLMClient::new());

    // Every search fails: extraction gets no content and no model output,
    // the fallback search fails too, and analyze short-circuits.
    let search = Arc::new(ScriptedSearch::new(
        vec![
            Err("article search down".to_string()),
            Err("fallback search down".to_string()),
        ],
        "",
    ));

    let workflow = ResearchWorkflow::new(llm.clone(), search);
    let state = workflow.run("CI pipeline runners").await;

    assert!(state.extracted_tools.is_empty());
    assert!(state.companies.is_empty());
    assert_eq!(
        state.analysis.as_deref(),
        Some("No companies found for analysis.")
    );
    // The extraction model call is skipped when search fails, and the
    // recommendation call is skipped with nothing to analyze.
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn failed_analysis_keeps_company_with_placeholders() {
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(vec![
        // extraction yields one tool
        MockResponse::text("Acme"),
        // analysis reply is unparseable
        MockResponse::text("I cannot answer in JSON today."),
    ]);

    let search = Arc::new(ScriptedSearch::new(
        vec![
            Ok(vec![hit("https://article.dev", "Article", "")]),
            Ok(vec![hit("https://acme.dev", "Acme", "search snippet")]),
        ],
        "homepage markdown",
    ));

    let workflow = ResearchWorkflow::new(llm.clone(), search);
    let state = workflow.run("CI pipeline runners").await;

    assert_eq!(state.companies.len(), 1);
    let company = &state.companies[0];
    assert_eq!(company.name, "Acme");
    assert_eq!(company.website, "https://acme.dev");
    assert_eq!(company.pricing_model, "Unknown");
    assert_eq!(company.description, "Failed to analyze company");
    assert!(company.tech_stack.is_empty());

    // Placeholder companies have no tech stack, so nothing qualifies and
    // the recommendation call never happens.
    assert_eq!(
        state.analysis.as_deref(),
        Some("No companies found for analysis.")
    );
    assert_eq!(llm.remaining_responses(), 0);
}

#[tokio::test]
async fn empty_extraction_falls_back_to_search_titles() {
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(vec![
        // extraction reply has no usable lines
        MockResponse::text("   \n  \n"),
        // analysis for the fallback-title company
        MockResponse::text(
            r#"{"pricing_model":"Free","tech_stack":["TypeScript"],"description":"From title"}"#,
        ),
        // final recommendation
        MockResponse::text("Go with the fallback find."),
    ]);

    let search = Arc::new(ScriptedSearch::new(
        vec![
            // article search for extraction
            Ok(vec![hit("https://article.dev", "Article", "")]),
            // fallback raw-title search
            Ok(vec![hit("https://raw.dev", "Raw Tool", "")]),
            // official-site search for "Raw Tool"
            Ok(vec![hit("https://rawtool.dev", "Raw Tool", "snippet")]),
        ],
        "homepage markdown",
    ));

    let workflow = ResearchWorkflow::new(llm.clone(), search);
    let state = workflow.run("CI pipeline runners").await;

    assert!(state.extracted_tools.is_empty());
    assert_eq!(state.companies.len(), 1);
    assert_eq!(state.companies[0].name, "Raw Tool");
    assert_eq!(state.companies[0].website, "https://rawtool.dev");
    assert_eq!(state.analysis.as_deref(), Some("Go with the fallback find."));
    assert_eq!(llm.remaining_responses(), 0);
}
