//! Three-stage research workflow
//!
//! Stages run in a fixed order: extract candidate tool names, research each
//! tool's company, then generate a recommendation. Every stage absorbs
//! collaborator failures and falls back to empty results, placeholder
//! analyses, or a fixed failure message, so a run always completes.

use super::prompts;
use super::types::{CompanyAnalysis, CompanyInfo, ResearchState};
use crate::firecrawl::SearchProvider;
use crate::llm::{complete, complete_structured, LLMClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Search results fetched per article query
const ARTICLE_SEARCH_LIMIT: u32 = 3;
/// Characters of scraped content kept per article page
const ARTICLE_CHAR_LIMIT: usize = 1500;
/// Raw search titles used when tool extraction comes back empty
const FALLBACK_TITLE_LIMIT: usize = 3;
/// Tools researched per run unless overridden
const DEFAULT_COMPANY_LIMIT: usize = 4;

pub struct ResearchWorkflow {
    llm: Arc<dyn LLMClient>,
    search: Arc<dyn SearchProvider>,
    temperature: f32,
    max_tokens: u32,
    company_limit: usize,
    max_context_size: usize,
}

impl ResearchWorkflow {
    pub fn new(llm: Arc<dyn LLMClient>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            llm,
            search,
            temperature: 0.1,
            max_tokens: 1000,
            company_limit: DEFAULT_COMPANY_LIMIT,
            max_context_size: 512_000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Caps how many extracted tools get researched per run
    pub fn with_company_limit(mut self, limit: usize) -> Self {
        self.company_limit = limit.max(1);
        self
    }

    /// Caps the scraped bytes fed into a single analysis call
    pub fn with_max_context_size(mut self, bytes: usize) -> Self {
        self.max_context_size = bytes.max(1024);
        self
    }

    /// Runs the full pipeline for a query
    ///
    /// Never fails: every collaborator error degrades to the stage's
    /// documented default.
    pub async fn run(&self, query: &str) -> ResearchState {
        let mut state = ResearchState::new(query);

        info!("Extracting tools for query: {}", query);
        state.extracted_tools = self.extract_tools(query).await;

        info!("Researching {} candidate tools", state.extracted_tools.len());
        state.companies = self.research_companies(query, &state.extracted_tools).await;

        info!("Generating recommendation from {} companies", state.companies.len());
        state.analysis = Some(self.analyze(query, &state.companies).await);

        state
    }

    /// Stage 1: search for articles about the query and ask the model which
    /// tools they mention. Returns an empty list on any failure.
    async fn extract_tools(&self, query: &str) -> Vec<String> {
        let article_query = format!("Finding the best alternatives to: {query}");
        let hits = match self.search.search(&article_query, ARTICLE_SEARCH_LIMIT).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Article search failed: {}", e);
                return Vec::new();
            }
        };

        let mut all_content = String::new();
        for hit in &hits {
            if hit.url.is_empty() {
                continue;
            }
            match self.search.scrape(&hit.url).await {
                Ok(markdown) => {
                    all_content.extend(markdown.chars().take(ARTICLE_CHAR_LIMIT));
                    all_content.push_str("\n\n");
                }
                Err(e) => debug!("Skipping article {}: {}", hit.url, e),
            }
        }

        let user_prompt = prompts::tool_extraction_user(query, &all_content);
        match complete(
            self.llm.as_ref(),
            prompts::TOOL_EXTRACTION_SYSTEM,
            &user_prompt,
            self.temperature,
            self.max_tokens,
        )
        .await
        {
            Ok(text) => {
                let tools: Vec<String> = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect();
                debug!("Extracted tools: {}", tools.join(", "));
                tools
            }
            Err(e) => {
                warn!("Tool extraction failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Stage 2: find each tool's official site, scrape it, and run the
    /// structured analysis. Skips tools whose site search fails.
    async fn research_companies(
        &self,
        query: &str,
        extracted_tools: &[String],
    ) -> Vec<CompanyInfo> {
        let tool_names = if extracted_tools.is_empty() {
            warn!("No tools extracted, falling back to raw search titles");
            self.fallback_tool_names(query).await
        } else {
            extracted_tools
                .iter()
                .take(self.company_limit)
                .cloned()
                .collect()
        };

        let mut companies = Vec::new();
        for name in &tool_names {
            let site_query = format!("{name} official site");
            let hits = match self.search.search(&site_query, 1).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!("Site search for '{}' failed: {}", name, e);
                    continue;
                }
            };
            let Some(hit) = hits.first() else {
                debug!("No site found for '{}'", name);
                continue;
            };

            let mut company = CompanyInfo::from_search(name, &hit.url, &hit.markdown);

            match self.search.scrape(&hit.url).await {
                Ok(content) if !content.is_empty() => {
                    let analysis = self.analyze_company(name, &content).await;
                    company.apply_analysis(analysis);
                }
                Ok(_) => debug!("Empty scrape for '{}', keeping search snippet", name),
                Err(e) => warn!("Scrape for '{}' failed: {}", name, e),
            }

            companies.push(company);
        }

        companies
    }

    /// Raw search titles stand in for tool names when extraction is empty.
    /// Unrelated search noise can end up researched this way; the fallback
    /// is best-effort by design of the pipeline.
    async fn fallback_tool_names(&self, query: &str) -> Vec<String> {
        match self.search.search(query, ARTICLE_SEARCH_LIMIT).await {
            Ok(hits) => hits
                .iter()
                .map(|h| h.title.trim())
                .filter(|t| !t.is_empty())
                .take(FALLBACK_TITLE_LIMIT)
                .map(String::from)
                .collect(),
            Err(e) => {
                warn!("Fallback search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Structured per-company analysis, with a placeholder on failure
    async fn analyze_company(&self, name: &str, content: &str) -> CompanyAnalysis {
        let content = truncate_on_char_boundary(content, self.max_context_size);
        let user_prompt = prompts::tool_analysis_user(name, content);
        match complete_structured::<CompanyAnalysis>(
            self.llm.as_ref(),
            prompts::TOOL_ANALYSIS_SYSTEM,
            &user_prompt,
            self.temperature,
            self.max_tokens,
        )
        .await
        {
            Ok(analysis) => {
                info!("Analyzed company: {}", name);
                analysis
            }
            Err(e) => {
                warn!("Analysis for '{}' failed: {}", name, e);
                CompanyAnalysis::failed()
            }
        }
    }

    /// Stage 3: serialize qualifying companies and ask for a recommendation.
    /// Companies missing a tech stack or description carry no signal and are
    /// filtered out; with none left the model is not called at all.
    async fn analyze(&self, query: &str, companies: &[CompanyInfo]) -> String {
        let qualifying: Vec<String> = companies
            .iter()
            .filter(|c| !c.tech_stack.is_empty() && !c.description.is_empty())
            .filter_map(|c| serde_json::to_string(c).ok())
            .collect();

        if qualifying.is_empty() {
            warn!("No companies available for analysis");
            return "No companies found for analysis.".to_string();
        }

        let user_prompt = prompts::recommendations_user(query, &qualifying.join(", "));
        match complete(
            self.llm.as_ref(),
            prompts::RECOMMENDATIONS_SYSTEM,
            &user_prompt,
            self.temperature,
            self.max_tokens,
        )
        .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Recommendation call failed: {}", e);
                "Failed to generate recommendations.".to_string()
            }
        }
    }
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

impl std::fmt::Debug for ResearchWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchWorkflow")
            .field("llm", &self.llm.name())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("company_limit", &self.company_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firecrawl::{SearchError, SearchHit};
    use crate::llm::{MockLLMClient, MockResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted search double; `search` pops answers in FIFO order
    struct ScriptedSearch {
        searches: Mutex<Vec<Result<Vec<SearchHit>, SearchError>>>,
        scrape_result: Result<String, ()>,
    }

    impl ScriptedSearch {
        fn new(searches: Vec<Result<Vec<SearchHit>, SearchError>>, scrape: &str) -> Self {
            Self {
                searches: Mutex::new({
                    let mut v = searches;
                    v.reverse();
                    v
                }),
                scrape_result: Ok(scrape.to_string()),
            }
        }

        fn failing_search() -> Self {
            Self {
                searches: Mutex::new(Vec::new()),
                scrape_result: Err(()),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedSearch {
        async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<SearchHit>, SearchError> {
            self.searches
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(SearchError::Api("script exhausted".to_string())))
        }

        async fn scrape(&self, _url: &str) -> Result<String, SearchError> {
            self.scrape_result
                .clone()
                .map_err(|_| SearchError::Api("scrape failed".to_string()))
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
    async fn test_analyze_skips_model_without_qualifying_companies() {
        let llm = Arc::new(MockLLMClient::new());
        let search = Arc::new(ScriptedSearch::failing_search());
        let workflow = ResearchWorkflow::new(llm.clone(), search);

        // description set but tech_stack empty, so it does not qualify
        let companies = vec![CompanyInfo::from_search("Acme", "https://acme.dev", "desc")];
        let result = workflow.analyze("ci tools", &companies).await;

        assert_eq!(result, "No companies found for analysis.");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_with_empty_company_list() {
        let llm = Arc::new(MockLLMClient::new());
        let search = Arc::new(ScriptedSearch::failing_search());
        let workflow = ResearchWorkflow::new(llm.clone(), search);

        let result = workflow.analyze("ci tools", &[]).await;

        assert_eq!(result, "No companies found for analysis.");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_tools_returns_empty_on_search_failure() {
        let llm = Arc::new(MockLLMClient::new());
        let search = Arc::new(ScriptedSearch::failing_search());
        let workflow = ResearchWorkflow::new(llm.clone(), search);

        let tools = workflow.extract_tools("ci tools").await;

        assert!(tools.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_tools_parses_one_name_per_line() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::text("GitHub Actions\n\n  Buildkite  \nCircleCI\n"));

        let search = Arc::new(ScriptedSearch::new(
            vec![Ok(vec![hit("https://a.dev", "Article", "")])],
            "article body",
        ));
        let workflow = ResearchWorkflow::new(llm, search);

        let tools = workflow.extract_tools("ci tools").await;

        assert_eq!(tools, vec!["GitHub Actions", "Buildkite", "CircleCI"]);
    }

    #[tokio::test]
    async fn test_research_companies_respects_limit() {
        let llm = Arc::new(MockLLMClient::new());
        // Two analysis calls, one per researched company
        llm.add_responses(vec![
            MockResponse::text(r#"{"pricing_model":"Free","tech_stack":["Rust"],"description":"d1"}"#),
            MockResponse::text(r#"{"pricing_model":"Paid","tech_stack":["Go"],"description":"d2"}"#),
        ]);

        let search = Arc::new(ScriptedSearch::new(
            vec![
                Ok(vec![hit("https://one.dev", "One", "snippet one")]),
                Ok(vec![hit("https://two.dev", "Two", "snippet two")]),
            ],
            "homepage content",
        ));
        let workflow = ResearchWorkflow::new(llm, search).with_company_limit(2);

        let tools: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let companies = workflow.research_companies("ci tools", &tools).await;

        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "A");
        assert_eq!(companies[0].pricing_model, "Free");
        assert_eq!(companies[1].name, "B");
        assert_eq!(companies[1].description, "d2");
    }

    #[tokio::test]
    async fn test_research_companies_falls_back_to_titles() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::text(
            r#"{"pricing_model":"Free","tech_stack":["Rust"],"description":"d"}"#,
        ));

        let search = Arc::new(ScriptedSearch::new(
            vec![
                // fallback search for raw titles
                Ok(vec![hit("https://x.dev", "Raw Title", ""), hit("", "", "")]),
                // official-site search for the one non-empty title
                Ok(vec![hit("https://raw.dev", "Raw", "snippet")]),
            ],
            "homepage content",
        ));
        let workflow = ResearchWorkflow::new(llm, search);

        let companies = workflow.research_companies("ci tools", &[]).await;

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Raw Title");
        assert_eq!(companies[0].website, "https://raw.dev");
    }

    #[tokio::test]
    async fn test_failed_analysis_keeps_placeholder_fields() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::text("not json"));

        let search = Arc::new(ScriptedSearch::new(
            vec![Ok(vec![hit("https://one.dev", "One", "snippet")])],
            "homepage content",
        ));
        let workflow = ResearchWorkflow::new(llm, search);

        let companies = workflow
            .research_companies("ci tools", &["Acme".to_string()])
            .await;

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Acme");
        assert_eq!(companies[0].website, "https://one.dev");
        assert_eq!(companies[0].pricing_model, "Unknown");
        assert_eq!(companies[0].description, "Failed to analyze company");
        assert!(companies[0].tech_stack.is_empty());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_on_char_boundary("hello", 10), "hello");
        assert_eq!(truncate_on_char_boundary("hello", 3), "hel");
        // multi-byte char straddling the cut point gets dropped whole
        assert_eq!(truncate_on_char_boundary("héllo", 2), "h");
    }

    #[tokio::test]
    async fn test_full_run_is_deterministic_with_stubs() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_responses(vec![
            // extraction
            MockResponse::text("Acme"),
            // per-company analysis
            MockResponse::text(
                r#"{"pricing_model":"Freemium","tech_stack":["Rust"],"description":"CI runner"}"#,
            ),
            // recommendation
            MockResponse::text("Use Acme."),
        ]);

        let search = Arc::new(ScriptedSearch::new(
            vec![
                Ok(vec![hit("https://article.dev", "Best CI", "")]),
                Ok(vec![hit("https://acme.dev", "Acme", "snippet")]),
            ],
            "page content",
        ));
        let workflow = ResearchWorkflow::new(llm.clone(), search);

        let state = workflow.run("ci tools").await;

        assert_eq!(state.query, "ci tools");
        assert_eq!(state.extracted_tools, vec!["Acme"]);
        assert_eq!(state.companies.len(), 1);
        assert_eq!(state.companies[0].pricing_model, "Freemium");
        assert_eq!(state.analysis.as_deref(), Some("Use Acme."));
        assert_eq!(llm.remaining_responses(), 0);
    }
}
