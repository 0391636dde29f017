//! Research pipeline data types

use serde::{Deserialize, Serialize};

/// Per-run pipeline state, built up stage by stage and discarded at run end
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResearchState {
    /// The user's research query
    pub query: String,
    /// Tool names extracted from article content
    pub extracted_tools: Vec<String>,
    /// Companies researched for the extracted tools
    pub companies: Vec<CompanyInfo>,
    /// Final recommendation text
    pub analysis: Option<String>,
}

impl ResearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// A researched company behind a developer tool
///
/// Name, website and description come from search results; the remaining
/// fields are filled in from the structured analysis call and stay at their
/// defaults when analysis fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub description: String,
    pub website: String,
    #[serde(default)]
    pub pricing_model: String,
    #[serde(default)]
    pub is_open_source: Option<bool>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub api_available: Option<bool>,
    #[serde(default)]
    pub language_support: Vec<String>,
    #[serde(default)]
    pub integration_capabilities: Vec<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
}

impl CompanyInfo {
    /// Creates a record from a search hit, with analysis fields unset
    pub fn from_search(
        name: impl Into<String>,
        website: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            website: website.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Copies analysis results onto this record
    pub fn apply_analysis(&mut self, analysis: CompanyAnalysis) {
        self.pricing_model = analysis.pricing_model;
        self.is_open_source = analysis.is_open_source;
        self.tech_stack = analysis.tech_stack;
        self.description = analysis.description;
        self.api_available = analysis.api_available;
        self.language_support = analysis.language_support;
        self.integration_capabilities = analysis.integration_capabilities;
    }
}

/// Structured LLM analysis of a single company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    #[serde(default)]
    pub pricing_model: String,
    #[serde(default)]
    pub is_open_source: Option<bool>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub api_available: Option<bool>,
    #[serde(default)]
    pub language_support: Vec<String>,
    #[serde(default)]
    pub integration_capabilities: Vec<String>,
}

impl CompanyAnalysis {
    /// Placeholder used when the analysis call fails
    pub fn failed() -> Self {
        Self {
            pricing_model: "Unknown".to_string(),
            is_open_source: None,
            tech_stack: Vec::new(),
            description: "Failed to analyze company".to_string(),
            api_available: None,
            language_support: Vec::new(),
            integration_capabilities: Vec::new(),
        }
    }
}
