//! Developer-tool research pipeline
//!
//! A fixed three-stage pipeline: extract candidate tool names from search
//! results, research each tool's company, then generate a recommendation.
//! Each stage degrades to a documented default instead of aborting the run.

pub mod prompts;
pub mod types;
pub mod workflow;

pub use types::{CompanyAnalysis, CompanyInfo, ResearchState};
pub use workflow::ResearchWorkflow;
