//! Prompt templates for the research pipeline
//!
//! System prompts are constants; user prompts are built per call from the
//! query and scraped content.

/// System prompt for extracting tool names from article content
pub const TOOL_EXTRACTION_SYSTEM: &str = "\
You are a tech researcher. Extract specific tool, library, platform, or \
service names from articles. Focus on actual products developers can use, \
not general concepts or features. Respond with one tool name per line and \
nothing else.";

/// System prompt for the structured per-company analysis
pub const TOOL_ANALYSIS_SYSTEM: &str = "\
You are analyzing developer tools and programming products. Extract \
structured information from website content. Respond with a single JSON \
object with exactly these fields: pricing_model (string: \"Free\", \
\"Freemium\", \"Paid\", \"Enterprise\", or \"Unknown\"), is_open_source \
(boolean or null), tech_stack (array of strings), description (one \
sentence), api_available (boolean or null), language_support (array of \
strings), integration_capabilities (array of strings). Output only the \
JSON object.";

/// System prompt for the final recommendation
pub const RECOMMENDATIONS_SYSTEM: &str = "\
You are a senior software engineer giving quick, concise tech \
recommendations. Keep the response brief and actionable, at most one short \
paragraph per point.";

/// Builds the user prompt for tool extraction
pub fn tool_extraction_user(query: &str, content: &str) -> String {
    format!(
        "Query: {query}\n\
         Article content:\n{content}\n\n\
         List up to 5 tool or service names relevant to the query, one per \
         line. No numbering, no descriptions."
    )
}

/// Builds the user prompt for analyzing a single company
pub fn tool_analysis_user(company_name: &str, content: &str) -> String {
    format!(
        "Company/tool: {company_name}\n\
         Website content:\n{content}\n\n\
         Analyze this company from a developer's perspective and return the \
         JSON object."
    )
}

/// Builds the user prompt for the final recommendation
pub fn recommendations_user(query: &str, company_data: &str) -> String {
    format!(
        "Developer query: {query}\n\
         Researched companies: {company_data}\n\n\
         Give a short recommendation (3-4 sentences): which tool to pick, \
         why, and any pricing or technical caveat worth knowing."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompts_embed_inputs() {
        let p = tool_extraction_user("ci runners", "some article text");
        assert!(p.contains("ci runners"));
        assert!(p.contains("some article text"));

        let p = tool_analysis_user("Acme", "homepage markdown");
        assert!(p.contains("Acme"));
        assert!(p.contains("homepage markdown"));

        let p = recommendations_user("ci runners", "{\"name\":\"Acme\"}");
        assert!(p.contains("ci runners"));
        assert!(p.contains("Acme"));
    }
}
