//! Search plan produced by the planning stage, and the text inputs handed to
//! each stage.

use serde::{Deserialize, Serialize};

const TRUNCATION_MARKER: &str = "... (truncated due to length)";

/// One planned web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub query: String,
    pub reason: String,
}

/// Ordered list of searches. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPlan {
    pub searches: Vec<SearchItem>,
}

impl SearchPlan {
    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

pub fn planner_input(query: &str) -> String {
    format!("Query: {}", query)
}

pub fn search_input(item: &SearchItem) -> String {
    format!(
        "Search term: {}\nReason for searching: {}",
        item.query, item.reason
    )
}

pub fn writer_input(query: &str, combined: &str) -> String {
    format!(
        "Original query: {}\nSummarized search results: {}",
        query, combined
    )
}

pub fn trends_input(query: &str, combined: &str) -> String {
    format!(
        "Topic for trend analysis: {}\nSearch results: {}",
        query, combined
    )
}

/// Join search results with a blank line and cap the payload at `max_chars`
/// characters, appending a marker when anything was cut.
pub fn combine_results(results: &[String], max_chars: usize) -> String {
    let combined = results.join("\n\n");
    match combined.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &combined[..cut], TRUNCATION_MARKER),
        None => combined,
    }
}
