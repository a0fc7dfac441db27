//! Substitute values used when a stage capability fails.

use crate::jobs::record::{ReportData, Trend, TrendAnalysis, TREND_COUNT};
use crate::research::plan::{SearchItem, SearchPlan};

/// Handed to synthesis when the search stage produced nothing usable.
pub const NO_RESULTS_SENTINEL: &str =
    "No search results found. Please try a different query or check your internet connection.";

/// Single search for the query itself.
pub fn fallback_plan(query: &str) -> SearchPlan {
    SearchPlan {
        searches: vec![SearchItem {
            query: query.to_string(),
            reason: "Fallback search due to planning error".to_string(),
        }],
    }
}

pub fn fallback_report(query: &str) -> ReportData {
    ReportData {
        short_summary: format!("Brief summary of research on '{}'", query),
        markdown_report: format!(
            "# Research on {}\n\nUnable to generate a full report. Please try again later.",
            query
        ),
        follow_up_questions: vec![
            "What specific aspect of this topic interests you the most?".to_string(),
        ],
    }
}

/// Placeholder analysis that still carries exactly [`TREND_COUNT`] entries.
pub fn fallback_trends(query: &str) -> TrendAnalysis {
    TrendAnalysis {
        topic: query.to_string(),
        trends: (1..=TREND_COUNT)
            .map(|i| Trend {
                title: format!("Trend {} for {}", i, query),
                description:
                    "Unable to generate detailed trend information. Please try again later."
                        .to_string(),
            })
            .collect(),
        summary: format!(
            "Analysis of trends related to {}. Please try again for more detailed results.",
            query
        ),
    }
}
