//! Agent identities for the research pipeline.
//!
//! An agent is a name, an instruction text and the shape of output the
//! pipeline expects back. The stage runner decides how to execute it.

use serde::{Deserialize, Serialize};

use crate::jobs::record::TREND_COUNT;

/// Shape of the payload an agent is expected to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Free text
    Text,
    /// A single JSON object
    Json,
}

/// Agent identity passed to every capability invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub instructions: String,
    pub output: OutputShape,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>, output: OutputShape) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            output,
        }
    }
}

const PLANNER_INSTRUCTIONS: &str = r#"You are a helpful research assistant. Given a query, come up with a set of web searches to perform to best answer the query. Output between 5 and 20 terms to query for.

Respond with a single JSON object and nothing else:
{"searches": [{"query": "<search term>", "reason": "<why this search matters for the query>"}]}"#;

const SEARCH_INSTRUCTIONS: &str = "You are a research assistant. Given a search term, you search the web for that term and produce a concise summary of the results. The summary must be 2-3 paragraphs and less than 300 words. Capture the main points. Write succinctly, no need to have complete sentences or good grammar. This will be consumed by someone synthesizing a report, so it's vital you capture the essence and ignore any fluff. Do not include any additional commentary other than the summary itself.";

const WRITER_INSTRUCTIONS: &str = r#"You are a senior researcher tasked with writing a cohesive report for a research query. You will be provided with the original query, and some initial research done by a research assistant.

First come up with an outline for the report that describes the structure and flow of the report. Then generate the report and return that as your final output. The final output should be in markdown format, and it should be lengthy and detailed. Aim for 5-10 pages of content, at least 1000 words.

Respond with a single JSON object and nothing else:
{"short_summary": "<2-3 sentence summary of the findings>", "markdown_report": "<the final report>", "follow_up_questions": ["<suggested topic to research further>"]}"#;

/// Agents used by one research pipeline
#[derive(Debug, Clone)]
pub struct ResearchAgents {
    pub planner: AgentSpec,
    pub search: AgentSpec,
    pub writer: AgentSpec,
    pub trends_writer: AgentSpec,
}

impl Default for ResearchAgents {
    fn default() -> Self {
        Self {
            planner: AgentSpec::new("PlannerAgent", PLANNER_INSTRUCTIONS, OutputShape::Json),
            search: AgentSpec::new("SearchAgent", SEARCH_INSTRUCTIONS, OutputShape::Text),
            writer: AgentSpec::new("WriterAgent", WRITER_INSTRUCTIONS, OutputShape::Json),
            trends_writer: AgentSpec::new(
                "TrendsWriterAgent",
                trends_instructions(),
                OutputShape::Json,
            ),
        }
    }
}

fn trends_instructions() -> String {
    format!(
        r#"You are an expert in analyzing current trends. Based on the search results, identify exactly {count} current and important trends for the given topic.
Each trend needs a meaningful title and a short description of 2-3 sentences.
Stick strictly to the output format with exactly {count} trends.
The trends should be innovative, current and relevant to the topic.
Use the search results as the basis, but complement them with expert judgement where necessary.

Make sure the trends:
1. Are current (from the last 1-2 years)
2. Are relevant to the specific topic
3. Are described in an easy to understand way
4. Have practical value for the audience

Respond with a single JSON object and nothing else:
{{"topic": "<the analyzed topic>", "trends": [{{"title": "<trend title>", "description": "<2-3 sentences>"}}], "summary": "<short summary of the topic and the current situation>"}}"#,
        count = TREND_COUNT
    )
}
