//! Mock implementations for testing.
//!
//! This module provides a scripted stage runner and payload helpers that can
//! be used across different test files without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use delve::agents::AgentSpec;
use delve::capabilities::{ProgressTick, StageRunner};
use delve::jobs::{JobId, JobRecord};
use delve::research::ResearchManager;
use delve::types::{AppError, Result};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

pub const PLANNER: &str = "PlannerAgent";
pub const SEARCH: &str = "SearchAgent";
pub const WRITER: &str = "WriterAgent";
pub const TRENDS_WRITER: &str = "TrendsWriterAgent";

#[derive(Clone, Debug)]
enum Behavior {
    Ok(Value),
    Fail(String),
    Panic,
}

/// What one agent (or one search term) does when invoked.
#[derive(Clone, Debug)]
pub struct Script {
    behavior: Behavior,
    delay: Option<Duration>,
    ticks: u32,
}

impl Script {
    pub fn ok(value: Value) -> Self {
        Self {
            behavior: Behavior::Ok(value),
            delay: None,
            ticks: 0,
        }
    }

    pub fn text(text: &str) -> Self {
        Self::ok(Value::String(text.to_string()))
    }

    pub fn fail(message: &str) -> Self {
        Self {
            behavior: Behavior::Fail(message.to_string()),
            delay: None,
            ticks: 0,
        }
    }

    pub fn panic() -> Self {
        Self {
            behavior: Behavior::Panic,
            delay: None,
            ticks: 0,
        }
    }

    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }

    /// Ticks emitted before the result when the agent runs streamed.
    pub fn with_ticks(mut self, ticks: u32) -> Self {
        self.ticks = ticks;
        self
    }
}

/// Stage runner whose behaviour is scripted per agent name, and per search
/// term for the search agent.
///
/// Anything not scripted fails, like the noop runner.
///
/// # Examples
///
/// ```ignore
/// let runner = ScriptedRunner::new()
///     .on(PLANNER, Script::ok(plan_json(&["a", "b"])))
///     .on_search("b", Script::fail("timeout"))
///     .on(SEARCH, Script::text("found it"));
/// ```
#[derive(Default)]
pub struct ScriptedRunner {
    agents: HashMap<String, Script>,
    searches: HashMap<String, Script>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, agent: &str, script: Script) -> Self {
        self.agents.insert(agent.to_string(), script);
        self
    }

    pub fn on_search(mut self, term: &str, script: Script) -> Self {
        self.searches.insert(term.to_string(), script);
        self
    }

    /// Every invocation so far as `(agent name, input)`.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn inputs_for(&self, agent: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == agent)
            .map(|(_, input)| input)
            .collect()
    }

    fn script_for(&self, agent: &AgentSpec, input: &str) -> Option<Script> {
        if agent.name == SEARCH {
            if let Some(script) = search_term(input).and_then(|term| self.searches.get(term)) {
                return Some(script.clone());
            }
        }
        self.agents.get(&agent.name).cloned()
    }

    async fn execute(&self, agent: &AgentSpec, input: &str, script: Option<Script>) -> Result<Value> {
        let Some(script) = script else {
            return Err(AppError::LLM(format!("{} is not scripted", agent.name)));
        };

        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }

        match script.behavior {
            Behavior::Ok(value) => Ok(value),
            Behavior::Fail(message) => Err(AppError::LLM(message)),
            Behavior::Panic => panic!("scripted panic in {} for {}", agent.name, input),
        }
    }
}

#[async_trait]
impl StageRunner for ScriptedRunner {
    async fn run(&self, agent: &AgentSpec, input: &str) -> Result<Value> {
        self.calls
            .lock()
            .push((agent.name.clone(), input.to_string()));
        let script = self.script_for(agent, input);
        self.execute(agent, input, script).await
    }

    async fn run_streamed(
        &self,
        agent: &AgentSpec,
        input: &str,
        ticks: mpsc::Sender<ProgressTick>,
    ) -> Result<Value> {
        self.calls
            .lock()
            .push((agent.name.clone(), input.to_string()));
        let script = self.script_for(agent, input);

        if let Some(script) = &script {
            for seq in 1..=script.ticks {
                if ticks.send(ProgressTick { seq }).await.is_err() {
                    break;
                }
            }
        }
        drop(ticks);

        self.execute(agent, input, script).await
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn search_term(input: &str) -> Option<&str> {
    input.lines().next()?.strip_prefix("Search term: ")
}

// ============= Payload helpers =============

pub fn plan_json(terms: &[&str]) -> Value {
    let searches: Vec<Value> = terms
        .iter()
        .map(|term| json!({"query": term, "reason": format!("learn about {}", term)}))
        .collect();
    json!({ "searches": searches })
}

pub fn report_json(summary: &str) -> Value {
    json!({
        "short_summary": summary,
        "markdown_report": format!("# {}\n\nDetailed findings.", summary),
        "follow_up_questions": ["What comes next?", "Who is leading?"]
    })
}

pub fn trends_json(topic: &str, count: usize) -> Value {
    let trends: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "title": format!("{} trend {}", topic, i),
                "description": "Growing quickly. Backed by recent data."
            })
        })
        .collect();
    json!({ "topic": topic, "trends": trends, "summary": format!("{} is moving fast", topic) })
}

// ============= Polling helpers =============

/// Poll until the job is terminal. Panics after five seconds.
pub async fn wait_for_terminal(manager: &ResearchManager, id: &JobId) -> JobRecord {
    let poll = async {
        loop {
            let record = manager.get_status(id).expect("job exists");
            if record.is_terminal() {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), poll)
        .await
        .expect("job did not reach a terminal state in time")
}

/// Poll until `predicate` holds for the job. Panics after five seconds.
pub async fn wait_until<F>(manager: &ResearchManager, id: &JobId, predicate: F) -> JobRecord
where
    F: Fn(&JobRecord) -> bool,
{
    let poll = async {
        loop {
            let record = manager.get_status(id).expect("job exists");
            if predicate(&record) {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), poll)
        .await
        .expect("condition not reached in time")
}
