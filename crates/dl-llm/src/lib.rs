//! Gemini API integration for the daily activity log.
//!
//! Provides LLM-powered features such as:
//! - Guessing the next task from recent history
//! - Summarizing a stretch of days in a paragraph
//! - Short insights about habits and goals
//!
//! Answers are non-deterministic. Callers surface failures to the user and
//! never let them touch stored data.

use std::collections::HashSet;
use std::fmt::{self, Write as _};
use std::time::Duration;

use chrono::NaiveDateTime;
use dl_core::{Day, Goal, TaskCatalog};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const MAX_INSIGHTS: usize = 5;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Gemini API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Points the client at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Guesses the task the user is most likely doing at `now`.
    ///
    /// A name matching the catalog (ignoring case) comes back in the
    /// catalog's spelling.
    pub async fn suggest_next_task(
        &self,
        history: &[&Day],
        catalog: &TaskCatalog,
        now: NaiveDateTime,
    ) -> Result<String, LlmError> {
        let prompt = build_next_task_prompt(history, catalog, now);
        let text = self.generate(&prompt).await?;
        let task = parse_task_name(&text)?;
        Ok(catalog.canonical_name(&task).to_string())
    }

    /// Summarizes `history` in one paragraph.
    pub async fn summarize(&self, history: &[&Day]) -> Result<String, LlmError> {
        let prompt = build_summary_prompt(history);
        let text = self.generate(&prompt).await?;
        let summary = text.trim();
        if summary.is_empty() {
            return Err(LlmError::InvalidResponse("empty summary".to_string()));
        }
        Ok(summary.to_string())
    }

    /// A few short observations about habits and goal progress.
    pub async fn suggest_insights(
        &self,
        history: &[&Day],
        goals: &[Goal],
    ) -> Result<Vec<String>, LlmError> {
        let prompt = build_insights_prompt(history, goals);
        let text = self.generate(&prompt).await?;
        parse_string_list(&text)
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "calling Gemini");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        extract_text(payload)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn extract_text(response: GenerateResponse) -> Result<String, LlmError> {
    let pieces: Vec<String> = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .filter(|text| !text.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

/// Renders days as a date line followed by one line per activity in start order.
fn render_history(history: &[&Day]) -> String {
    let mut out = String::new();
    for day in history {
        let _ = writeln!(out, "{}", day.date);
        if day.is_empty() {
            let _ = writeln!(out, "  (nothing logged)");
        }
        for activity in day.sorted_activities() {
            match &activity.end_time {
                Some(end) => {
                    let _ = writeln!(out, "  {}-{} {}", activity.start_time, end, activity.task);
                }
                None => {
                    let _ = writeln!(out, "  {} {}", activity.start_time, activity.task);
                }
            }
        }
    }
    out
}

fn build_next_task_prompt(history: &[&Day], catalog: &TaskCatalog, now: NaiveDateTime) -> String {
    let tasks = catalog
        .iter()
        .map(|task| task.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut lines = vec![
        "You are a daily activity tracking assistant.".to_string(),
        "Based on the user's recent activity log, predict the single task they are most likely doing now.".to_string(),
        "Reply with the task name only: no punctuation, no explanation.".to_string(),
        format!("Prefer one of these tasks: {tasks}"),
        format!("Current time: {}", now.format("%Y-%m-%d %-I:%M %p")),
        String::new(),
        "Recent activity:".to_string(),
    ];
    lines.push(render_history(history));
    lines.join("\n")
}

fn build_summary_prompt(history: &[&Day]) -> String {
    let lines = [
        "You are a daily activity tracking assistant.".to_string(),
        "Write one short, encouraging paragraph summarizing how the user spent these days.".to_string(),
        "Mention patterns in sleep, work and exercise when visible. Plain text, no lists.".to_string(),
        String::new(),
        "Activity log:".to_string(),
        render_history(history),
    ];
    lines.join("\n")
}

fn build_insights_prompt(history: &[&Day], goals: &[Goal]) -> String {
    let mut lines = vec![
        "You are a daily activity tracking assistant.".to_string(),
        format!(
            "Give at most {MAX_INSIGHTS} short, actionable insights about the user's habits."
        ),
        "Return strict JSON: an array of strings, e.g. [\"insight one\",\"insight two\"]."
            .to_string(),
    ];
    if !goals.is_empty() {
        let rendered = goals
            .iter()
            .map(|goal| format!("{} {}x per {}", goal.task, goal.frequency, goal.period))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Goals: {rendered}"));
    }
    lines.push(String::new());
    lines.push("Activity log:".to_string());
    lines.push(render_history(history));
    lines.join("\n")
}

/// Strips a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_task_name(text: &str) -> Result<String, LlmError> {
    let line = strip_code_fence(text)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    let task = line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '.'))
        .trim();
    if task.is_empty() {
        return Err(LlmError::InvalidResponse("empty task name".to_string()));
    }
    Ok(task.to_string())
}

fn parse_string_list(text: &str) -> Result<Vec<String>, LlmError> {
    let items: Vec<String> = serde_json::from_str(strip_code_fence(text))
        .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            out.push(trimmed.to_string());
        }
    }
    Ok(out)
}
