//! Text-generation surface: prompt construction from computed statistics
//! and a thin chat-completions client. Prompts are deterministic and
//! tested; the returned prose is opaque.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EmployeeRecord, Metric, MetricSummary};
use crate::summary;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("OPENAI_API_KEY is not set; narrative analysis is disabled")]
    MissingCredential,
    #[error("narrative request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("narrative API returned an unexpected response: {0}")]
    Api(String),
}

/// Loaded once at process entry and passed down by value. The credential is
/// optional: without it every deterministic feature still works.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl NarrativeConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: std::env::var("INSIGHT_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("INSIGHT_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Dataset-level prompt: the three min/max/mean triples, asking for a short
/// narrative on spread, trends, and what they say about the assessment
/// system.
pub fn distribution_prompt(summaries: &BTreeMap<Metric, MetricSummary>) -> String {
    let mut prompt = String::from(
        "You are an HR analyst. Based on the following score distributions:\n\n",
    );

    for (metric, summary) in summaries {
        let _ = writeln!(
            prompt,
            "- {}: min {:.2}, max {:.2}, mean {:.2}",
            metric.label(),
            summary.minimum,
            summary.maximum,
            summary.mean
        );
    }

    prompt.push_str(
        "\nWrite a brief narrative analysis (3 paragraphs) covering the pattern of \
         performance spread, score trends, and insights about the assessment system.",
    );
    prompt
}

/// Per-employee prompt: position, the three scores, and the policy band.
pub fn employee_prompt(record: &EmployeeRecord) -> String {
    let mut prompt = String::from("Analyze this individual performance data:\n");
    let _ = writeln!(prompt, "- Position: {}", record.position_name);

    for metric in Metric::ALL {
        match metric.value(record) {
            Some(score) => {
                let _ = writeln!(prompt, "- {}: {score:.2}", metric.label());
            }
            None => {
                let _ = writeln!(prompt, "- {}: not available", metric.label());
            }
        }
    }

    let band = summary::classify(record.individual_performance_score);
    let _ = writeln!(prompt, "- Performance band: {band}");

    prompt.push_str(
        "\nGive a concise interpretation of this employee's strengths and the \
         development areas that may need attention.",
    );
    prompt
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

pub struct NarrativeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl NarrativeClient {
    /// Fails fast with MissingCredential before any network I/O.
    pub fn new(config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(NarrativeError::MissingCredential)?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Single attempt, no retry. The client-level timeout bounds the call;
    /// a timeout surfaces as a Transport error for the caller to show.
    pub async fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(200).collect();
            return Err(NarrativeError::Api(format!("status {status}: {detail}")));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| NarrativeError::Api("response contained no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PerformanceCategory;

    fn sample_summaries() -> BTreeMap<Metric, MetricSummary> {
        let mut summaries = BTreeMap::new();
        summaries.insert(
            Metric::IndividualPerformance,
            MetricSummary {
                minimum: 72.0,
                maximum: 108.0,
                mean: 262.0 / 3.0,
            },
        );
        summaries
    }

    #[test]
    fn distribution_prompt_embeds_the_computed_statistics() {
        let prompt = distribution_prompt(&sample_summaries());
        assert!(prompt.contains("Individual performance score"));
        assert!(prompt.contains("min 72.00"));
        assert!(prompt.contains("max 108.00"));
        assert!(prompt.contains("mean 87.33"));
    }

    #[test]
    fn employee_prompt_embeds_scores_position_and_band() {
        let record = EmployeeRecord {
            worker_id: "1001".to_string(),
            position_name: "Port Operations Manager".to_string(),
            kpi_final_score: Some(95.5),
            behavior_assessment_score: None,
            individual_performance_score: Some(108.0),
        };

        let prompt = employee_prompt(&record);
        assert!(prompt.contains("Port Operations Manager"));
        assert!(prompt.contains("Final KPI score: 95.50"));
        assert!(prompt.contains("AKHLAK behavior assessment score: not available"));
        assert!(prompt.contains(PerformanceCategory::SangatBaik.label()));
    }

    #[test]
    fn missing_credential_fails_before_any_request() {
        let config = NarrativeConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        };

        let err = NarrativeClient::new(&config)
            .err()
            .expect("client must not build without a credential");
        assert!(matches!(err, NarrativeError::MissingCredential));
    }

    #[test]
    fn chat_response_parses_the_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Scores cluster around the mean."}}
            ]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content,
            "Scores cluster around the mean."
        );
    }
}
