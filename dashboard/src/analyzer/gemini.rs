use crate::error::DashboardError;
use crate::insight::{extract_result, AnalysisResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROMPT_INTRO: &str = r#"You are an expert analytics consultant. I'm providing you with analytics data from a website/application.

Please analyze this data and provide actionable insights for the following teams:

1. **Product Team** - Focus on user experience, feature usage, user journey issues, and product improvements
2. **Business Team** - Focus on conversion rates, revenue opportunities, customer acquisition, and business metrics
3. **Tech Team** - Focus on performance issues, technical bottlenecks, page load times, and infrastructure concerns
4. **Marketing Team** - Focus on traffic sources, campaign effectiveness, user engagement, and growth opportunities

For each team, provide:
- Key findings from the data
- Specific actionable recommendations
- Priority level (High/Medium/Low)
- Expected impact

If the data is insufficient or doesn't contain typical analytics metrics (like page views, sessions, bounce rates, conversion data, user behavior, etc.), respond with: "INVALID_DATA: [explanation of what's missing or wrong]"

Here's the analytics data:"#;

const PROMPT_FORMAT: &str = r#"Please structure your response as JSON with this format:
{
  "valid": true/false,
  "error_message": "if invalid, explain why",
  "insights": {
    "product": {
      "key_findings": ["finding 1", "finding 2"],
      "recommendations": ["recommendation 1", "recommendation 2"],
      "priority": "High/Medium/Low",
      "expected_impact": "Description of impact"
    },
    "business": {
      "key_findings": ["finding 1", "finding 2"],
      "recommendations": ["recommendation 1", "recommendation 2"],
      "priority": "High/Medium/Low",
      "expected_impact": "Description of impact"
    },
    "tech": {
      "key_findings": ["finding 1", "finding 2"],
      "recommendations": ["recommendation 1", "recommendation 2"],
      "priority": "High/Medium/Low",
      "expected_impact": "Description of impact"
    },
    "marketing": {
      "key_findings": ["finding 1", "finding 2"],
      "recommendations": ["recommendation 1", "recommendation 2"],
      "priority": "High/Medium/Low",
      "expected_impact": "Description of impact"
    }
  }
}"#;

/// Gemini generateContent client. One call per analysis, no retry.
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("HTTP client"),
        }
    }

    #[allow(dead_code)]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Run the fixed analytical prompt over `file_text` and return the
    /// extracted result plus the wall-clock duration of the call (the
    /// duration is for display only).
    pub async fn analyze(
        &self,
        file_text: &str,
    ) -> Result<(AnalysisResult, Duration), DashboardError> {
        let url = format!(
            "{GEMINI_API_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(file_text),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 8192,
            },
        };

        let started = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&req)
            .send()
            .await
            .map_err(|e| classify_failure(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| classify_failure(e.to_string()))?;
        let duration = started.elapsed();

        debug!(
            "Gemini {} responded {} in {:.2}s",
            self.model,
            status,
            duration.as_secs_f64()
        );

        if !status.is_success() {
            return Err(classify_failure(error_message_from_body(status, &body)));
        }

        let data: GeminiResponse =
            serde_json::from_str(&body).map_err(|_| DashboardError::MalformedResponse)?;

        let reply = data
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .map(|p| p.text)
            .ok_or(DashboardError::MalformedResponse)?;

        Ok((extract_result(&reply), duration))
    }
}

/// The analytical prompt with the uploaded file's raw text embedded verbatim.
pub fn build_prompt(file_text: &str) -> String {
    format!("{PROMPT_INTRO}\n\n{file_text}\n\n{PROMPT_FORMAT}")
}

/// Pull a human-readable message out of an error body, falling back to
/// "status code + status text" when the body is not the expected JSON.
fn error_message_from_body(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = parsed.error.and_then(|e| e.message) {
            return message;
        }
    }
    format!(
        "API Error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
}

/// API failures mentioning quota/limit/rate are a distinct kind so the UI
/// can point the user at a fresh key. Only applied to network/API failures,
/// never to parse failures.
fn classify_failure(message: String) -> DashboardError {
    let lower = message.to_lowercase();
    if ["quota", "limit", "rate"].iter().any(|m| lower.contains(m)) {
        DashboardError::QuotaExceeded(message)
    } else {
        DashboardError::Api(message)
    }
}
