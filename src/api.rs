//! Primary summary model: an OpenAI-compatible chat completions API.
//!
//! # Architecture
//!
//! - [`SummaryModel`]: the seam the summarizer talks to
//! - [`OpenAiSummaryModel`]: reqwest client for `/chat/completions`
//! - [`ask_for_summary`]: sends the fixed Arabic summarization instruction
//!   and logs timing
//!
//! There is no retry. A failed call is final, and the summarizer falls back
//! to the extractive summary.

use crate::config::SummaryConfig;
use crate::error::ModelError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// System instruction sent with every request: a 150-300 word summary in
/// literary Arabic that covers the main points.
pub const SYSTEM_INSTRUCTION: &str = "أنت محرر أخبار خبير في التلخيص. اكتب ملخصاً للنص المعطى باللغة العربية الفصحى \
يتراوح طوله بين 150 و300 كلمة، يغطي النقاط الرئيسية ويحافظ على المعنى الأساسي للنص، \
بأسلوب صحفي واضح ومباشر وبجمل كاملة.";

/// Prefix of the user message; the article text follows it.
const PROMPT_PREFIX: &str = "الرجاء تلخيص هذا النص باللغة العربية:\n\n";

/// A generative model that can write a summary.
pub trait SummaryModel {
    /// Whether a credential is configured. An unavailable model is never called.
    fn is_available(&self) -> bool;

    /// Run one completion and return the generated text.
    async fn generate_summary(
        &self,
        system_instruction: &str,
        prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError>;
}

/// Chat completions client.
#[derive(Clone)]
pub struct OpenAiSummaryModel {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl fmt::Debug for OpenAiSummaryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummaryModel")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiSummaryModel {
    pub fn new(config: &SummaryConfig, api_key: Option<String>) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl SummaryModel for OpenAiSummaryModel {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn generate_summary(
        &self,
        system_instruction: &str,
        prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: max_output_tokens,
            temperature,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| truncate_for_log(&String::from_utf8_lossy(&bytes), 200));
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
        parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ModelError::EmptyResponse)
    }
}

/// Ask `model` for an Arabic summary of `text`.
///
/// Returns `None` when the model is not configured or the call fails in any
/// way; the caller then uses the extractive summary.
#[instrument(level = "info", skip_all)]
pub async fn ask_for_summary<M: SummaryModel>(model: &M, text: &str, config: &SummaryConfig) -> Option<String> {
    if !model.is_available() {
        info!("No summary model configured; skipping primary summarization");
        return None;
    }

    let t0 = Instant::now();
    let prompt = format!("{PROMPT_PREFIX}{text}");
    let res = model
        .generate_summary(SYSTEM_INSTRUCTION, &prompt, config.max_output_tokens, config.temperature)
        .await;
    let dt = t0.elapsed();

    match res {
        Ok(summary) => {
            info!(elapsed_ms = dt.as_millis() as u64, "Primary summarization succeeded");
            Some(summary)
        }
        Err(e) => {
            warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "Primary summarization failed; falling back");
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedModel;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> SummaryConfig {
        SummaryConfig {
            base_url: server.uri(),
            ..SummaryConfig::default()
        }
    }

    #[tokio::test]
    async fn sends_fixed_request_and_reads_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4",
                "max_tokens": 400
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  ملخص المقال  "}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let model = OpenAiSummaryModel::new(&config, Some("sk-test".to_string())).unwrap();
        let summary = ask_for_summary(&model, "Some article text", &config).await;
        assert_eq!(summary.as_deref(), Some("ملخص المقال"));
    }

    #[tokio::test]
    async fn api_errors_are_reported_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "invalid api key"}
            })))
            .mount(&server)
            .await;

        let model = OpenAiSummaryModel::new(&config_for(&server), Some("bad".to_string())).unwrap();
        let err = model.generate_summary("sys", "prompt", 10, 0.7).await.unwrap_err();
        match err {
            ModelError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_response_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let model = OpenAiSummaryModel::new(&config, Some("sk".to_string())).unwrap();
        assert!(matches!(
            model.generate_summary("sys", "prompt", 10, 0.7).await,
            Err(ModelError::Decode(_))
        ));
        assert_eq!(ask_for_summary(&model, "text", &config).await, None);
    }

    #[test]
    fn blank_key_means_unavailable() {
        let config = SummaryConfig::default();
        assert!(!OpenAiSummaryModel::new(&config, None).unwrap().is_available());
        assert!(!OpenAiSummaryModel::new(&config, Some("  ".to_string())).unwrap().is_available());
        assert!(OpenAiSummaryModel::new(&config, Some("sk".to_string())).unwrap().is_available());
    }

    #[test]
    fn debug_output_hides_key() {
        let model = OpenAiSummaryModel::new(&SummaryConfig::default(), Some("sk-secret".to_string())).unwrap();
        let debug = format!("{model:?}");
        assert!(!debug.contains("sk-secret"));
    }

    #[tokio::test]
    async fn unconfigured_model_is_never_called() {
        let model = ScriptedModel::unconfigured();
        assert_eq!(ask_for_summary(&model, "text", &SummaryConfig::default()).await, None);
        assert_eq!(model.calls(), 0);
    }
}
