use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_http_client, strip_code_fence, HttpSettings, IntegrationError, TextGenerator};

const SERVICE: &str = "Gemini";

/// Google Generative Language `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: HttpSettings, model: impl Into<String>) -> Result<Self, IntegrationError> {
        Ok(Self {
            client: build_http_client(SERVICE, settings.timeout)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: settings.api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, IntegrationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(IntegrationError::MissingCredentials { service: SERVICE })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        tracing::debug!(model = %self.model, "requesting generated content");
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|source| IntegrationError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(IntegrationError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateResponse =
            response
                .json()
                .await
                .map_err(|err| IntegrationError::Payload {
                    service: SERVICE,
                    detail: err.to_string(),
                })?;

        let text = payload.first_text().ok_or_else(|| IntegrationError::Payload {
            service: SERVICE,
            detail: "response carried no candidate text".to_string(),
        })?;

        parse_model_json(&text)
    }
}

pub(crate) fn parse_model_json(text: &str) -> Result<serde_json::Value, IntegrationError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|err| IntegrationError::Payload {
        service: SERVICE,
        detail: format!("model answer is not JSON: {err}"),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}
