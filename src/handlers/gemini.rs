use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("recipe provider API key is not configured")]
    MissingApiKey,
    #[error("request to recipe provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("recipe provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("recipe provider returned no usable content")]
    EmptyResponse,
    #[error("recipe provider did not answer within {0:?}")]
    Timeout(Duration),
}

/// Text generation backend used by the recipe endpoint.
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

// Gemini generateContent request/response structures
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(GeminiClient {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl RecipeProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("Requesting recipe from model {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini request failed with status {}: {}", status, body);
            return Err(ProviderError::Status { status, body });
        }

        let payload: GenerateContentResponse = response.json().await?;
        collect_recipe(payload)
    }
}

/// Joins the text fragments of the first candidate, one line per fragment.
fn collect_recipe(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or(ProviderError::EmptyResponse)?;

    let mut output = String::new();
    for part in content.parts {
        if let Some(text) = part.text {
            output.push_str(&text);
            output.push('\n');
        }
    }

    if output.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::io::Write;

    const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

    fn client_for(base_url: String, timeout: Duration) -> GeminiClient {
        GeminiClient::new(&GeminiConfig {
            api_key: Some("test-key".to_string()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url,
            timeout,
        })
        .unwrap()
    }

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_all_fragments_of_first_candidate() {
        let response = parse(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"Fried rice"},{"text":"by Chef SaveBite"}],"role":"model"}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"#,
        );
        assert_eq!(
            collect_recipe(response).unwrap(),
            "Fried rice\nby Chef SaveBite\n"
        );
    }

    #[test]
    fn missing_candidates_or_content_is_empty() {
        assert!(matches!(
            collect_recipe(parse(r#"{}"#)),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            collect_recipe(parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            collect_recipe(parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#)),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_calling_out() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            // Unroutable on purpose; the call must not get this far.
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert!(matches!(
            client.generate("prompt").await,
            Err(ProviderError::MissingApiKey)
        ));
    }

    #[test]
    fn endpoint_includes_model_and_trims_slash() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: Some("key".into()),
            model: "gemini-1.5-flash".into(),
            base_url: "https://example.test/v1beta/".into(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn sends_prompt_with_api_key_and_joins_reply() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Json(json!({
                "contents": [{ "parts": [{ "text": "Recipe for: rice" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {
                            "parts": [{ "text": "Fry the rice." }, { "text": "by Chef SaveBite" }],
                            "role": "model"
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(server.url(), Duration::from_secs(5));
        let recipe = client.generate("Recipe for: rice").await.unwrap();

        assert_eq!(recipe, "Fry the rice.\nby Chef SaveBite\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(500)
            .with_body("quota exhausted")
            .create_async()
            .await;

        let client = client_for(server.url(), Duration::from_secs(5));
        match client.generate("Recipe for: rice").await {
            Err(ProviderError::Status { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "quota exhausted");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn undecodable_reply_is_a_request_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = client_for(server.url(), Duration::from_secs(5));
        assert!(matches!(
            client.generate("Recipe for: rice").await,
            Err(ProviderError::Request(_))
        ));
    }

    #[tokio::test]
    async fn slow_reply_fails_once_the_client_timeout_elapses() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                std::thread::sleep(std::time::Duration::from_millis(1500));
                w.write_all(br#"{"candidates":[]}"#)
            })
            .create_async()
            .await;

        let client = client_for(server.url(), Duration::from_millis(200));
        assert!(matches!(
            client.generate("Recipe for: rice").await,
            Err(ProviderError::Request(_))
        ));
    }
}
