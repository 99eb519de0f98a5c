use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::{image_prompt, NEGATIVE_PROMPT};
use super::{error_for_response, ImageBackend, ImageError};
use crate::models::{ImageResult, ImageSource};

pub const DEFAULT_URL: &str =
    "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";
const MAX_SAMPLES: usize = 4;

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
    weight: f32,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    text_prompts: [TextPrompt<'a>; 2],
    cfg_scale: f32,
    height: u32,
    width: u32,
    samples: usize,
    steps: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: Option<String>,
    #[serde(default)]
    seed: u64,
}

/// Primary generative backend. Returns base64 artifacts as `data:` URLs.
pub struct StabilityBackend {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl StabilityBackend {
    pub fn new(api_key: Option<String>, url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key,
            url,
        }
    }
}

#[async_trait]
impl ImageBackend for StabilityBackend {
    fn source(&self) -> ImageSource {
        ImageSource::Stability
    }

    async fn fetch(
        &self,
        business_type: &str,
        style: &str,
        count: usize,
    ) -> Result<Vec<ImageResult>, ImageError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Stability AI API key not provided, skipping Stability AI generation");
            return Ok(Vec::new());
        };
        if count == 0 {
            return Ok(Vec::new());
        }

        let prompt = image_prompt(business_type, style);
        let body = GenerationRequest {
            text_prompts: [
                TextPrompt {
                    text: &prompt,
                    weight: 1.0,
                },
                TextPrompt {
                    text: NEGATIVE_PROMPT,
                    weight: -1.0,
                },
            ],
            cfg_scale: 7.0,
            height: 1024,
            width: 1024,
            samples: count.min(MAX_SAMPLES),
            steps: 30,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let parsed: GenerationResponse = response.json().await?;
        let images: Vec<ImageResult> = parsed
            .artifacts
            .into_iter()
            .take(count)
            .filter_map(|a| {
                let data = a.base64?;
                Some(ImageResult::generated(
                    format!("data:image/png;base64,{data}"),
                    ImageSource::Stability,
                    &prompt,
                    format!("stability-{}", a.seed),
                ))
            })
            .collect();

        debug!("Stability AI returned {} images", images.len());
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_artifacts_become_data_urls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "samples": 4,
                "cfg_scale": 7.0,
                "steps": 30,
                "width": 1024
            })))
            .with_status(200)
            .with_body(
                json!({"artifacts": [
                    {"base64": "AAA", "seed": 42},
                    {"seed": 43},
                    {"base64": "BBB", "seed": 44}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let backend = StabilityBackend::new(Some("sk-test".into()), format!("{}/generate", server.url()));
        let images = backend.fetch("Bakery", "Rustic", 6).await.unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].url, "data:image/png;base64,AAA");
        assert_eq!(images[0].id.as_deref(), Some("stability-42"));
        assert_eq!(images[1].id.as_deref(), Some("stability-44"));
        assert_eq!(images[0].source, ImageSource::Stability);
        assert!(images[0].prompt.as_deref().unwrap().contains("bakery"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_key_yields_no_images() {
        let backend = StabilityBackend::new(None, "http://127.0.0.1:9".into());
        assert!(backend.fetch("Cafe", "Modern", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate")
            .with_status(429)
            .create_async()
            .await;

        let backend = StabilityBackend::new(Some("k".into()), format!("{}/generate", server.url()));
        assert!(matches!(
            backend.fetch("Cafe", "Modern", 1).await,
            Err(ImageError::RateLimited)
        ));
    }
}
