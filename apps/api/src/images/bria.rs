use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::{image_prompt, NEGATIVE_PROMPT};
use super::{error_for_response, ImageBackend, ImageError};
use crate::models::{ImageResult, ImageSource};

pub const DEFAULT_URL: &str = "https://api.nvcf.nvidia.com/v2/nvcf/pexec/functions/bria";
const MAX_IMAGES: usize = 4;

#[derive(Debug, Serialize)]
struct BriaRequest<'a> {
    prompt: &'a str,
    negative_prompt: &'a str,
    num_images: usize,
    guidance_scale: f32,
    width: u32,
    height: u32,
    num_inference_steps: u32,
}

#[derive(Debug, Default, Deserialize)]
struct BriaResponse {
    #[serde(default)]
    data: BriaData,
}

#[derive(Debug, Default, Deserialize)]
struct BriaData {
    #[serde(default)]
    output: Vec<BriaOutput>,
}

#[derive(Debug, Deserialize)]
struct BriaOutput {
    image: Option<String>,
}

/// Secondary generative backend, asked only for the primary's shortfall.
pub struct BriaBackend {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl BriaBackend {
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
impl ImageBackend for BriaBackend {
    fn source(&self) -> ImageSource {
        ImageSource::Bria
    }

    async fn fetch(
        &self,
        business_type: &str,
        style: &str,
        count: usize,
    ) -> Result<Vec<ImageResult>, ImageError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Bria2.3 API key not provided, skipping Bria2.3 generation");
            return Ok(Vec::new());
        };
        if count == 0 {
            return Ok(Vec::new());
        }

        let prompt = image_prompt(business_type, style);
        let body = BriaRequest {
            prompt: &prompt,
            negative_prompt: NEGATIVE_PROMPT,
            num_images: count.min(MAX_IMAGES),
            guidance_scale: 7.5,
            width: 1024,
            height: 1024,
            num_inference_steps: 30,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let parsed: BriaResponse = response.json().await?;
        let images: Vec<ImageResult> = parsed
            .data
            .output
            .into_iter()
            .take(count)
            .enumerate()
            .filter_map(|(i, out)| {
                Some(ImageResult::generated(
                    out.image?,
                    ImageSource::Bria,
                    &prompt,
                    format!("bria-{i}"),
                ))
            })
            .collect();

        debug!("Bria2.3 returned {} images", images.len());
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_output_images_keep_their_index() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bria")
            .match_body(Matcher::PartialJson(json!({
                "num_images": 2,
                "guidance_scale": 7.5,
                "num_inference_steps": 30
            })))
            .with_status(200)
            .with_body(
                json!({"data": {"output": [
                    {"image": "https://cdn.example/a.png"},
                    {},
                    {"image": "https://cdn.example/c.png"}
                ]}})
                .to_string(),
            )
            .create_async()
            .await;

        let backend = BriaBackend::new(Some("k".into()), format!("{}/bria", server.url()));
        let images = backend.fetch("Cafe", "Modern", 2).await.unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id.as_deref(), Some("bria-0"));
        assert_eq!(images[0].download_url, "https://cdn.example/a.png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_data_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bria")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let backend = BriaBackend::new(Some("k".into()), format!("{}/bria", server.url()));
        assert!(backend.fetch("Cafe", "Modern", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bria")
            .with_status(401)
            .create_async()
            .await;

        let backend = BriaBackend::new(Some("bad".into()), format!("{}/bria", server.url()));
        assert!(matches!(
            backend.fetch("Cafe", "Modern", 1).await,
            Err(ImageError::Unauthorized)
        ));
    }
}
