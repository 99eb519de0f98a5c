use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use super::prompts::search_queries;
use super::{error_for_response, ImageBackend, ImageError};
use crate::models::{ImageResult, ImageSource};

pub const DEFAULT_URL: &str = "https://api.unsplash.com/search/photos";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    urls: PhotoUrls,
    #[serde(default)]
    user: PhotoUser,
}

#[derive(Debug, Default, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotoUser {
    name: Option<String>,
    #[serde(default)]
    links: UserLinks,
}

#[derive(Debug, Default, Deserialize)]
struct UserLinks {
    html: Option<String>,
}

/// Stock-photo search. Runs each query in turn until `count` distinct photos are found.
pub struct UnsplashBackend {
    client: Client,
    access_key: String,
    url: String,
}

impl UnsplashBackend {
    pub fn new(access_key: String, url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            access_key,
            url,
        }
    }

    async fn search(&self, query: &str, per_page: usize) -> Result<Vec<Photo>, ImageError> {
        let per_page = per_page.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
            ])
            .header(AUTHORIZATION, format!("Client-ID {}", self.access_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.results)
    }
}

#[async_trait]
impl ImageBackend for UnsplashBackend {
    fn source(&self) -> ImageSource {
        ImageSource::Unsplash
    }

    async fn fetch(
        &self,
        business_type: &str,
        style: &str,
        count: usize,
    ) -> Result<Vec<ImageResult>, ImageError> {
        let mut images: Vec<ImageResult> = Vec::new();

        for query in search_queries(business_type, style) {
            if images.len() >= count {
                break;
            }

            let photos = match self.search(&query, count).await {
                Ok(photos) => photos,
                Err(ImageError::Http(e)) => {
                    warn!("Unsplash request failed, stopping search: {e}");
                    break;
                }
                Err(e) => {
                    warn!("Unsplash search for '{query}' failed: {e}");
                    continue;
                }
            };

            for photo in photos {
                if images.len() >= count {
                    break;
                }
                let Some(url) = photo.urls.regular else {
                    continue;
                };
                if images.iter().any(|img| img.url == url) {
                    continue;
                }
                images.push(ImageResult {
                    download_url: url.clone(),
                    url,
                    source: ImageSource::Unsplash,
                    prompt: None,
                    id: None,
                    photographer: Some(photo.user.name.unwrap_or_else(|| "Unknown".to_string())),
                    photographer_url: Some(photo.user.links.html.unwrap_or_default()),
                });
            }
        }

        debug!("Unsplash returned {} images", images.len());
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn photo(url: &str, name: &str) -> serde_json::Value {
        json!({
            "urls": {"regular": url},
            "user": {"name": name, "links": {"html": format!("https://unsplash.com/@{name}")}}
        })
    }

    #[tokio::test]
    async fn test_duplicate_urls_are_skipped_across_queries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "3".into()),
                Matcher::UrlEncoded("orientation".into(), "landscape".into()),
            ]))
            .match_header("authorization", "Client-ID access")
            .with_status(200)
            .with_body(json!({"results": [photo("https://img/1", "ana"), photo("https://img/2", "ben")]}).to_string())
            .expect(3)
            .create_async()
            .await;

        let backend = UnsplashBackend::new("access".into(), format!("{}/search", server.url()));
        let images = backend.fetch("Cafe", "Modern", 3).await.unwrap();

        // Every query returns the same two photos, so only two distinct images exist.
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].photographer.as_deref(), Some("ana"));
        assert_eq!(images[1].photographer_url.as_deref(), Some("https://unsplash.com/@ben"));
        assert!(images.iter().all(|i| i.source == ImageSource::Unsplash));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stops_once_enough_photos_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": [photo("https://img/1", "ana"), photo("https://img/2", "ben")]}).to_string())
            .expect(1)
            .create_async()
            .await;

        let backend = UnsplashBackend::new("access".into(), format!("{}/search", server.url()));
        let images = backend.fetch("Cafe", "Modern", 2).await.unwrap();

        assert_eq!(images.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_photographer_name_defaults_to_unknown() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": [{"urls": {"regular": "https://img/9"}}]}).to_string())
            .create_async()
            .await;

        let backend = UnsplashBackend::new("access".into(), format!("{}/search", server.url()));
        let images = backend.fetch("Cafe", "Modern", 1).await.unwrap();

        assert_eq!(images[0].photographer.as_deref(), Some("Unknown"));
        assert_eq!(images[0].photographer_url.as_deref(), Some(""));
    }
}
