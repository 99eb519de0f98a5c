// Image acquisition: two generative backends and a stock-photo fallback.
// Backends never abort a submission; failures contribute zero images.

pub mod bria;
pub mod prompts;
pub mod service;
pub mod stability;
pub mod unsplash;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{ImageResult, ImageSource};

pub use bria::BriaBackend;
pub use service::ImageService;
pub use stability::StabilityBackend;
pub use unsplash::UnsplashBackend;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication error: invalid API key or unauthorized access")]
    Unauthorized,

    #[error("rate limit exceeded, try again later")]
    RateLimited,

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },
}

/// A source of images for a business. `count` is an upper bound.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    fn source(&self) -> ImageSource;

    async fn fetch(
        &self,
        business_type: &str,
        style: &str,
        count: usize,
    ) -> Result<Vec<ImageResult>, ImageError>;
}

/// Maps a non-success response to an `ImageError`, consuming the body.
async fn error_for_response(response: reqwest::Response) -> ImageError {
    match response.status() {
        StatusCode::UNAUTHORIZED => ImageError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ImageError::RateLimited,
        status => ImageError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        },
    }
}
