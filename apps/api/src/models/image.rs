use serde::{Deserialize, Serialize};

/// Which backend produced an image. Ordering of results follows acquisition
/// priority: generated sources first, stock last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    #[serde(rename = "Stability AI")]
    Stability,
    #[serde(rename = "Bria2.3")]
    Bria,
    #[serde(rename = "Unsplash")]
    Unsplash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
    pub source: ImageSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographer_url: Option<String>,
    pub download_url: String,
}

impl ImageResult {
    /// A generated image: the prompt is kept, download URL equals the display URL.
    pub fn generated(url: String, source: ImageSource, prompt: &str, id: String) -> Self {
        Self {
            download_url: url.clone(),
            url,
            source,
            prompt: Some(prompt.to_string()),
            id: Some(id),
            photographer: None,
            photographer_url: None,
        }
    }
}
