use std::sync::Arc;

use tracing::{info, warn};

use super::ImageBackend;
use crate::models::ImageResult;

/// Acquires images in priority order: primary generator, secondary generator
/// for the shortfall, then stock photos when a stock backend is configured.
#[derive(Clone)]
pub struct ImageService {
    primary: Arc<dyn ImageBackend>,
    secondary: Arc<dyn ImageBackend>,
    stock: Option<Arc<dyn ImageBackend>>,
}

impl ImageService {
    pub fn new(
        primary: Arc<dyn ImageBackend>,
        secondary: Arc<dyn ImageBackend>,
        stock: Option<Arc<dyn ImageBackend>>,
    ) -> Self {
        Self {
            primary,
            secondary,
            stock,
        }
    }

    /// Returns at most `count` images with distinct URLs. Never fails.
    pub async fn acquire(&self, business_type: &str, style: &str, count: usize) -> Vec<ImageResult> {
        let mut images = Vec::with_capacity(count);

        let mut chain: Vec<&dyn ImageBackend> = vec![self.primary.as_ref(), self.secondary.as_ref()];
        if let Some(stock) = &self.stock {
            chain.push(stock.as_ref());
        }

        for backend in chain {
            if images.len() >= count {
                break;
            }
            fill_from(backend, business_type, style, count, &mut images).await;
        }

        images.truncate(count);
        info!("Acquired {}/{} images for {business_type}", images.len(), count);
        images
    }
}

async fn fill_from(
    backend: &dyn ImageBackend,
    business_type: &str,
    style: &str,
    count: usize,
    images: &mut Vec<ImageResult>,
) {
    let wanted = count - images.len();
    match backend.fetch(business_type, style, wanted).await {
        Ok(found) => {
            for image in found {
                if !images.iter().any(|i| i.url == image.url) {
                    images.push(image);
                }
            }
        }
        Err(e) => warn!("{:?} image backend failed: {e}", backend.source()),
    }
}
