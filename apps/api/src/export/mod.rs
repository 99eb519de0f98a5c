//! Export: renders generated content into downloadable artifacts.
//!
//! Every export writes a new file into the export directory; existing files
//! are never overwritten. Renderers are pure and live in the submodules; this
//! module owns naming, fonts, background fetching and disk writes.

pub mod description;
pub mod email;
pub mod handlers;
pub mod social;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ab_glyph::FontVec;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Datelike, Local};
use image::DynamicImage;
use reqwest::Client;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::models::{BusinessProfile, DescriptionSet, EmailKind, EmailSet, Platform, SocialPosts};
use social::Backdrop;

/// Fonts tried in order when no font path is configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Could not find a free file name for {0}")]
    NameExhausted(String),
}

#[derive(Debug, Error)]
enum BackgroundError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("bad data URL: {0}")]
    DataUrl(#[from] base64::DecodeError),

    #[error("undecodable image: {0}")]
    Decode(#[from] image::ImageError),
}

/// `<name_with_underscores>_<YYYYMMDDHHMMSS>_<kind>.<ext>`. Path separators
/// in the name are replaced as well.
pub fn artifact_filename(business_name: &str, now: DateTime<Local>, kind: &str, ext: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        business_name.replace([' ', '/', '\\'], "_"),
        now.format("%Y%m%d%H%M%S"),
        kind,
        ext
    )
}

#[derive(Clone)]
pub struct ExportService {
    export_dir: PathBuf,
    http: Client,
    font: Option<Arc<FontVec>>,
}

impl ExportService {
    /// Creates the export directory if needed and loads the overlay font.
    pub fn new(export_dir: PathBuf, font_path: Option<PathBuf>) -> Result<Self, ExportError> {
        std::fs::create_dir_all(&export_dir)?;

        let font = load_font(font_path.as_deref()).map(Arc::new);
        if font.is_none() {
            warn!("No TrueType font found; social images will be rendered without text");
        }

        Ok(Self {
            export_dir,
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            font,
        })
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub async fn export_email(
        &self,
        profile: &BusinessProfile,
        emails: &EmailSet,
        kind: EmailKind,
    ) -> Result<PathBuf, ExportError> {
        let now = Local::now();
        let html = email::render_email_html(emails.get(kind), kind, profile, now.year());
        let name = artifact_filename(&profile.name, now, &format!("{}_email", kind.as_str()), "html");
        self.write_unique(&name, html.as_bytes()).await
    }

    /// Composes the social image for the first post of `platform`, over the
    /// given background image URL (HTTP or `data:`) or a gradient.
    pub async fn export_social(
        &self,
        profile: &BusinessProfile,
        posts: &SocialPosts,
        platform: Platform,
        image_url: Option<&str>,
    ) -> Result<PathBuf, ExportError> {
        let backdrop = match image_url {
            Some(url) => match self.fetch_background(url).await {
                Ok(img) => Backdrop::Photo(img),
                Err(e) => {
                    warn!("Error processing image for social post: {e}");
                    Backdrop::Flat
                }
            },
            None => Backdrop::Gradient,
        };

        let post = posts.get(platform).first().map(String::as_str);
        let canvas = social::compose_social_image(&backdrop, &profile.name, post, self.font.as_deref());
        let png = social::encode_png(canvas)?;

        let name = artifact_filename(
            &profile.name,
            Local::now(),
            &format!("{}_post", platform.as_str()),
            "png",
        );
        self.write_unique(&name, &png).await
    }

    pub async fn export_description(
        &self,
        profile: &BusinessProfile,
        descriptions: &DescriptionSet,
    ) -> Result<PathBuf, ExportError> {
        self.export_description_at(profile, descriptions, Local::now())
            .await
    }

    pub async fn export_description_at(
        &self,
        profile: &BusinessProfile,
        descriptions: &DescriptionSet,
        now: DateTime<Local>,
    ) -> Result<PathBuf, ExportError> {
        let text = description::render_description_text(descriptions, profile, now);
        let name = artifact_filename(&profile.name, now, "description", "txt");
        self.write_unique(&name, text.as_bytes()).await
    }

    async fn fetch_background(&self, url: &str) -> Result<DynamicImage, BackgroundError> {
        let bytes = if let Some(rest) = url.strip_prefix("data:") {
            let payload = rest.split_once(',').map(|(_, data)| data).unwrap_or(rest);
            STANDARD.decode(payload.trim())?
        } else {
            let response = self.http.get(url).send().await?;
            if !response.status().is_success() {
                return Err(BackgroundError::Status(response.status().as_u16()));
            }
            response.bytes().await?.to_vec()
        };
        Ok(image::load_from_memory(&bytes)?)
    }

    /// Writes `bytes` under `name`, appending `_<n>` before the extension
    /// until an unused name is found.
    async fn write_unique(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{ext}")),
            None => (name, String::new()),
        };

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                name.to_string()
            } else {
                format!("{stem}_{attempt}{ext}")
            };
            let path = self.export_dir.join(&candidate);

            let open = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match open {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    info!("Exported {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next suffix", path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ExportError::NameExhausted(name.to_string()))
    }
}

pub(crate) fn load_font(configured: Option<&Path>) -> Option<FontVec> {
    let candidates = configured
        .into_iter()
        .map(Path::to_path_buf)
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from));

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                info!("Loaded social image font from {}", path.display());
                return Some(font);
            }
            Err(e) => warn!("Ignoring invalid font {}: {e}", path.display()),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::business::sample_profile;

    fn service(dir: &Path) -> ExportService {
        ExportService::new(dir.to_path_buf(), Some(dir.join("missing.ttf"))).unwrap()
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_artifact_filename_format() {
        assert_eq!(
            artifact_filename("Sunrise Bakery Co", fixed_time(), "description", "txt"),
            "Sunrise_Bakery_Co_20240309140507_description.txt"
        );
        assert_eq!(
            artifact_filename("Fish/Chips", fixed_time(), "facebook_post", "png"),
            "Fish_Chips_20240309140507_facebook_post.png"
        );
    }

    #[tokio::test]
    async fn test_description_export_twice_yields_two_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let exports = service(dir.path());
        let profile = sample_profile();
        let desc = DescriptionSet {
            short: "S".into(),
            medium: "M".into(),
            long: "L".into(),
        };

        let first = exports.export_description_at(&profile, &desc, fixed_time()).await.unwrap();
        let second = exports.export_description_at(&profile, &desc, fixed_time()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap().to_str().unwrap(),
            "Sunrise_Bakery_20240309140507_description_1.txt"
        );
        assert_eq!(
            std::fs::read_to_string(&first).unwrap(),
            std::fs::read_to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_email_export_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let exports = service(dir.path());
        let emails = EmailSet::fallback("x");

        let path = exports
            .export_email(&sample_profile(), &emails, EmailKind::Newsletter)
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("Sunrise_Bakery_"));
        assert!(name.ends_with("_newsletter_email.html"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("System Maintenance Notice"));
    }

    #[tokio::test]
    async fn test_social_export_from_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let exports = service(dir.path());

        let mut png = Vec::new();
        DynamicImage::new_rgb8(40, 20)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let url = format!("data:image/png;base64,{}", STANDARD.encode(&png));

        let posts = SocialPosts {
            instagram: vec!["Fresh bread every morning".into()],
            ..Default::default()
        };
        let path = exports
            .export_social(&sample_profile(), &posts, Platform::Instagram, Some(&url))
            .await
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (1080, 1080));
        assert!(path.to_str().unwrap().ends_with("_instagram_post.png"));
    }

    #[tokio::test]
    async fn test_unreachable_background_falls_back_to_flat() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/bg.png").with_status(404).create_async().await;

        let dir = tempfile::tempdir().unwrap();
        let exports = service(dir.path());
        let path = exports
            .export_social(
                &sample_profile(),
                &SocialPosts::default(),
                Platform::Facebook,
                Some(&format!("{}/bg.png", server.url())),
            )
            .await
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(5, 5).0, [240, 240, 240]);
    }
}
