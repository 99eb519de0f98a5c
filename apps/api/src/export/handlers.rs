//! Axum route handlers for the Export API.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::info;

use crate::errors::AppError;
use crate::models::{EmailKind, Platform};
use crate::session::load_current;
use crate::state::AppState;
use crate::storage::content_type_for;

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub template: Option<String>,
    pub platform: Option<String>,
}

/// Replaces characters that cannot appear in a quoted header parameter.
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' => ' ',
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}

/// GET /api/export/:kind
///
/// `kind` is `email` (`?template=welcome|promotional|newsletter`), `social`
/// (`?platform=facebook|twitter|instagram`) or `description`. Responds with
/// the written file as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(kind): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_current(state.sessions.as_ref(), &cookies).await?;
    let (Some(profile), Some(content)) = (session.profile, session.content) else {
        return Err(AppError::NotFound("No generated content to export".to_string()));
    };

    let (path, download_name) = match kind.as_str() {
        "email" => {
            let template = query.template.as_deref().unwrap_or("welcome");
            let email_kind = EmailKind::parse(template)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown email template '{template}'")))?;
            let path = state
                .exports
                .export_email(&profile, &content.email, email_kind)
                .await?;
            (path, format!("{}_email.html", profile.name))
        }
        "social" => {
            let platform_name = query.platform.as_deref().unwrap_or("facebook");
            let platform = Platform::parse(platform_name)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown platform '{platform_name}'")))?;
            let background = session.images.first().map(|img| img.url.as_str());
            let path = state
                .exports
                .export_social(&profile, &content.social_media, platform, background)
                .await?;
            (path, format!("{}_social_post.png", profile.name))
        }
        "description" => {
            let path = state
                .exports
                .export_description(&profile, &content.description)
                .await?;
            (path, format!("{}_description.txt", profile.name))
        }
        _ => return Err(AppError::NotFound("Invalid export type".to_string())),
    };

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(crate::export::ExportError::from)?;
    info!("Serving export {} as {download_name}", path.display());

    let disposition = format!("attachment; filename=\"{}\"", header_safe(&download_name));
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&download_name).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
