//! Axum route handlers for the Generation API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_cookies::Cookies;
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{run_submission, Submission};
use crate::models::{BusinessForm, BusinessType, StylePreference};
use crate::session::{ensure_session_id, load_current, SessionData};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub business_types: Vec<&'static str>,
    pub style_preferences: Vec<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate
///
/// Validates the intake form, generates content and images, and stores the
/// result in the caller's session (creating the session cookie if needed).
pub async fn handle_generate(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(form): Json<BusinessForm>,
) -> Result<Json<Submission>, AppError> {
    let submission = run_submission(
        state.llm.as_ref(),
        &state.images,
        form,
        state.config.image_count,
    )
    .await?;

    let session_id = ensure_session_id(&cookies);
    let data = SessionData {
        profile: Some(submission.profile.clone()),
        content: Some(submission.content.clone()),
        images: submission.images.clone(),
    };
    state.sessions.save(session_id, &data).await?;
    info!("Stored submission in session {session_id}");

    Ok(Json(submission))
}

/// GET /api/results
///
/// The session's last submission. Sections are empty when nothing was generated yet.
pub async fn handle_results(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<SessionData>, AppError> {
    let session = load_current(state.sessions.as_ref(), &cookies).await?;
    Ok(Json(session))
}

/// GET /api/content?type=description|email|social_media
///
/// `{"content": <section>}`, or 404 when the section is absent.
pub async fn handle_get_content(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<ContentQuery>,
) -> Result<Json<Value>, AppError> {
    let session = load_current(state.sessions.as_ref(), &cookies).await?;

    let section = match (session.content, query.content_type.as_deref()) {
        (Some(content), Some(name)) => content.section(name),
        _ => None,
    };

    section
        .map(|content| Json(json!({ "content": content })))
        .ok_or_else(|| AppError::NotFound("Content type not found".to_string()))
}

/// GET /api/images
///
/// `{"images": [...]}`; empty without a session.
pub async fn handle_get_images(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Value>, AppError> {
    let session = load_current(state.sessions.as_ref(), &cookies).await?;
    Ok(Json(json!({ "images": session.images })))
}

/// GET /api/options
///
/// The declared business types and style preferences offered by the intake form.
pub async fn handle_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        business_types: BusinessType::ALL.iter().map(|t| t.label()).collect(),
        style_preferences: StylePreference::ALL.iter().map(|s| s.label()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_options_list_declared_values() {
        let Json(options) = handle_options().await;
        assert_eq!(options.business_types.len(), 20);
        assert_eq!(options.business_types[2], "Salon/Spa");
        assert_eq!(options.style_preferences.len(), 10);
        assert!(options.style_preferences.contains(&"Eco-friendly"));
    }

    #[test]
    fn test_content_query_uses_type_key() {
        let q: ContentQuery = serde_json::from_str(r#"{"type":"email"}"#).unwrap();
        assert_eq!(q.content_type.as_deref(), Some("email"));
    }
}
