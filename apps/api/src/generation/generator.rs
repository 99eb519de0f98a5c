//! Content generation: orchestrates prompt → completion → parse for each
//! content kind and substitutes the fallback payload on any failure.
//!
//! Flow: validate form → enrich → description → emails → social posts → images.
//! Calls run sequentially; a failure in one kind never aborts the others.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::enrichment::{enrich_or_generic, EnrichedProfile};
use crate::errors::AppError;
use crate::generation::parser::{parse_descriptions, parse_emails, parse_social_posts, ParseError};
use crate::generation::prompts::{description_prompt, email_prompt, social_prompt};
use crate::images::ImageService;
use crate::llm_client::{LlmError, TextCompletion};
use crate::models::{
    BusinessForm, BusinessProfile, DescriptionSet, EmailSet, GeneratedContent, ImageResult,
    SocialPosts,
};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Everything one submission produces. Stored in the session as-is.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub profile: BusinessProfile,
    pub content: GeneratedContent,
    pub images: Vec<ImageResult>,
}

pub async fn generate_descriptions(
    llm: &dyn TextCompletion,
    enriched: &EnrichedProfile,
) -> Result<DescriptionSet, GenerationError> {
    let reply = llm.complete(&description_prompt(enriched)).await?;
    Ok(parse_descriptions(&reply)?)
}

pub async fn generate_emails(
    llm: &dyn TextCompletion,
    enriched: &EnrichedProfile,
) -> Result<EmailSet, GenerationError> {
    let reply = llm.complete(&email_prompt(enriched)).await?;
    Ok(parse_emails(&reply)?)
}

pub async fn generate_social_posts(
    llm: &dyn TextCompletion,
    enriched: &EnrichedProfile,
) -> Result<SocialPosts, GenerationError> {
    let reply = llm.complete(&social_prompt(enriched)).await?;
    Ok(parse_social_posts(&reply)?)
}

/// Generates all three content kinds. Never fails: each kind degrades to its
/// fallback payload independently, so the result is always fully populated.
pub async fn generate_content(
    llm: &dyn TextCompletion,
    enriched: &EnrichedProfile,
) -> GeneratedContent {
    let description = generate_descriptions(llm, enriched)
        .await
        .unwrap_or_else(|e| {
            warn!("Description generation failed, using fallback: {e}");
            DescriptionSet::fallback(&e.to_string())
        });

    let email = generate_emails(llm, enriched).await.unwrap_or_else(|e| {
        warn!("Email generation failed, using fallback: {e}");
        EmailSet::fallback(&e.to_string())
    });

    let social_media = generate_social_posts(llm, enriched)
        .await
        .unwrap_or_else(|e| {
            warn!("Social post generation failed, using fallback: {e}");
            SocialPosts::fallback(&e.to_string())
        });

    GeneratedContent {
        description,
        email,
        social_media,
    }
}

/// Runs a full submission. The form is validated before any remote call.
pub async fn run_submission(
    llm: &dyn TextCompletion,
    images: &ImageService,
    form: BusinessForm,
    image_count: usize,
) -> Result<Submission, AppError> {
    let profile = form.into_profile()?;
    info!(
        "Generating content for '{}' ({}, {})",
        profile.name, profile.business_type, profile.style_preference
    );

    let enriched = enrich_or_generic(&profile);
    let content = generate_content(llm, &enriched).await;

    let images = images
        .acquire(&profile.business_type, &profile.style_preference, image_count)
        .await;
    info!("Submission for '{}' complete: {} images", profile.name, images.len());

    Ok(Submission {
        profile,
        content,
        images,
    })
}
