//! Context enrichment: derives marketing context from static tables keyed by
//! business type and style. Nothing here reads the free-text description or
//! audience fields.

pub mod business_context;
pub mod tone;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::BusinessProfile;

pub use business_context::{business_context, BusinessContext};
pub use tone::{tone_for, Tone};

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalContext {
    pub local_terms: Vec<&'static str>,
    pub community_focus: Vec<&'static str>,
    pub regional_appeal: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceInsights {
    pub pain_points: Vec<&'static str>,
    pub motivations: Vec<&'static str>,
    pub communication_style: &'static str,
}

/// A profile plus the derived context that feeds prompt construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedProfile {
    #[serde(flatten)]
    pub profile: BusinessProfile,
    pub business_context: BusinessContext,
    pub tone: Tone,
    pub local_context: LocalContext,
    pub audience_insights: AudienceInsights,
}

impl EnrichedProfile {
    /// The fully generic enrichment substituted when `enrich` fails.
    pub fn generic(profile: BusinessProfile) -> Self {
        Self {
            profile,
            business_context: BusinessContext {
                key_selling_points: vec!["quality service", "customer satisfaction"],
                common_challenges: vec![],
                marketing_focus: vec!["customer benefits", "reliability"],
            },
            tone: Tone {
                adjectives: vec![],
                voice: "professional and friendly",
                sentence_style: "clear and engaging",
            },
            local_context: LocalContext {
                local_terms: vec!["local", "community"],
                community_focus: vec!["serving the community"],
                regional_appeal: vec![],
            },
            audience_insights: AudienceInsights {
                pain_points: vec!["convenience", "quality"],
                motivations: vec!["improvement", "enjoyment"],
                communication_style: "clear and relatable",
            },
        }
    }
}

/// Location phrases. Not a lookup: the same templates for every location.
pub fn local_context(location: &str) -> LocalContext {
    LocalContext {
        local_terms: vec!["local", "community", "neighborhood"],
        community_focus: vec!["serving the community", "local favorite", "neighborhood gem"],
        regional_appeal: vec![
            format!("in the heart of {location}"),
            format!("serving {location} and surrounding areas"),
        ],
    }
}

/// Audience insights. The description is accepted but not analysed.
pub fn audience_insights(_target_audience: &str) -> AudienceInsights {
    AudienceInsights {
        pain_points: vec!["convenience", "quality", "value"],
        motivations: vec!["improvement", "enjoyment", "necessity"],
        communication_style: "clear and relatable",
    }
}

/// Builds the enriched profile. Fails only if a required field is blank.
pub fn enrich(profile: &BusinessProfile) -> Result<EnrichedProfile, EnrichmentError> {
    if let Some(field) = profile.first_missing_field() {
        return Err(EnrichmentError::MissingField(field));
    }

    Ok(EnrichedProfile {
        business_context: business_context(profile.kind()),
        tone: tone_for(profile.style()),
        local_context: local_context(&profile.location),
        audience_insights: audience_insights(&profile.target_audience),
        profile: profile.clone(),
    })
}

/// `enrich`, degrading to the generic enrichment instead of failing.
pub fn enrich_or_generic(profile: &BusinessProfile) -> EnrichedProfile {
    enrich(profile).unwrap_or_else(|e| {
        warn!("Error processing business data: {e}; using generic context");
        EnrichedProfile::generic(profile.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::business::sample_profile;

    #[test]
    fn test_enrich_uses_type_and_style_tables() {
        let mut profile = sample_profile();
        profile.business_type = "Cafe".to_string();
        profile.style_preference = "Bold".to_string();

        let enriched = enrich(&profile).unwrap();
        assert!(enriched.business_context.key_selling_points.contains(&"coffee quality"));
        assert_eq!(enriched.tone.voice, "assertive and energetic");
        assert_eq!(enriched.profile, profile);
    }

    #[test]
    fn test_unknown_type_and_style_get_generic_tables() {
        let mut profile = sample_profile();
        profile.business_type = "Submarine Rentals".to_string();
        profile.style_preference = "Vaporwave".to_string();

        let enriched = enrich(&profile).unwrap();
        assert_eq!(enriched.business_context, business_context::generic_business_context());
        assert_eq!(enriched.tone, tone::generic_tone());
    }

    #[test]
    fn test_location_is_interpolated() {
        let ctx = local_context("Austin");
        assert_eq!(
            ctx.regional_appeal,
            vec!["in the heart of Austin", "serving Austin and surrounding areas"]
        );
    }

    #[test]
    fn test_audience_input_is_ignored() {
        assert_eq!(audience_insights("retirees"), audience_insights("teenage gamers"));
    }

    #[test]
    fn test_enrich_or_generic_substitutes_on_blank_field() {
        let mut profile = sample_profile();
        profile.description = String::new();

        assert!(matches!(
            enrich(&profile),
            Err(EnrichmentError::MissingField("business_description"))
        ));
        let enriched = enrich_or_generic(&profile);
        assert_eq!(enriched.tone.voice, "professional and friendly");
        assert!(enriched.business_context.common_challenges.is_empty());
    }
}
