// LLM prompt builders for the Generation module.
// Each prompt is produced by a single format! so user text is never re-scanned
// for placeholders.

use crate::enrichment::EnrichedProfile;

pub fn description_prompt(enriched: &EnrichedProfile) -> String {
    let p = &enriched.profile;
    format!(
        r#"Create a professional business description for '{name}', a {business_type} located in {location}.

Business details:
- Description provided by owner: {description}
- Target audience: {target_audience}
- Style preference: {style_preference}

Use a {voice} tone and include {selling_points} as key selling points.

Generate three versions:
1. A short 50-word description for quick reference
2. A medium 150-word description for general use
3. A comprehensive 300-word description for detailed marketing materials

Each description should highlight what makes this business unique and appeal to their target audience."#,
        name = p.name,
        business_type = p.business_type,
        location = p.location,
        description = p.description,
        target_audience = p.target_audience,
        style_preference = p.style_preference,
        voice = enriched.tone.voice,
        selling_points = enriched.business_context.key_selling_points.join(", "),
    )
}

pub fn email_prompt(enriched: &EnrichedProfile) -> String {
    let p = &enriched.profile;
    format!(
        r#"Create email marketing templates for '{name}', a {business_type} business.

Business details:
- Description: {description}
- Target audience: {target_audience}
- Style preference: {style_preference}

Generate three email templates:
1. Welcome email for new subscribers
2. Promotional email for special offers
3. Newsletter template for updates

Each template should have a subject line and body content.
Use a {voice} tone and focus on {marketing_focus}."#,
        name = p.name,
        business_type = p.business_type,
        description = p.description,
        target_audience = p.target_audience,
        style_preference = p.style_preference,
        voice = enriched.tone.voice,
        marketing_focus = enriched.business_context.marketing_focus.join(", "),
    )
}

pub fn social_prompt(enriched: &EnrichedProfile) -> String {
    let p = &enriched.profile;
    format!(
        r#"Create social media posts for '{name}', a {business_type} business.

Business details:
- Target audience: {target_audience}
- Style preference: {style_preference}

Generate three posts each for:
1. Facebook - Longer form, engaging content
2. Twitter/X - Short, punchy messages
3. Instagram - Visual-focused descriptions

Use a {voice} tone and focus on {marketing_focus}."#,
        name = p.name,
        business_type = p.business_type,
        target_audience = p.target_audience,
        style_preference = p.style_preference,
        voice = enriched.tone.voice,
        marketing_focus = enriched.business_context.marketing_focus.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::enrich;
    use crate::models::business::sample_profile;

    #[test]
    fn test_description_prompt_embeds_profile_and_selling_points() {
        let mut profile = sample_profile();
        profile.business_type = "Restaurant".to_string();
        let prompt = description_prompt(&enrich(&profile).unwrap());

        assert!(prompt.contains("'Sunrise Bakery', a Restaurant located in Portland"));
        assert!(prompt.contains("include cuisine, ambiance, dining experience as key selling points"));
        assert!(prompt.contains("Use a friendly and professional tone"));
        assert!(!prompt.contains('{'), "all placeholders must be filled");
    }

    #[test]
    fn test_email_and_social_prompts_use_marketing_focus() {
        let enriched = enrich(&sample_profile()).unwrap();
        let email = email_prompt(&enriched);
        let social = social_prompt(&enriched);

        let focus = "unique value proposition, customer benefits, reliability";
        assert!(email.contains(focus));
        assert!(social.contains(focus));
        assert!(social.contains("Twitter/X"));
        assert!(!email.contains('{') && !social.contains('{'));
    }

    #[test]
    fn test_braces_in_user_text_are_kept_verbatim() {
        let mut profile = sample_profile();
        profile.name = "{voice} Bakery".to_string();
        profile.description = "We bake in {location} style".to_string();
        let prompt = description_prompt(&enrich(&profile).unwrap());

        assert!(prompt.contains("for '{voice} Bakery', a Bakery located in Portland"));
        assert!(prompt.contains("Description provided by owner: We bake in {location} style"));
    }
}
