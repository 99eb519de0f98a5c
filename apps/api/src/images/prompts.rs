// Prompt and search-query builders for image acquisition.
// Tables are keyed on the declared enums; free text falls through to the defaults.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{BusinessType, StylePreference};

const QUALITY_SUFFIX: &str =
    "8k resolution, professional photography, perfect lighting, photorealistic";

pub const NEGATIVE_PROMPT: &str = "blurry, distorted, low quality, unrealistic, pixelated";

fn style_modifier(style: Option<StylePreference>) -> &'static str {
    use StylePreference::*;
    match style {
        Some(Modern) => "with a modern, sleek, and contemporary aesthetic",
        Some(Classic) => "with a classic, traditional, and timeless design",
        Some(Bold) => "with bold, vibrant colors and striking visual elements",
        Some(Minimal) => "with a minimalist, clean, and simple design",
        Some(Elegant) => "with an elegant, sophisticated, and refined appearance",
        Some(Playful) => "with a playful, fun, and energetic atmosphere",
        Some(Professional) => "with a professional, corporate, and polished look",
        Some(Rustic) => "with a rustic, warm, and natural ambiance",
        Some(Luxurious) => "with a luxurious, premium, and high-end feel",
        Some(EcoFriendly) => "with an eco-friendly, sustainable, and natural theme",
        None => "with a professional and appealing design",
    }
}

fn business_detail(kind: Option<BusinessType>) -> &'static str {
    use BusinessType::*;
    match kind {
        Some(Restaurant) => "showing an inviting dining area with elegant table settings and ambient lighting",
        Some(RetailStore) => "featuring a well-organized store interior with attractive product displays",
        Some(SalonSpa) => "depicting a serene and relaxing spa environment with soft lighting and clean spaces",
        Some(FitnessCenter) => "showing a modern gym with well-maintained equipment and motivational atmosphere",
        Some(Cafe) => "with a cozy coffee shop interior, featuring warm lighting and comfortable seating",
        Some(Bakery) => "displaying artisanal baked goods in an inviting bakery setting",
        Some(Consulting) => "with a professional office environment conveying trust and expertise",
        Some(LegalServices) => "featuring a sophisticated law office with professional decor and bookshelves",
        Some(Healthcare) => "showing a clean, welcoming medical facility that conveys care and professionalism",
        Some(RealEstate) => "featuring an attractive property with appealing architectural elements",
        Some(Technology) => "with a modern tech workspace showing innovation and digital elements",
        Some(Education) => "depicting an engaging learning environment with educational resources",
        Some(ArtGallery) => "showing an elegant gallery space with proper lighting and artistic displays",
        Some(Automotive) => "featuring a professional automotive service center or showroom",
        Some(Construction) => "showing a construction project with professional equipment and safety measures",
        Some(EventPlanning) => "depicting a beautifully decorated event space with attention to detail",
        Some(FinancialServices) => "with a professional financial office conveying trust and security",
        Some(HomeServices) => "showing a professional performing home maintenance or improvement",
        Some(PetServices) => "featuring a clean, friendly environment for pet care and services",
        Some(Other) | None => "in a professional setting",
    }
}

fn style_terms(style: Option<StylePreference>) -> &'static [&'static str] {
    use StylePreference::*;
    match style {
        Some(Modern) => &["modern", "contemporary", "sleek"],
        Some(Classic) => &["classic", "traditional", "timeless"],
        Some(Bold) => &["bold", "vibrant", "striking"],
        Some(Minimal) => &["minimal", "clean", "simple"],
        Some(Elegant) => &["elegant", "sophisticated", "refined"],
        _ => &["professional", "business"],
    }
}

fn business_terms(kind: Option<BusinessType>) -> &'static [&'static str] {
    use BusinessType::*;
    match kind {
        Some(Restaurant) => &["food", "dining", "restaurant interior"],
        Some(RetailStore) => &["retail", "store", "shopping"],
        Some(SalonSpa) => &["salon", "spa", "beauty"],
        Some(FitnessCenter) => &["fitness", "gym", "workout"],
        Some(Cafe) => &["cafe", "coffee", "cozy"],
        Some(Bakery) => &["bakery", "pastry", "bread"],
        Some(Consulting) => &["consulting", "business", "professional"],
        Some(LegalServices) => &["legal", "law", "professional"],
        Some(Healthcare) => &["healthcare", "medical", "wellness"],
        Some(RealEstate) => &["real estate", "property", "home"],
        Some(Technology) => &["technology", "tech", "digital"],
        Some(Education) => &["education", "learning", "school"],
        Some(ArtGallery) => &["art", "gallery", "exhibition"],
        Some(Automotive) => &["automotive", "car", "vehicle"],
        Some(Construction) => &["construction", "building", "architecture"],
        Some(EventPlanning) => &["event", "celebration", "planning"],
        Some(FinancialServices) => &["financial", "banking", "business"],
        Some(HomeServices) => &["home", "services", "interior"],
        Some(PetServices) => &["pet", "animal", "dog cat"],
        Some(Other) | None => &["business", "professional"],
    }
}

/// Text-to-image prompt for a business type and style.
pub fn image_prompt(business_type: &str, style: &str) -> String {
    format!(
        "A professional, high-quality image for a {} business {}, {}. {}",
        business_type.to_lowercase(),
        style_modifier(StylePreference::from_label(style)),
        business_detail(BusinessType::from_label(business_type)),
        QUALITY_SUFFIX
    )
}

/// Three stock-search queries, tried in order.
pub fn search_queries(business_type: &str, style: &str) -> Vec<String> {
    search_queries_with(business_type, style, &mut rand::thread_rng())
}

pub fn search_queries_with<R: Rng + ?Sized>(
    business_type: &str,
    style: &str,
    rng: &mut R,
) -> Vec<String> {
    let kind = business_type.to_lowercase();

    let mut pool = vec![kind.clone()];
    pool.extend(style_terms(StylePreference::from_label(style)).iter().map(|t| t.to_string()));
    pool.extend(business_terms(BusinessType::from_label(business_type)).iter().map(|t| t.to_string()));

    let random_term = pool.choose(rng).cloned().unwrap_or_else(|| kind.clone());

    vec![
        format!("{kind} {}", style.to_lowercase()),
        format!("{kind} business"),
        random_term,
    ]
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_image_prompt_for_declared_values() {
        assert_eq!(
            image_prompt("Bakery", "Rustic"),
            "A professional, high-quality image for a bakery business with a rustic, warm, and natural ambiance, \
             displaying artisanal baked goods in an inviting bakery setting. \
             8k resolution, professional photography, perfect lighting, photorealistic"
        );
    }

    #[test]
    fn test_image_prompt_defaults_for_free_text() {
        let prompt = image_prompt("Llama Farm", "Whimsical");
        assert!(prompt.starts_with("A professional, high-quality image for a llama farm business"));
        assert!(prompt.contains("with a professional and appealing design, in a professional setting."));
    }

    #[test]
    fn test_search_queries_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let queries = search_queries_with("Cafe", "Minimal", &mut rng);

        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], "cafe minimal");
        assert_eq!(queries[1], "cafe business");
        let pool = ["cafe", "minimal", "clean", "simple", "coffee", "cozy"];
        assert!(pool.contains(&queries[2].as_str()), "{}", queries[2]);
    }

    #[test]
    fn test_search_term_pool_uses_defaults_for_unknown_style() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let q = search_queries_with("Other", "Rustic", &mut rng);
            assert!(["other", "professional", "business"].contains(&q[2].as_str()));
        }
    }
}
