use serde::Serialize;

use crate::models::BusinessType;

/// Marketing angle for a business category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessContext {
    pub key_selling_points: Vec<&'static str>,
    pub common_challenges: Vec<&'static str>,
    pub marketing_focus: Vec<&'static str>,
}

/// Looks up the marketing angle for a category. Five categories have a
/// dedicated entry; every other category gets the generic angle.
pub fn business_context(kind: Option<BusinessType>) -> BusinessContext {
    match kind {
        Some(BusinessType::Restaurant) => BusinessContext {
            key_selling_points: vec!["cuisine", "ambiance", "dining experience"],
            common_challenges: vec!["competition", "food quality consistency", "customer service"],
            marketing_focus: vec!["menu highlights", "special offers", "unique dining experience"],
        },
        Some(BusinessType::RetailStore) => BusinessContext {
            key_selling_points: vec!["product selection", "customer service", "shopping experience"],
            common_challenges: vec!["online competition", "inventory management", "customer retention"],
            marketing_focus: vec!["product quality", "exclusive items", "in-store experience"],
        },
        Some(BusinessType::SalonSpa) => BusinessContext {
            key_selling_points: vec!["skilled professionals", "relaxing environment", "quality services"],
            common_challenges: vec!["appointment scheduling", "client retention", "service consistency"],
            marketing_focus: vec!["expertise", "relaxation", "self-care", "transformation"],
        },
        Some(BusinessType::FitnessCenter) => BusinessContext {
            key_selling_points: vec!["equipment variety", "class offerings", "expert trainers"],
            common_challenges: vec!["member retention", "facility maintenance", "competition"],
            marketing_focus: vec!["results", "community", "health benefits", "expert guidance"],
        },
        Some(BusinessType::Cafe) => BusinessContext {
            key_selling_points: vec!["coffee quality", "ambiance", "food options"],
            common_challenges: vec!["competition", "consistency", "peak hour management"],
            marketing_focus: vec!["coffee expertise", "cozy atmosphere", "community space"],
        },
        _ => generic_business_context(),
    }
}

pub fn generic_business_context() -> BusinessContext {
    BusinessContext {
        key_selling_points: vec!["quality service", "customer satisfaction", "expertise"],
        common_challenges: vec!["market visibility", "customer acquisition", "service delivery"],
        marketing_focus: vec!["unique value proposition", "customer benefits", "reliability"],
    }
}
