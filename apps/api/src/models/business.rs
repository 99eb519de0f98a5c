use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The business profile submitted through the intake form.
/// All six fields are required; the profile is never mutated after intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    pub business_type: String,
    pub description: String,
    pub location: String,
    pub target_audience: String,
    pub style_preference: String,
}

impl BusinessProfile {
    /// Field names paired with their values, in form order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("business_name", &self.name),
            ("business_type", &self.business_type),
            ("business_description", &self.description),
            ("business_location", &self.location),
            ("target_audience", &self.target_audience),
            ("style_preference", &self.style_preference),
        ]
    }

    /// Returns the name of the first blank field, if any.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        self.fields()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
    }

    pub fn kind(&self) -> Option<BusinessType> {
        BusinessType::from_label(&self.business_type)
    }

    pub fn style(&self) -> Option<StylePreference> {
        StylePreference::from_label(&self.style_preference)
    }
}

/// Intake payload. Every field is optional on the wire so that a missing
/// field produces a validation message rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessForm {
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub business_description: Option<String>,
    pub business_location: Option<String>,
    pub target_audience: Option<String>,
    pub style_preference: Option<String>,
}

impl BusinessForm {
    /// Validates the form and builds the profile. Rejects on the first blank field.
    pub fn into_profile(self) -> Result<BusinessProfile, AppError> {
        let profile = BusinessProfile {
            name: self.business_name.unwrap_or_default(),
            business_type: self.business_type.unwrap_or_default(),
            description: self.business_description.unwrap_or_default(),
            location: self.business_location.unwrap_or_default(),
            target_audience: self.target_audience.unwrap_or_default(),
            style_preference: self.style_preference.unwrap_or_default(),
        };

        if let Some(field) = profile.first_missing_field() {
            return Err(AppError::Validation(format!(
                "Please fill in the {} field.",
                field.replace('_', " ")
            )));
        }

        Ok(profile)
    }
}

/// Declared business categories offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessType {
    Restaurant,
    RetailStore,
    SalonSpa,
    FitnessCenter,
    Cafe,
    Bakery,
    Consulting,
    LegalServices,
    Healthcare,
    RealEstate,
    Technology,
    Education,
    ArtGallery,
    Automotive,
    Construction,
    EventPlanning,
    FinancialServices,
    HomeServices,
    PetServices,
    Other,
}

impl BusinessType {
    pub const ALL: [BusinessType; 20] = [
        BusinessType::Restaurant,
        BusinessType::RetailStore,
        BusinessType::SalonSpa,
        BusinessType::FitnessCenter,
        BusinessType::Cafe,
        BusinessType::Bakery,
        BusinessType::Consulting,
        BusinessType::LegalServices,
        BusinessType::Healthcare,
        BusinessType::RealEstate,
        BusinessType::Technology,
        BusinessType::Education,
        BusinessType::ArtGallery,
        BusinessType::Automotive,
        BusinessType::Construction,
        BusinessType::EventPlanning,
        BusinessType::FinancialServices,
        BusinessType::HomeServices,
        BusinessType::PetServices,
        BusinessType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BusinessType::Restaurant => "Restaurant",
            BusinessType::RetailStore => "Retail Store",
            BusinessType::SalonSpa => "Salon/Spa",
            BusinessType::FitnessCenter => "Fitness Center",
            BusinessType::Cafe => "Cafe",
            BusinessType::Bakery => "Bakery",
            BusinessType::Consulting => "Consulting",
            BusinessType::LegalServices => "Legal Services",
            BusinessType::Healthcare => "Healthcare",
            BusinessType::RealEstate => "Real Estate",
            BusinessType::Technology => "Technology",
            BusinessType::Education => "Education",
            BusinessType::ArtGallery => "Art Gallery",
            BusinessType::Automotive => "Automotive",
            BusinessType::Construction => "Construction",
            BusinessType::EventPlanning => "Event Planning",
            BusinessType::FinancialServices => "Financial Services",
            BusinessType::HomeServices => "Home Services",
            BusinessType::PetServices => "Pet Services",
            BusinessType::Other => "Other",
        }
    }

    /// Exact, case-sensitive label match. Free text outside the declared set is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

/// Declared style preferences offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylePreference {
    Modern,
    Classic,
    Bold,
    Minimal,
    Elegant,
    Playful,
    Professional,
    Rustic,
    Luxurious,
    EcoFriendly,
}

impl StylePreference {
    pub const ALL: [StylePreference; 10] = [
        StylePreference::Modern,
        StylePreference::Classic,
        StylePreference::Bold,
        StylePreference::Minimal,
        StylePreference::Elegant,
        StylePreference::Playful,
        StylePreference::Professional,
        StylePreference::Rustic,
        StylePreference::Luxurious,
        StylePreference::EcoFriendly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StylePreference::Modern => "Modern",
            StylePreference::Classic => "Classic",
            StylePreference::Bold => "Bold",
            StylePreference::Minimal => "Minimal",
            StylePreference::Elegant => "Elegant",
            StylePreference::Playful => "Playful",
            StylePreference::Professional => "Professional",
            StylePreference::Rustic => "Rustic",
            StylePreference::Luxurious => "Luxurious",
            StylePreference::EcoFriendly => "Eco-friendly",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> BusinessProfile {
    BusinessProfile {
        name: "Sunrise Bakery".to_string(),
        business_type: "Bakery".to_string(),
        description: "Family-run bakery with sourdough and pastries".to_string(),
        location: "Portland".to_string(),
        target_audience: "Local families and commuters".to_string(),
        style_preference: "Rustic".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> BusinessForm {
        BusinessForm {
            business_name: Some("Sunrise Bakery".to_string()),
            business_type: Some("Bakery".to_string()),
            business_description: Some("Fresh bread daily".to_string()),
            business_location: Some("Portland".to_string()),
            target_audience: Some("Families".to_string()),
            style_preference: Some("Rustic".to_string()),
        }
    }

    #[test]
    fn test_full_form_builds_profile() {
        let profile = full_form().into_profile().unwrap();
        assert_eq!(profile.name, "Sunrise Bakery");
        assert_eq!(profile.kind(), Some(BusinessType::Bakery));
        assert_eq!(profile.style(), Some(StylePreference::Rustic));
    }

    #[test]
    fn test_missing_field_is_rejected_with_field_name() {
        let mut form = full_form();
        form.business_location = None;
        let err = form.into_profile().unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Please fill in the business location field.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut form = full_form();
        form.target_audience = Some("   ".to_string());
        assert!(form.into_profile().is_err());
    }

    #[test]
    fn test_every_label_round_trips() {
        for t in BusinessType::ALL {
            assert_eq!(BusinessType::from_label(t.label()), Some(t));
        }
        for s in StylePreference::ALL {
            assert_eq!(StylePreference::from_label(s.label()), Some(s));
        }
    }

    #[test]
    fn test_unknown_labels_are_none() {
        assert_eq!(BusinessType::from_label("Spaceport"), None);
        assert_eq!(BusinessType::from_label("restaurant"), None);
        assert_eq!(StylePreference::from_label("Gothic"), None);
    }
}
