//! Generated marketing content and the fixed fallback payloads that stand in
//! for it when generation or parsing fails.
//!
//! The fallback constructors below are the only place fallback text lives.

use serde::{Deserialize, Serialize};

/// Everything produced for one submission. All three parts are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub description: DescriptionSet,
    pub email: EmailSet,
    pub social_media: SocialPosts,
}

impl GeneratedContent {
    /// Looks up one top-level part by its wire name.
    pub fn section(&self, name: &str) -> Option<serde_json::Value> {
        let value = match name {
            "description" => serde_json::to_value(&self.description),
            "email" => serde_json::to_value(&self.email),
            "social_media" => serde_json::to_value(&self.social_media),
            _ => return None,
        };
        value.ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionSet {
    pub short: String,
    pub medium: String,
    pub long: String,
}

impl DescriptionSet {
    pub fn is_empty(&self) -> bool {
        self.short.is_empty() && self.medium.is_empty() && self.long.is_empty()
    }

    pub fn fallback(reason: &str) -> Self {
        Self {
            short: format!("Error generating content: {reason}"),
            medium: "We apologize, but we're currently experiencing technical difficulties with our content generation service. Please try again later.".to_string(),
            long: "Our content generation service is temporarily unavailable. This could be due to API rate limits or service disruption. Please wait a few minutes and try your request again. If the problem persists, please contact support.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    Welcome,
    Promotional,
    Newsletter,
}

impl EmailKind {
    pub const ALL: [EmailKind; 3] = [EmailKind::Welcome, EmailKind::Promotional, EmailKind::Newsletter];

    pub fn as_str(self) -> &'static str {
        match self {
            EmailKind::Welcome => "welcome",
            EmailKind::Promotional => "promotional",
            EmailKind::Newsletter => "newsletter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }

    /// "welcome" -> "Welcome"
    pub fn title(self) -> &'static str {
        match self {
            EmailKind::Welcome => "Welcome",
            EmailKind::Promotional => "Promotional",
            EmailKind::Newsletter => "Newsletter",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_off: Option<String>,
}

impl EmailTemplate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSet {
    pub welcome: EmailTemplate,
    pub promotional: EmailTemplate,
    pub newsletter: EmailTemplate,
}

impl EmailSet {
    pub fn get(&self, kind: EmailKind) -> &EmailTemplate {
        match kind {
            EmailKind::Welcome => &self.welcome,
            EmailKind::Promotional => &self.promotional,
            EmailKind::Newsletter => &self.newsletter,
        }
    }

    pub fn fallback(reason: &str) -> Self {
        Self {
            welcome: EmailTemplate::new(
                "Service Temporarily Unavailable",
                format!("Error generating welcome email template: {reason}\n\nPlease try again later."),
            ),
            promotional: EmailTemplate::new(
                "Content Generation Service Disruption",
                "We're experiencing technical difficulties with our content generation service.\nThis may be due to API rate limits or service disruption.\nPlease try again in a few minutes.",
            ),
            newsletter: EmailTemplate::new(
                "System Maintenance Notice",
                "Our content generation system is currently undergoing maintenance.\nWe apologize for any inconvenience.\nPlease refresh the page or try again later.",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Facebook,
    Twitter,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Facebook, Platform::Twitter, Platform::Instagram];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialPosts {
    pub facebook: Vec<String>,
    pub twitter: Vec<String>,
    pub instagram: Vec<String>,
}

impl SocialPosts {
    pub fn get(&self, platform: Platform) -> &[String] {
        match platform {
            Platform::Facebook => &self.facebook,
            Platform::Twitter => &self.twitter,
            Platform::Instagram => &self.instagram,
        }
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut Vec<String> {
        match platform {
            Platform::Facebook => &mut self.facebook,
            Platform::Twitter => &mut self.twitter,
            Platform::Instagram => &mut self.instagram,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &[String])> {
        Platform::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    pub fn fallback(reason: &str) -> Self {
        Self {
            facebook: vec![
                format!("Error generating Facebook posts: {reason}"),
                "Our content generation service is temporarily unavailable.".to_string(),
                "Please try again in a few minutes.".to_string(),
            ],
            twitter: vec![
                "🚧 Service Update".to_string(),
                "Content generation temporarily unavailable due to technical issues.".to_string(),
                "Please retry shortly.".to_string(),
            ],
            instagram: vec![
                "System Maintenance Notice 🔧".to_string(),
                "Content generation service disruption.".to_string(),
                "We'll be back soon! Try again later.".to_string(),
            ],
        }
    }
}
