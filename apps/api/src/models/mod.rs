pub mod business;
pub mod content;
pub mod image;

pub use business::{BusinessForm, BusinessProfile, BusinessType, StylePreference};
pub use content::{
    DescriptionSet, EmailKind, EmailSet, EmailTemplate, GeneratedContent, Platform, SocialPosts,
};
pub use image::{ImageResult, ImageSource};
