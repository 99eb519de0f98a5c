use chrono::{DateTime, Local};

use crate::models::{BusinessProfile, DescriptionSet};

/// Plain-text description document: header, profile summary, the three
/// descriptions, and a generation timestamp.
pub fn render_description_text(
    descriptions: &DescriptionSet,
    profile: &BusinessProfile,
    generated_at: DateTime<Local>,
) -> String {
    let rule = "-".repeat(50);
    format!(
        "{name} - Business Description\n\n\
         {rule}\n\n\
         Business Type: {business_type}\n\
         Location: {location}\n\
         Target Audience: {audience}\n\
         Style: {style}\n\n\
         {rule}\n\n\
         SHORT DESCRIPTION:\n{short}\n\n\n\
         MEDIUM DESCRIPTION:\n{medium}\n\n\n\
         LONG DESCRIPTION:\n{long}\n\n\n\
         {rule}\n\n\
         Generated on {stamp}\n",
        name = profile.name,
        business_type = profile.business_type,
        location = profile.location,
        audience = profile.target_audience,
        style = profile.style_preference,
        short = descriptions.short,
        medium = descriptions.medium,
        long = descriptions.long,
        stamp = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
