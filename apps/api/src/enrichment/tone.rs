//! Tone calibration: maps the declared style preference to adjectives, voice,
//! and sentence style used in every generation prompt.

use serde::Serialize;

use crate::models::StylePreference;

/// Writing tone derived from a style preference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tone {
    pub adjectives: Vec<&'static str>,
    pub voice: &'static str,
    pub sentence_style: &'static str,
}

/// Returns the tone for a style. Only five styles carry a dedicated tone;
/// the rest, and any style outside the declared set, get the generic one.
pub fn tone_for(style: Option<StylePreference>) -> Tone {
    match style {
        Some(StylePreference::Modern) => Tone {
            adjectives: vec!["innovative", "cutting-edge", "sleek", "contemporary"],
            voice: "confident and forward-thinking",
            sentence_style: "concise and impactful",
        },
        Some(StylePreference::Classic) => Tone {
            adjectives: vec!["timeless", "traditional", "established", "trusted"],
            voice: "authoritative and refined",
            sentence_style: "well-structured and elegant",
        },
        Some(StylePreference::Bold) => Tone {
            adjectives: vec!["striking", "powerful", "dynamic", "fearless"],
            voice: "assertive and energetic",
            sentence_style: "direct and attention-grabbing",
        },
        Some(StylePreference::Minimal) => Tone {
            adjectives: vec!["clean", "essential", "streamlined", "uncluttered"],
            voice: "straightforward and precise",
            sentence_style: "simple and focused",
        },
        Some(StylePreference::Elegant) => Tone {
            adjectives: vec!["sophisticated", "refined", "luxurious", "graceful"],
            voice: "polished and sophisticated",
            sentence_style: "flowing and articulate",
        },
        _ => generic_tone(),
    }
}

pub fn generic_tone() -> Tone {
    Tone {
        adjectives: vec!["professional", "reliable", "quality", "dedicated"],
        voice: "friendly and professional",
        sentence_style: "clear and engaging",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_tone_is_forward_thinking() {
        let t = tone_for(Some(StylePreference::Modern));
        assert_eq!(t.voice, "confident and forward-thinking");
        assert!(t.adjectives.contains(&"sleek"));
    }

    #[test]
    fn test_elegant_tone_flows() {
        let t = tone_for(Some(StylePreference::Elegant));
        assert_eq!(t.sentence_style, "flowing and articulate");
    }

    #[test]
    fn test_declared_styles_without_table_entry_get_generic_tone() {
        for style in [
            StylePreference::Playful,
            StylePreference::Professional,
            StylePreference::Rustic,
            StylePreference::Luxurious,
            StylePreference::EcoFriendly,
        ] {
            assert_eq!(tone_for(Some(style)), generic_tone(), "{style:?}");
        }
    }

    #[test]
    fn test_unknown_style_gets_generic_tone() {
        let t = tone_for(None);
        assert_eq!(t.voice, "friendly and professional");
        assert_eq!(t.adjectives, vec!["professional", "reliable", "quality", "dedicated"]);
    }
}
