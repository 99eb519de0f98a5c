//! Heuristic parsers that split a free-text model reply into labeled fields.
//!
//! The email and social parsers are line scanners with an explicit state
//! machine: a marker line flushes the pending block, and the last block is
//! flushed at end of input so it is never dropped.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{DescriptionSet, EmailKind, EmailSet, EmailTemplate, Platform, SocialPosts};

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Failed to parse generated content properly")]
    NoDescriptions,

    #[error("Failed to generate all email templates (missing: {})", .0.join(", "))]
    MissingEmailTemplates(Vec<&'static str>),

    #[error("Failed to generate posts for all platforms (missing: {})", .0.join(", "))]
    MissingPlatforms(Vec<&'static str>),
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Text after the first colon on the line, or empty when there is none.
fn after_colon(line: &str) -> String {
    line.split_once(':')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Descriptions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum DescriptionSlot {
    Short,
    Medium,
    Long,
}

impl DescriptionSlot {
    /// First matching label wins; a section never fills two slots.
    fn detect(lower: &str) -> Option<Self> {
        let has_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));
        if has_any(&["1.", "short", "50-word"]) {
            Some(Self::Short)
        } else if has_any(&["2.", "medium", "150-word"]) {
            Some(Self::Medium)
        } else if has_any(&["3.", "long", "comprehensive", "300-word"]) {
            Some(Self::Long)
        } else {
            None
        }
    }

    fn numeral(self) -> char {
        match self {
            Self::Short => '1',
            Self::Medium => '2',
            Self::Long => '3',
        }
    }
}

/// Splits a reply into short/medium/long descriptions.
///
/// Fails only when no slot could be filled. A partial result keeps its empty
/// slots; they are not replaced by fallback text here.
pub fn parse_descriptions(text: &str) -> Result<DescriptionSet, ParseError> {
    let mut set = DescriptionSet::default();

    for section in normalize_newlines(text).split("\n\n") {
        let section = section.trim();
        let Some(slot) = DescriptionSlot::detect(&section.to_lowercase()) else {
            continue;
        };

        let numeral = slot.numeral();
        let value = if section.contains(':') {
            after_colon(section)
        } else {
            section
                .trim_start_matches(|c| c == numeral || c == '.')
                .trim()
                .to_string()
        };

        match slot {
            DescriptionSlot::Short => set.short = value,
            DescriptionSlot::Medium => set.medium = value,
            DescriptionSlot::Long => set.long = value,
        }
    }

    for slot in [&mut set.short, &mut set.medium, &mut set.long] {
        *slot = slot
            .trim_start_matches(|c| matches!(c, '1' | '2' | '3' | '.'))
            .trim()
            .to_string();
    }

    if set.is_empty() {
        return Err(ParseError::NoDescriptions);
    }
    Ok(set)
}

// ────────────────────────────────────────────────────────────────────────────
// Emails
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum EmailField {
    Subject,
    Body,
}

fn email_marker(lower: &str) -> Option<EmailKind> {
    if lower.contains("welcome") {
        Some(EmailKind::Welcome)
    } else if lower.contains("promotional") || lower.contains("special offer") {
        Some(EmailKind::Promotional)
    } else if lower.contains("newsletter") {
        Some(EmailKind::Newsletter)
    } else {
        None
    }
}

#[derive(Debug, Default)]
struct EmailScanner {
    current: Option<EmailKind>,
    field: Option<EmailField>,
    subject: String,
    body: String,
    templates: HashMap<EmailKind, EmailTemplate>,
}

impl EmailScanner {
    fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let lower = line.to_lowercase();

        let marker = email_marker(&lower);
        if let Some(kind) = marker {
            self.flush();
            self.current = Some(kind);
            self.field = None;
            self.subject.clear();
            self.body.clear();
        }

        // A marker line may also carry the subject, e.g. "Subject: Welcome aboard!"
        if lower.contains("subject") {
            self.field = Some(EmailField::Subject);
            self.subject = after_colon(line);
        } else if lower.contains("body") || lower.contains("content") {
            self.field = Some(EmailField::Body);
            self.body = after_colon(line);
        } else if marker.is_none() && self.field == Some(EmailField::Body) {
            if !self.body.is_empty() {
                self.body.push('\n');
            }
            self.body.push_str(line);
        }
    }

    /// Stores the pending template when both subject and body were captured.
    fn flush(&mut self) {
        if let Some(kind) = self.current {
            if !self.subject.is_empty() && !self.body.is_empty() {
                self.templates.insert(
                    kind,
                    EmailTemplate::new(self.subject.clone(), self.body.clone()),
                );
            }
        }
    }

    fn finish(mut self) -> Result<EmailSet, ParseError> {
        self.flush();

        let missing: Vec<&'static str> = EmailKind::ALL
            .into_iter()
            .filter(|k| !self.templates.contains_key(k))
            .map(EmailKind::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ParseError::MissingEmailTemplates(missing));
        }

        let mut take = |k: EmailKind| self.templates.remove(&k).unwrap_or_default();
        Ok(EmailSet {
            welcome: take(EmailKind::Welcome),
            promotional: take(EmailKind::Promotional),
            newsletter: take(EmailKind::Newsletter),
        })
    }
}

/// Splits a reply into welcome/promotional/newsletter templates.
/// Succeeds only when all three templates have a subject and a body.
pub fn parse_emails(text: &str) -> Result<EmailSet, ParseError> {
    let mut scanner = EmailScanner::default();
    for line in normalize_newlines(text).lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Social posts
// ────────────────────────────────────────────────────────────────────────────

fn platform_marker(lower: &str) -> Option<Platform> {
    if lower.contains("facebook") {
        Some(Platform::Facebook)
    } else if lower.contains("twitter") || lower.contains("x:") {
        Some(Platform::Twitter)
    } else if lower.contains("instagram") {
        Some(Platform::Instagram)
    } else {
        None
    }
}

fn is_post_item(line: &str) -> bool {
    line.starts_with('-') || line.starts_with('*') || line.starts_with(|c: char| c.is_ascii_digit())
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '.' | ' ') || c.is_ascii_digit())
        .trim()
}

#[derive(Debug, Default)]
struct SocialScanner {
    current: Option<Platform>,
    pending: Vec<String>,
    posts: SocialPosts,
}

impl SocialScanner {
    fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some(platform) = platform_marker(&line.to_lowercase()) {
            self.flush();
            self.current = Some(platform);
        } else if self.current.is_some() && is_post_item(line) {
            let post = strip_bullet(line);
            if !post.is_empty() {
                self.pending.push(post.to_string());
            }
        }
    }

    fn flush(&mut self) {
        if let Some(platform) = self.current {
            if !self.pending.is_empty() {
                *self.posts.get_mut(platform) = std::mem::take(&mut self.pending);
            }
        }
        self.pending.clear();
    }

    fn finish(mut self) -> Result<SocialPosts, ParseError> {
        self.flush();

        let missing: Vec<&'static str> = self
            .posts
            .iter()
            .filter(|(_, posts)| posts.is_empty())
            .map(|(p, _)| p.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ParseError::MissingPlatforms(missing));
        }
        Ok(self.posts)
    }
}

/// Splits a reply into per-platform post lists.
/// Succeeds only when every platform has at least one post.
pub fn parse_social_posts(text: &str) -> Result<SocialPosts, ParseError> {
    let mut scanner = SocialScanner::default();
    for line in normalize_newlines(text).lines() {
        scanner.feed(line);
    }
    scanner.finish()
}
