//! Topic names and their on-disk form.

use std::fmt;

/// Why a topic string cannot name a catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTopic {
    /// Nothing left after trimming.
    #[error("must not be empty")]
    Empty,

    /// Normalizes to `.`, `..` or similar.
    #[error("must contain more than dots")]
    Reserved,

    /// Longer than [`Topic::MAX_SLUG_LEN`] bytes once normalized.
    #[error("must be at most {} bytes", Topic::MAX_SLUG_LEN)]
    TooLong,
}

/// A case-normalized topic.
///
/// The slug doubles as the catalog's directory name: lowercase, whitespace
/// runs replaced by `_`, path separators and control characters replaced by
/// `_`. The display name renders `_` back as a space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic {
    slug: String,
}

impl Topic {
    /// Longest slug accepted, well under common file name limits.
    pub const MAX_SLUG_LEN: usize = 200;

    /// Normalize a caller-supplied topic.
    pub fn parse(raw: &str) -> Result<Self, InvalidTopic> {
        let slug: String = raw
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') || c.is_control() { '_' } else { c })
            .collect();

        Self::from_slug(slug)
    }

    /// Accept an existing directory name as-is.
    ///
    /// Used when enumerating the storage root; applies the same safety
    /// checks as [`Topic::parse`] without re-normalizing.
    pub fn from_slug(slug: impl Into<String>) -> Result<Self, InvalidTopic> {
        let slug = slug.into();

        if slug.is_empty() {
            return Err(InvalidTopic::Empty);
        }
        if slug.chars().all(|c| c == '.') {
            return Err(InvalidTopic::Reserved);
        }
        if slug.len() > Self::MAX_SLUG_LEN {
            return Err(InvalidTopic::TooLong);
        }
        if slug.contains(['/', '\\']) || slug.chars().any(char::is_control) {
            return Err(InvalidTopic::Reserved);
        }

        Ok(Self { slug })
    }

    /// Directory name of this topic's catalog.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Human-readable name, as reported by `list_topics`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.slug.replace('_', " ")
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
