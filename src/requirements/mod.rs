//! Requirement extraction and response normalization
//!
//! The analysis service returns requirements either as preformatted text or
//! as loosely structured JSON. [`normalize`] renders both into stable
//! Markdown-like documents; [`parser`] then extracts a flat, ordered list of
//! discrete requirement items the caller can edit independently of the text.

mod normalize;
mod parser;

pub use normalize::{normalize_business, normalize_technical, strip_analysis_summary};
pub use parser::{parse_requirements, to_bullet_text};

use serde::{Deserialize, Serialize};

/// One discrete, user-editable requirement line.
///
/// Order within a list is presentation order only. Once parsed, the list is
/// the source of truth; edits never flow back into the document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementItem {
    pub text: String,
}

impl RequirementItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
