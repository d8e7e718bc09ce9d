//! Line-oriented requirement list extraction
//!
//! Pulls discrete requirement items out of a Markdown-like requirements
//! document. The grammar is deliberately lenient: numbered lines, bullet
//! lines, and second-level headings all produce items, and a prose fallback
//! guarantees a non-empty result for any input with real content.

use super::RequirementItem;
use regex::Regex;

/// Minimum trimmed length for a prose line to count as a requirement in the
/// fallback pass
const FALLBACK_MIN_CHARS: usize = 10;

/// Parses a requirements document into an ordered list of items.
///
/// Line rules, first match wins:
/// 1. `<n>. <rest>` - numbered item, unless `<rest>` opens with `**`
///    (bold markup marks a label, not a requirement)
/// 2. `* <rest>` / `- <rest>` / `• <rest>` - bullet item, same `**` exclusion
/// 3. `## <heading>` - the heading text itself becomes an item, standing in
///    for a section separator
///
/// If no line matched, a recall-over-precision fallback runs: every
/// non-empty line not starting with `#` or `-` and longer than
/// 10 characters is taken verbatim.
pub fn parse_requirements(text: &str) -> Vec<RequirementItem> {
    let numbered = Regex::new(r"^(\d+)\.\s+(.*)$").unwrap();
    let bullet = Regex::new(r"^([*\-•])\s+(.*)$").unwrap();
    let heading = Regex::new(r"^##\s+(.*)$").unwrap();

    let mut items = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(caps) = numbered.captures(line) {
            let description = caps[2].trim();
            if !description.is_empty() && !description.starts_with("**") {
                items.push(RequirementItem::new(description));
            }
            continue;
        }

        if let Some(caps) = bullet.captures(line) {
            let description = caps[2].trim();
            if !description.is_empty() && !description.starts_with("**") {
                items.push(RequirementItem::new(description));
            }
            continue;
        }

        if let Some(caps) = heading.captures(line) {
            let section = caps[1].trim();
            if !section.is_empty() {
                items.push(RequirementItem::new(section));
            }
        }
    }

    if items.is_empty() {
        for raw in text.lines() {
            let line = raw.trim();
            if !line.is_empty()
                && !line.starts_with('#')
                && !line.starts_with('-')
                && line.chars().count() > FALLBACK_MIN_CHARS
            {
                items.push(RequirementItem::new(line));
            }
        }
    }

    items
}

/// Re-serializes a requirement list as bullet lines.
///
/// Parsing the output reproduces the same item texts, so edits survive a
/// round trip through the document form.
pub fn to_bullet_text(items: &[RequirementItem]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.text))
        .collect::<Vec<_>>()
        .join("\n")
}
