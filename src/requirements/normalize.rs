//! Normalization of loosely structured analysis responses
//!
//! The analysis service may return requirements as plain text, or as nested
//! JSON whose exact shape varies between runs. This module renders every
//! known shape into a stable Markdown-like document, attempting each decode
//! in a fixed priority order and falling back to deterministic generic
//! content when nothing recognizable is present.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Business-requirement sections in their fixed rendering order, each with
/// the sub-fields the service is known to emit and the bullet label used
/// when rendering them.
const BUSINESS_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Overview",
        &[
            ("Purpose of the System", "Purpose"),
            ("Context and Business Impact", "Business Impact"),
        ],
    ),
    (
        "Objectives",
        &[
            ("Primary Objective", "Primary Objective"),
            ("Key Outcomes", "Key Outcomes"),
        ],
    ),
    (
        "Business Rules & Requirements",
        &[
            ("Business Purpose", "Business Purpose"),
            ("Business Rules", "Business Rules"),
            ("Impact on System", "System Impact"),
            ("Constraints", "Constraints"),
        ],
    ),
    (
        "Assumptions & Recommendations",
        &[
            ("Assumptions", "Assumptions"),
            ("Recommendations", "Recommendations"),
        ],
    ),
    (
        "Expected Output",
        &[
            ("Output", "Output"),
            ("Business Significance", "Business Significance"),
        ],
    ),
];

/// A requirement descriptor as emitted under `technicalRequirements`
#[derive(Debug, Deserialize)]
struct TechnicalRequirement {
    #[serde(default)]
    description: String,
    complexity: Option<String>,
}

/// A challenge entry as emitted under `Technical_Challenges`
#[derive(Debug, Deserialize)]
struct TechnicalChallenge {
    #[serde(default)]
    description: String,
}

/// An integration entry as emitted under `Integration_Requirements`
#[derive(Debug, Deserialize)]
struct IntegrationRequirement {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

/// Renders the business-requirements payload into document text.
///
/// Strings pass through unchanged. Structured payloads render in the fixed
/// section order, emitting only sections and sub-fields that are present.
/// An absent payload yields empty text.
pub fn normalize_business(payload: &Value) -> String {
    match payload {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        _ => {
            let mut out = String::from("# Business Requirements\n\n");
            for (section, fields) in BUSINESS_SECTIONS {
                let Some(body) = payload.get(section) else {
                    continue;
                };
                out.push_str(&format!("## {}\n", section));
                for (key, label) in *fields {
                    if let Some(value) = body.get(key) {
                        out.push_str(&format!("- **{}:** {}\n", label, field_text(value)));
                    }
                }
                out.push('\n');
            }
            out
        }
    }
}

/// Renders the technical-requirements payload into document text.
///
/// Strings pass through unchanged. Structured payloads are decoded against
/// the known array shapes in priority order; if no numbered item results,
/// five generic fallback requirements are appended so the downstream parser
/// always has something actionable. An absent payload yields empty text.
pub fn normalize_technical(payload: &Value, source_language: &str, target_language: &str) -> String {
    match payload {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        _ => {
            let mut out = String::from("# Technical Requirements\n\n");
            let mut count = 0usize;

            if let Some(reqs) = decode_array::<TechnicalRequirement>(payload, "technicalRequirements")
            {
                for (i, req) in reqs.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. {} (Complexity: {})\n\n",
                        i + 1,
                        req.description,
                        req.complexity.as_deref().unwrap_or("Medium")
                    ));
                }
                count = reqs.len();
            } else if let Some(challenges) =
                decode_array::<TechnicalChallenge>(payload, "Technical_Challenges")
            {
                for (i, challenge) in challenges.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. The system must {}\n\n",
                        i + 1,
                        challenge.description
                    ));
                }
                count = challenges.len();
            } else if let Some(integrations) =
                decode_array::<IntegrationRequirement>(payload, "Integration_Requirements")
            {
                for (i, integration) in integrations.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. The system must integrate with {} for {}\n\n",
                        i + 1,
                        integration.name,
                        integration.description
                    ));
                }
                count = integrations.len();
            }

            if count == 0 {
                debug!("no recognized technical-requirement shape, using generic fallback");
                out.push_str(&fallback_requirements(source_language, target_language));
            }
            out
        }
    }
}

/// The five generic requirements used when the service returns no
/// recognizable technical-requirement shape
fn fallback_requirements(source_language: &str, target_language: &str) -> String {
    format!(
        "1. The system must migrate from {src} to {tgt} while preserving all business logic (Complexity: High)\n\n\
         2. The system must implement proper error handling using modern exception handling (Complexity: Medium)\n\n\
         3. The system must replace legacy file handling with a modern persistence layer (Complexity: Medium)\n\n\
         4. The system must implement proper input validation (Complexity: Low)\n\n\
         5. The system must follow {tgt} naming conventions and coding standards (Complexity: Low)\n\n",
        src = source_language,
        tgt = target_language,
    )
}

/// Drops everything from a "Comprehensive Analysis Summary" heading onward.
/// The summary is service-internal commentary, not requirements content.
pub fn strip_analysis_summary(text: &str) -> String {
    let mut kept = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("## Comprehensive Analysis Summary")
            || trimmed.starts_with("## Comprehensive analysis")
        {
            break;
        }
        kept.push(line);
    }
    kept.join("\n")
}

fn decode_array<T: DeserializeOwned>(payload: &Value, key: &str) -> Option<Vec<T>> {
    let array = payload.get(key)?;
    if !array.is_array() {
        return None;
    }
    match serde_json::from_value(array.clone()) {
        Ok(items) => Some(items),
        Err(err) => {
            debug!(key, error = %err, "technical requirement array failed to decode");
            None
        }
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
