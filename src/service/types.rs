//! Wire shapes for the modernization service
//!
//! Request field casing is mixed on the wire (camelCase and snake_case side
//! by side); the serde renames pin the exact names the service expects.
//! Response fields all default so a sparse payload decodes instead of
//! failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Body of `POST /analyze-requirements`
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "sourceLanguage")]
    pub source_language: String,
    #[serde(rename = "targetLanguage")]
    pub target_language: String,
    /// File name to content, every uploaded file
    pub file_data: HashMap<String, String>,
    #[serde(rename = "projectId")]
    pub project_id: String,
}

/// Body of `POST /convert`
#[derive(Debug, Clone, Serialize)]
pub struct ConvertRequest {
    #[serde(rename = "sourceLanguage")]
    pub source_language: String,
    #[serde(rename = "targetLanguage")]
    pub target_language: String,
    #[serde(rename = "sourceCode")]
    pub source_code: HashMap<String, String>,
    #[serde(rename = "projectId")]
    pub project_id: String,
    /// Name of the first uploaded source file
    #[serde(rename = "cobolFilename")]
    pub cobol_filename: String,
}

/// Response of `POST /upload-cobol-files`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub project_id: Option<String>,
}

/// Response of `POST /analyze-requirements`.
///
/// The requirement payloads are kept as raw JSON; their shape varies between
/// runs and is resolved downstream by the normalizer.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub business_requirements: Value,
    #[serde(default)]
    pub technical_requirements: Value,
}

impl Default for AnalysisResponse {
    fn default() -> Self {
        Self {
            project_id: None,
            business_requirements: Value::Null,
            technical_requirements: Value::Null,
        }
    }
}

/// One generated source unit inside a conversion response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertedUnit {
    #[serde(default)]
    pub content: String,
}

/// Response of `POST /convert`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversionResponse {
    /// Generated files, name to content
    #[serde(default)]
    pub files: HashMap<String, String>,
    #[serde(default)]
    pub converted_code: Vec<ConvertedUnit>,
    #[serde(default)]
    pub unit_tests: String,
    #[serde(default)]
    pub functional_tests: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analyze_request_wire_names() {
        let request = AnalyzeRequest {
            source_language: "COBOL".to_string(),
            target_language: "C#".to_string(),
            file_data: HashMap::from([("A.cbl".to_string(), "code".to_string())]),
            project_id: "p-1".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sourceLanguage"], "COBOL");
        assert_eq!(value["targetLanguage"], "C#");
        assert_eq!(value["file_data"]["A.cbl"], "code");
        assert_eq!(value["projectId"], "p-1");
    }

    #[test]
    fn test_convert_request_wire_names() {
        let request = ConvertRequest {
            source_language: "COBOL".to_string(),
            target_language: "C#".to_string(),
            source_code: HashMap::new(),
            project_id: "p-1".to_string(),
            cobol_filename: "A.cbl".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sourceCode"], json!({}));
        assert_eq!(value["cobolFilename"], "A.cbl");
    }

    #[test]
    fn test_sparse_analysis_response_decodes() {
        let response: AnalysisResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.project_id.is_none());
        assert!(response.business_requirements.is_null());
        assert!(response.technical_requirements.is_null());
    }

    #[test]
    fn test_sparse_conversion_response_decodes() {
        let response: ConversionResponse = serde_json::from_value(json!({
            "converted_code": [{ "content": "class Program {}" }]
        }))
        .unwrap();
        assert!(response.files.is_empty());
        assert_eq!(response.converted_code[0].content, "class Program {}");
        assert!(response.unit_tests.is_empty());
    }
}
