//! Gemini REST API payloads (v1beta)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Processing state of an uploaded file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum FileState {
    Processing,
    Active,
    Failed,
    #[default]
    #[serde(other)]
    StateUnspecified,
}

impl FileState {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FileState::Processing => "processing",
            FileState::Active => "active",
            FileState::Failed => "failed",
            FileState::StateUnspecified => "unspecified",
        }
    }
}

/// A file transferred to the service, referenced by every prompt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttachedFile {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) mime_type: String,
    #[serde(default, deserialize_with = "int_from_string")]
    pub(crate) size_bytes: u64,
    #[serde(default)]
    pub(crate) update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) uri: String,
    #[serde(default)]
    pub(crate) state: FileState,
}

impl AttachedFile {
    pub(crate) fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state == FileState::Active
    }
}

/// int64 values arrive as JSON strings
fn int_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom("negative size")),
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("unexpected size {other}"))),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub(crate) file: AttachedFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelInfo {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) base_model_id: String,
    #[serde(default)]
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) input_token_limit: u64,
    #[serde(default)]
    pub(crate) output_token_limit: u64,
    #[serde(default)]
    pub(crate) supported_generation_methods: Vec<String>,
    #[serde(default)]
    pub(crate) temperature: Option<f64>,
    #[serde(default)]
    pub(crate) max_temperature: Option<f64>,
    #[serde(default)]
    pub(crate) top_p: Option<f64>,
    #[serde(default)]
    pub(crate) top_k: Option<u64>,
}

impl ModelInfo {
    /// Model name without the "models/" resource prefix
    pub(crate) fn short_name(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }

    pub(crate) fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelList {
    #[serde(default)]
    pub(crate) models: Vec<ModelInfo>,
    #[serde(default)]
    pub(crate) next_page_token: Option<String>,
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) candidate_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) top_k: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileReference {
    pub(crate) mime_type: String,
    pub(crate) file_uri: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub(crate) enum RequestPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    FileData {
        file_data: FileReference,
    },
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<&'static str>,
    pub(crate) parts: Vec<RequestPart>,
}

/// Body of a `generateContent` call; one user turn, no chat history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub(crate) contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) system_instruction: Option<RequestContent>,
    pub(crate) generation_config: GenerationConfig,
}

impl GenerateRequest {
    /// Build a single-turn request. Only active files are referenced;
    /// they precede the prompt text.
    pub(crate) fn new(
        prompt: &str,
        files: &[AttachedFile],
        system_instruction: Option<&str>,
        generation_config: GenerationConfig,
    ) -> Self {
        let mut parts: Vec<RequestPart> = files
            .iter()
            .filter(|f| f.is_active())
            .map(|f| RequestPart::FileData {
                file_data: FileReference {
                    mime_type: f.mime_type.clone(),
                    file_uri: f.uri.clone(),
                },
            })
            .collect();
        parts.push(RequestPart::Text {
            text: prompt.to_string(),
        });

        GenerateRequest {
            contents: vec![RequestContent {
                role: Some("user"),
                parts,
            }],
            system_instruction: system_instruction.map(|text| RequestContent {
                role: None,
                parts: vec![RequestPart::Text {
                    text: text.to_string(),
                }],
            }),
            generation_config,
        }
    }
}

/// One piece of candidate content
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawPart")]
pub(crate) enum Part {
    Text(String),
    FileData { uri: String, mime_type: String },
    /// Any part kind this program does not render (function calls, inline data, ...)
    Unsupported(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    text: Option<String>,
    file_data: Option<RawFileData>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFileData {
    #[serde(default)]
    file_uri: String,
    #[serde(default)]
    mime_type: String,
}

impl From<RawPart> for Part {
    fn from(raw: RawPart) -> Self {
        if let Some(text) = raw.text {
            return Part::Text(text);
        }
        if let Some(file) = raw.file_data {
            return Part::FileData {
                uri: file.file_uri,
                mime_type: file.mime_type,
            };
        }
        let kind = raw
            .rest
            .keys()
            .find(|k| k.as_str() != "thought" && k.as_str() != "thoughtSignature")
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        Part::Unsupported(kind)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub(crate) parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CitationSource {
    #[serde(default)]
    pub(crate) uri: Option<String>,
    #[serde(default)]
    pub(crate) license: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CitationMetadata {
    #[serde(default)]
    pub(crate) citation_sources: Vec<CitationSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub(crate) content: Option<Content>,
    /// Raw API value, e.g. "STOP", "MAX_TOKENS", "SAFETY"
    #[serde(default)]
    pub(crate) finish_reason: Option<String>,
    #[serde(default)]
    pub(crate) citation_metadata: Option<CitationMetadata>,
}

impl Candidate {
    pub(crate) fn finished_normally(&self) -> bool {
        self.finish_reason.as_deref() == Some("STOP")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsageMetadata {
    #[serde(default)]
    pub(crate) prompt_token_count: u64,
    #[serde(default)]
    pub(crate) candidates_token_count: u64,
    #[serde(default)]
    pub(crate) total_token_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    #[serde(default)]
    pub(crate) block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
    #[serde(default)]
    pub(crate) usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    pub(crate) prompt_feedback: Option<PromptFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_decode_into_sum_type() {
        let content: Content = serde_json::from_str(
            r#"{"parts":[
                {"text":"Hello"},
                {"fileData":{"fileUri":"https://x/files/abc","mimeType":"image/png"}},
                {"functionCall":{"name":"f","args":{}}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            content.parts,
            [
                Part::Text("Hello".to_string()),
                Part::FileData {
                    uri: "https://x/files/abc".to_string(),
                    mime_type: "image/png".to_string()
                },
                Part::Unsupported("functionCall".to_string()),
            ]
        );
    }

    #[test]
    fn attached_file_sizes_arrive_as_strings() {
        let file: AttachedFile = serde_json::from_str(
            r#"{"name":"files/abc","displayName":"notes.txt","mimeType":"text/plain",
                "sizeBytes":"2048","updateTime":"2025-03-02T14:05:09.123456Z",
                "uri":"https://x/files/abc","state":"ACTIVE"}"#,
        )
        .unwrap();
        assert_eq!(file.size_bytes, 2048);
        assert!((file.size_kib() - 2.0).abs() < f64::EPSILON);
        assert!(file.is_active());
        assert!(file.update_time.is_some());
    }

    #[test]
    fn unknown_file_state_is_unspecified() {
        let file: AttachedFile =
            serde_json::from_str(r#"{"name":"files/x","state":"ARCHIVED"}"#).unwrap();
        assert_eq!(file.state, FileState::StateUnspecified);
    }

    #[test]
    fn generation_config_skips_unset_values() {
        let config = GenerationConfig {
            candidate_count: Some(2),
            temperature: Some(0.5),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"candidateCount": 2, "temperature": 0.5}));
    }

    #[test]
    fn request_references_only_active_files() {
        let files = [
            AttachedFile {
                name: "files/a".to_string(),
                mime_type: "text/plain".to_string(),
                uri: "https://x/files/a".to_string(),
                state: FileState::Active,
                ..Default::default()
            },
            AttachedFile {
                name: "files/b".to_string(),
                state: FileState::Failed,
                ..Default::default()
            },
        ];
        let request =
            GenerateRequest::new("Summarize", &files, Some("Be brief"), GenerationConfig::default());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"fileData": {"mimeType": "text/plain", "fileUri": "https://x/files/a"}},
                        {"text": "Summarize"}
                    ]
                }],
                "systemInstruction": {"parts": [{"text": "Be brief"}]},
                "generationConfig": {}
            })
        );
    }

    #[test]
    fn model_short_name() {
        let info = ModelInfo {
            name: "models/gemini-2.0-flash".to_string(),
            ..Default::default()
        };
        assert_eq!(info.short_name(), "gemini-2.0-flash");
    }
}
