use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use super::types::{AttachedFile, GenerateRequest, GenerateResponse, ModelInfo, ModelList, UploadResponse};
use super::{FileStore, Generator};
use crate::error::GeminiError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const UPLOAD_BASE: &str = "https://generativelanguage.googleapis.com/upload/v1beta/files";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Blocking client for the Gemini REST API
pub(crate) struct GeminiClient {
    agent: Agent,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub(crate) fn new(api_key: &str, model: &str, proxy: Option<&str>) -> Result<Self, GeminiError> {
        let proxy = proxy
            .filter(|p| !p.trim().is_empty())
            .map(ureq::Proxy::new)
            .transpose()?;
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .proxy(proxy)
            .build()
            .into();

        Ok(GeminiClient {
            agent,
            api_key: api_key.to_string(),
            model: model.trim_start_matches("models/").to_string(),
        })
    }

    pub(crate) fn model_info(&self) -> Result<ModelInfo, GeminiError> {
        let url = format!("{API_BASE}/models/{}", self.model);
        let response = self
            .agent
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .call()?;
        decode(response)
    }

    /// All models, following `nextPageToken` until exhausted
    pub(crate) fn list_models(&self) -> Result<Vec<ModelInfo>, GeminiError> {
        let url = format!("{API_BASE}/models");
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .agent
                .get(&url)
                .header("x-goog-api-key", &self.api_key)
                .query("pageSize", "100");
            if let Some(token) = &page_token {
                request = request.query("pageToken", token);
            }
            let page: ModelList = decode(request.call()?)?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

impl Generator for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GeminiError> {
        let url = format!("{API_BASE}/models/{}:generateContent", self.model);
        tracing::debug!(model = self.model.as_str(), "sending generateContent request");
        let response = self
            .agent
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .send_json(request)?;
        decode(response)
    }
}

impl FileStore for GeminiClient {
    /// Resumable upload: announce size and type, then send all bytes and finalize.
    fn upload(&self, path: &Path, mime_type: &str) -> Result<AttachedFile, GeminiError> {
        let data = fs::read(path).map_err(|source| GeminiError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let display_name = path.display().to_string();

        let start = self
            .agent
            .post(UPLOAD_BASE)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", &data.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .send_json(serde_json::json!({ "file": { "display_name": display_name } }))?;
        let start = check_status(start)?;
        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| GeminiError::MissingUploadUrl(display_name.clone()))?;

        tracing::debug!(file = display_name.as_str(), bytes = data.len(), "uploading file");
        let response = self
            .agent
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .send(&data[..])?;
        let uploaded: UploadResponse = decode(response)?;
        Ok(uploaded.file)
    }

    fn get_file(&self, name: &str) -> Result<AttachedFile, GeminiError> {
        let url = format!("{API_BASE}/{name}");
        let response = self
            .agent
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .call()?;
        decode(response)
    }

    fn delete_file(&self, name: &str) -> Result<(), GeminiError> {
        let url = format!("{API_BASE}/{name}");
        let response = self
            .agent
            .delete(&url)
            .header("x-goog-api-key", &self.api_key)
            .call()?;
        check_status(response).map(|_| ())
    }
}

/// Turn a non-success status into an API error carrying the service message
fn check_status(response: Response<ureq::Body>) -> Result<Response<ureq::Body>, GeminiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.into_body().read_to_string().unwrap_or_default();
    Err(GeminiError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

fn decode<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, GeminiError> {
    let body = check_status(response)?.into_body().read_to_string()?;
    serde_json::from_str(&body).map_err(|e| GeminiError::Decode(e.to_string()))
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.trim().is_empty() => "no error details returned".to_string(),
        _ => body.trim().to_string(),
    }
}
