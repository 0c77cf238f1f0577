//! Gemini service access: REST client, payload types and file uploads

mod client;
pub(crate) mod types;
pub(crate) mod upload;

use std::path::Path;

use crate::error::GeminiError;

pub(crate) use client::GeminiClient;
pub(crate) use types::{AttachedFile, GenerateRequest, GenerateResponse, GenerationConfig, ModelInfo};

/// The single remote operation the pipeline depends on
pub(crate) trait Generator {
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GeminiError>;
}

/// Remote file lifecycle: upload, poll, release
pub(crate) trait FileStore {
    fn upload(&self, path: &Path, mime_type: &str) -> Result<AttachedFile, GeminiError>;
    fn get_file(&self, name: &str) -> Result<AttachedFile, GeminiError>;
    fn delete_file(&self, name: &str) -> Result<(), GeminiError>;
}
