use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Gemini(#[from] GeminiError),

    #[error("Failed to {action} \"{}\": {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Failed to read configuration file \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write default configuration file \"{}\": {source}", path.display())]
    WriteDefault {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file \"{}\": {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Empty {field} not allowed")]
    Missing { field: &'static str },

    #[error("Empty operating system specific {field} not allowed")]
    MissingCommand { field: &'static str },

    #[error("Unsupported history filename schema \"{input}\" (expected \"timestamp\" or \"prompt\")")]
    UnsupportedSchema { input: String },

    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },

    #[error("max_filename_length {value} not in range {min}..=255")]
    FilenameLength { value: usize, min: usize },

    #[error("Invalid secret reference for {field} (expected 'pass:', 'env:' or 'file:')")]
    SecretSource { field: &'static str },

    #[error("Secret for {field} is empty or environment variable {var} is not set")]
    SecretEnv { field: &'static str, var: String },

    #[error("Unable to read secret for {field} from \"{}\"", path.display())]
    SecretFile { field: &'static str, path: PathBuf },
}

#[derive(Debug, Error)]
pub(crate) enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Gemini API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode Gemini response: {0}")]
    Decode(String),

    #[error("Failed to read \"{}\": {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Upload of \"{0}\" was not acknowledged with an upload URL")]
    MissingUploadUrl(String),
}

#[derive(Debug, Error)]
pub(crate) enum CommandError {
    #[error("Empty command line")]
    Empty,

    #[error("Failed to run [{command}]: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Command [{command}] exited with {status}")]
    Failed { command: String, status: String },
}
