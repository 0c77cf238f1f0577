use chrono::{DateTime, TimeZone};
use serde::Deserialize;
use std::fmt::Display;

use crate::consts::TIMESTAMP_FORMAT;
use crate::error::ConfigError;

use super::sanitize::prompt_to_filename;

/// How history files are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub(crate) enum NamingScheme {
    /// `YYYYMMDD-HHMMSS[.ext]`
    Timestamp,
    /// Sanitized prompt, optionally framed by timestamps
    Prompt,
}

impl TryFrom<String> for NamingScheme {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "timestamp" => Ok(NamingScheme::Timestamp),
            "prompt" => Ok(NamingScheme::Prompt),
            _ => Err(ConfigError::UnsupportedSchema { input: value }),
        }
    }
}

impl NamingScheme {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            NamingScheme::Timestamp => "timestamp",
            NamingScheme::Prompt => "prompt",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct NamingPolicy {
    pub(crate) scheme: NamingScheme,
    pub(crate) add_prefix: bool,
    pub(crate) add_postfix: bool,
    pub(crate) max_length: usize,
}

impl NamingPolicy {
    /// Build the history filename for a prompt completed at `now`.
    ///
    /// Identical prompts within the same second collide under the `prompt`
    /// scheme when neither prefix nor postfix is enabled; the later copy wins.
    pub(crate) fn build_name<Tz>(&self, now: &DateTime<Tz>, prompt: &str, extension: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        match self.scheme {
            NamingScheme::Timestamp => {
                if extension.is_empty() {
                    timestamp
                } else {
                    format!("{timestamp}.{extension}")
                }
            }
            NamingScheme::Prompt => {
                let prefix = if self.add_prefix { timestamp.as_str() } else { "" };
                let postfix = if self.add_postfix { timestamp.as_str() } else { "" };
                prompt_to_filename(prompt, self.max_length, prefix, postfix, extension)
            }
        }
    }
}
