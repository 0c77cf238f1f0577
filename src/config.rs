use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{CONFIG_FILENAME, MAX_FILENAME_LENGTH};
use crate::error::ConfigError;
use crate::naming::{NamingPolicy, NamingScheme};
use crate::output::Channel;

/// Embedded default configuration, written when no configuration exists yet
pub(crate) const DEFAULT_CONFIG: &str = include_str!("../assets/gemini-prompt.toml");

/// Length of the "YYYYMMDD-HHMMSS" timestamp used as prefix/postfix
const TIMESTAMP_LEN: usize = 15;

/// Smallest bracketed core a history filename must be able to hold
const MIN_CORE_LEN: usize = 16;

/// Command line template per operating system
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OsCommand {
    pub(crate) macos: String,
    pub(crate) linux: String,
    pub(crate) windows: String,
    pub(crate) other: String,
}

impl OsCommand {
    /// Template for the running operating system
    pub(crate) fn current(&self) -> &str {
        match std::env::consts::OS {
            "macos" => &self.macos,
            "linux" => &self.linux,
            "windows" => &self.windows,
            _ => &self.other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Replacement {
    pub(crate) from: String,
    pub(crate) to: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiConfig {
    pub(crate) api_key: String,
    pub(crate) model: String,
    #[serde(default = "default_candidate_count")]
    pub(crate) candidate_count: i32,
    #[serde(default)]
    pub(crate) max_output_tokens: Option<i32>,
    #[serde(default)]
    pub(crate) temperature: Option<f32>,
    #[serde(default)]
    pub(crate) top_p: Option<f32>,
    #[serde(default)]
    pub(crate) top_k: Option<i32>,
    #[serde(default)]
    pub(crate) system_instruction: String,
    /// Seconds to wait for uploaded files to leave the processing state
    #[serde(default = "default_max_wait")]
    pub(crate) max_wait_file_processing: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelConfig {
    pub(crate) prompt_response_file: PathBuf,
    #[serde(default = "default_true")]
    pub(crate) rendering: bool,
    #[serde(default)]
    pub(crate) output: bool,
    #[serde(default)]
    pub(crate) output_application: OsCommand,
    #[serde(default)]
    pub(crate) history: bool,
    #[serde(default)]
    pub(crate) history_directory: PathBuf,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnsiConfig {
    #[serde(flatten)]
    pub(crate) channel: ChannelConfig,
    #[serde(default)]
    pub(crate) replace_colors: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HtmlConfig {
    #[serde(flatten)]
    pub(crate) channel: ChannelConfig,
    #[serde(default)]
    pub(crate) replace_elements: Vec<Replacement>,
    #[serde(default = "default_max_length_title")]
    pub(crate) max_length_title: usize,
    #[serde(default)]
    pub(crate) header: String,
    #[serde(default)]
    pub(crate) footer: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct InputConfig {
    pub(crate) terminal: bool,
    pub(crate) file: bool,
    pub(crate) file_path: PathBuf,
    pub(crate) localhost: bool,
    pub(crate) localhost_port: u16,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct NotifyConfig {
    pub(crate) prompt: bool,
    pub(crate) prompt_application: OsCommand,
    pub(crate) response: bool,
    pub(crate) response_application: OsCommand,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryConfig {
    #[serde(default = "default_schema")]
    pub(crate) filename_schema: NamingScheme,
    #[serde(default)]
    pub(crate) add_prefix: bool,
    #[serde(default)]
    pub(crate) add_postfix: bool,
    #[serde(default = "default_extension_markdown")]
    pub(crate) extension_markdown: String,
    #[serde(default = "default_extension_ansi")]
    pub(crate) extension_ansi: String,
    #[serde(default = "default_extension_html")]
    pub(crate) extension_html: String,
    #[serde(default = "default_max_filename_length")]
    pub(crate) max_filename_length: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            filename_schema: default_schema(),
            add_prefix: false,
            add_postfix: false,
            extension_markdown: default_extension_markdown(),
            extension_ansi: default_extension_ansi(),
            extension_html: default_extension_html(),
            max_filename_length: default_max_filename_length(),
        }
    }
}

impl HistoryConfig {
    pub(crate) fn policy(&self) -> NamingPolicy {
        NamingPolicy {
            scheme: self.filename_schema,
            add_prefix: self.add_prefix,
            add_postfix: self.add_postfix,
            max_length: self.max_filename_length,
        }
    }

    fn min_filename_length(&self) -> usize {
        let extension = [
            &self.extension_markdown,
            &self.extension_ansi,
            &self.extension_html,
        ]
        .iter()
        .map(|e| if e.is_empty() { 0 } else { e.len() + 1 })
        .max()
        .unwrap_or(0);
        let mut min = 2 + MIN_CORE_LEN + extension;
        if self.add_prefix {
            min += TIMESTAMP_LEN + 1;
        }
        if self.add_postfix {
            min += 1 + TIMESTAMP_LEN;
        }
        min
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GeneralConfig {
    pub(crate) internet_proxy: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    pub(crate) gemini: GeminiConfig,
    pub(crate) markdown: ChannelConfig,
    pub(crate) ansi: AnsiConfig,
    pub(crate) html: HtmlConfig,
    #[serde(default)]
    pub(crate) input: InputConfig,
    #[serde(default)]
    pub(crate) notify: NotifyConfig,
    #[serde(default)]
    pub(crate) history: HistoryConfig,
    #[serde(default)]
    pub(crate) general: GeneralConfig,
}

fn default_true() -> bool {
    true
}

fn default_candidate_count() -> i32 {
    1
}

fn default_max_wait() -> u64 {
    90
}

fn default_max_length_title() -> usize {
    64
}

fn default_schema() -> NamingScheme {
    NamingScheme::Prompt
}

fn default_extension_markdown() -> String {
    "md".to_string()
}

fn default_extension_ansi() -> String {
    "ansi".to_string()
}

fn default_extension_html() -> String {
    "html".to_string()
}

fn default_max_filename_length() -> usize {
    MAX_FILENAME_LENGTH
}

impl Config {
    /// Pick the configuration file: explicit path first, then the first
    /// existing well-known location, else the working directory default.
    pub(crate) fn locate(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        Self::get_config_paths()
            .into_iter()
            .find(|p| p.is_file())
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILENAME)];

        // XDG style: ~/.config/gemini-prompt/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("gemini-prompt").join("config.toml"));
        }

        // Platform config dir (e.g. ~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("gemini-prompt").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Write the embedded default configuration if `path` does not exist.
    /// Returns true when a new file was written.
    pub(crate) fn ensure_exists(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::WriteDefault {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::WriteDefault {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        config.gemini.api_key = resolve_secret("gemini.api_key", &config.gemini.api_key)?;
        if !config.general.internet_proxy.is_empty() {
            config.general.internet_proxy =
                resolve_secret("general.internet_proxy", &config.general.internet_proxy)?;
        }
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "gemini.api_key",
            });
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "gemini.model",
            });
        }
        if self.gemini.candidate_count <= 0 {
            return Err(ConfigError::NotPositive {
                field: "gemini.candidate_count",
            });
        }

        for channel in Channel::ALL {
            let settings = self.channel(channel);
            if settings.prompt_response_file.as_os_str().is_empty() {
                return Err(ConfigError::Missing {
                    field: match channel {
                        Channel::Markdown => "markdown.prompt_response_file",
                        Channel::Ansi => "ansi.prompt_response_file",
                        Channel::Html => "html.prompt_response_file",
                    },
                });
            }
            if settings.history && settings.history_directory.as_os_str().is_empty() {
                return Err(ConfigError::Missing {
                    field: match channel {
                        Channel::Markdown => "markdown.history_directory",
                        Channel::Ansi => "ansi.history_directory",
                        Channel::Html => "html.history_directory",
                    },
                });
            }
            if channel.launches_application()
                && settings.output
                && settings.output_application.current().trim().is_empty()
            {
                return Err(ConfigError::MissingCommand {
                    field: match channel {
                        Channel::Html => "html.output_application",
                        _ => "markdown.output_application",
                    },
                });
            }
        }

        if self.input.file && self.input.file_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "input.file_path",
            });
        }
        if self.input.localhost && self.input.localhost_port == 0 {
            return Err(ConfigError::NotPositive {
                field: "input.localhost_port",
            });
        }

        if self.notify.prompt && self.notify.prompt_application.current().trim().is_empty() {
            return Err(ConfigError::MissingCommand {
                field: "notify.prompt_application",
            });
        }
        if self.notify.response && self.notify.response_application.current().trim().is_empty() {
            return Err(ConfigError::MissingCommand {
                field: "notify.response_application",
            });
        }

        let min = self.history.min_filename_length();
        let value = self.history.max_filename_length;
        if value > MAX_FILENAME_LENGTH || value < min {
            return Err(ConfigError::FilenameLength { value, min });
        }

        Ok(())
    }

    pub(crate) fn channel(&self, channel: Channel) -> &ChannelConfig {
        match channel {
            Channel::Markdown => &self.markdown,
            Channel::Ansi => &self.ansi.channel,
            Channel::Html => &self.html.channel,
        }
    }

    pub(crate) fn extension(&self, channel: Channel) -> &str {
        match channel {
            Channel::Markdown => &self.history.extension_markdown,
            Channel::Ansi => &self.history.extension_ansi,
            Channel::Html => &self.history.extension_html,
        }
    }

    pub(crate) fn system_instruction(&self) -> Option<&str> {
        let instruction = self.gemini.system_instruction.trim();
        (!instruction.is_empty()).then_some(instruction)
    }
}

/// Resolve `pass:<value>`, `env:<VAR>` or `file:<path>` secret references
pub(crate) fn resolve_secret(field: &'static str, reference: &str) -> Result<String, ConfigError> {
    let Some((source, value)) = reference.split_once(':') else {
        return Err(ConfigError::SecretSource { field });
    };
    match source.to_ascii_lowercase().as_str() {
        "pass" => Ok(value.to_string()),
        "env" => match std::env::var(value) {
            Ok(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(ConfigError::SecretEnv {
                field,
                var: value.to_string(),
            }),
        },
        "file" => {
            let path = PathBuf::from(value);
            fs::read_to_string(&path)
                .ok()
                .and_then(|content| content.lines().next().map(|l| l.trim().to_string()))
                .filter(|line| !line.is_empty())
                .ok_or(ConfigError::SecretFile { field, path })
        }
        _ => Err(ConfigError::SecretSource { field }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const MINIMAL: &str = r#"
[gemini]
api_key = "pass:test-key"
model = "gemini-2.0-flash"

[markdown]
prompt_response_file = "prompt-response.md"

[ansi]
prompt_response_file = "prompt-response.ansi"

[html]
prompt_response_file = "prompt-response.html"
"#;

    fn parse(content: &str) -> Result<Config, ConfigError> {
        Config::parse(content, Path::new("test.toml"))
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse(MINIMAL).expect("config");
        assert_eq!(config.gemini.api_key, "test-key");
        assert_eq!(config.gemini.candidate_count, 1);
        assert!(config.ansi.channel.rendering);
        assert_eq!(config.history.filename_schema, NamingScheme::Prompt);
        assert_eq!(config.history.max_filename_length, 255);
        assert_eq!(config.extension(Channel::Html), "html");
        assert!(config.system_instruction().is_none());
    }

    #[test]
    fn embedded_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("default config");
        assert!(config.validate().is_ok());
        assert_eq!(config.gemini.api_key, "env:GEMINI_API_KEY");
    }

    #[test]
    fn unsupported_schema_fails_at_load() {
        let content = format!("{MINIMAL}\n[history]\nfilename_schema = \"uuid\"\n");
        let err = parse(&content).unwrap_err();
        assert!(
            err.to_string().contains("Unsupported history filename schema"),
            "{err}"
        );
    }

    #[test]
    fn zero_candidates_rejected() {
        let content = MINIMAL.replace(
            "model = \"gemini-2.0-flash\"",
            "model = \"gemini-2.0-flash\"\ncandidate_count = 0",
        );
        assert!(matches!(
            parse(&content),
            Err(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn history_without_directory_rejected() {
        let content = MINIMAL.replace(
            "prompt_response_file = \"prompt-response.md\"",
            "prompt_response_file = \"prompt-response.md\"\nhistory = true",
        );
        assert!(matches!(
            parse(&content),
            Err(ConfigError::Missing {
                field: "markdown.history_directory"
            })
        ));
    }

    #[test]
    fn output_without_application_rejected() {
        let content = MINIMAL.replace(
            "prompt_response_file = \"prompt-response.html\"",
            "prompt_response_file = \"prompt-response.html\"\noutput = true",
        );
        assert!(matches!(
            parse(&content),
            Err(ConfigError::MissingCommand { .. })
        ));
    }

    #[test]
    fn ansi_output_needs_no_application() {
        let content = MINIMAL.replace(
            "prompt_response_file = \"prompt-response.ansi\"",
            "prompt_response_file = \"prompt-response.ansi\"\noutput = true",
        );
        assert!(parse(&content).is_ok());
    }

    #[test]
    fn filename_length_bounds() {
        let too_long = format!("{MINIMAL}\n[history]\nmax_filename_length = 300\n");
        assert!(matches!(
            parse(&too_long),
            Err(ConfigError::FilenameLength { .. })
        ));
        let too_short = format!(
            "{MINIMAL}\n[history]\nadd_prefix = true\nadd_postfix = true\nmax_filename_length = 40\n"
        );
        assert!(matches!(
            parse(&too_short),
            Err(ConfigError::FilenameLength { .. })
        ));
    }

    #[test]
    fn secret_sources() {
        assert_eq!(resolve_secret("k", "pass:abc").unwrap(), "abc");
        assert_eq!(resolve_secret("k", "PASS:a:b").unwrap(), "a:b");
        assert!(matches!(
            resolve_secret("k", "plain"),
            Err(ConfigError::SecretSource { .. })
        ));
        assert!(matches!(
            resolve_secret("k", "env:GEMINI_PROMPT_SURELY_UNSET_VARIABLE"),
            Err(ConfigError::SecretEnv { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let key_file = dir.path().join("key.txt");
        fs::write(&key_file, "secret-line\nignored\n").unwrap();
        let reference = format!("file:{}", key_file.display());
        assert_eq!(resolve_secret("k", &reference).unwrap(), "secret-line");
    }

    #[test]
    fn ensure_exists_writes_default_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gemini-prompt.toml");
        assert!(Config::ensure_exists(&path).unwrap());
        assert!(!Config::ensure_exists(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
