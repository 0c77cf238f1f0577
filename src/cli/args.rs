//! CLI argument definitions
//!
//! Command line options and how they override the configuration file.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "gemini-prompt")]
#[command(
    about = "Send prompts and files to Google Gemini, render and archive the responses",
    version
)]
pub(crate) struct Cli {
    /// Configuration file (default: ./gemini-prompt.toml, then the user config dirs)
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Number of response candidates
    #[arg(long, value_name = "N")]
    pub(crate) candidates: Option<i32>,

    /// Sampling temperature
    #[arg(long, value_name = "F")]
    pub(crate) temperature: Option<f32>,

    /// Nucleus sampling probability
    #[arg(long, value_name = "F")]
    pub(crate) topp: Option<f32>,

    /// Top-k sampling
    #[arg(long, value_name = "N")]
    pub(crate) topk: Option<i32>,

    /// Maximum number of output tokens
    #[arg(long, value_name = "N")]
    pub(crate) maxtokens: Option<i32>,

    /// File listing files to attach, one per line ('#' starts a comment)
    #[arg(long, value_name = "PATH")]
    pub(crate) uploads: Option<PathBuf>,

    /// Files to attach (glob patterns allowed)
    #[arg(value_name = "FILES")]
    pub(crate) files: Vec<String>,

    /// Show the files that would be attached, then exit
    #[arg(long)]
    pub(crate) dryrun: bool,

    /// List models supporting content generation, then exit
    #[arg(long)]
    pub(crate) models: bool,

    /// Enable debug output
    #[arg(long)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Apply command line sampling values on top of the loaded configuration
    pub(crate) fn apply_overrides(&self, config: &mut Config) {
        let gemini = &mut config.gemini;
        if let Some(candidates) = self.candidates {
            gemini.candidate_count = candidates;
        }
        if self.temperature.is_some() {
            gemini.temperature = self.temperature;
        }
        if self.topp.is_some() {
            gemini.top_p = self.topp;
        }
        if self.topk.is_some() {
            gemini.top_k = self.topk;
        }
        if self.maxtokens.is_some() {
            gemini.max_output_tokens = self.maxtokens;
        }
    }

    pub(crate) fn use_color(&self) -> bool {
        std::io::stdout().is_terminal()
    }
}
