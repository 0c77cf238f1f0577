//! The "current" files, rewritten on every prompt

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::Channel;
use crate::config::Config;
use crate::render::{MarkdownRenderer, Renderers, build_page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteMode {
    /// Start a new document (prompt)
    Overwrite,
    /// Continue the document (response)
    Append,
}

/// Write a markdown document to all three current files, converting it for
/// each channel whose rendering is enabled. Failures are logged per channel.
pub(crate) fn write_document(
    config: &Config,
    renderers: &Renderers,
    markdown: &str,
    mode: WriteMode,
) {
    for channel in Channel::ALL {
        let settings = config.channel(channel);
        let content = match channel {
            Channel::Ansi if settings.rendering => renderers.ansi.render(markdown),
            Channel::Html if settings.rendering => renderers.html.render(markdown),
            _ => markdown.to_string(),
        };
        if let Err(e) = write_file(&settings.prompt_response_file, &content, mode) {
            tracing::error!(
                channel = channel.label(),
                path = %settings.prompt_response_file.display(),
                "failed to write current file: {e}"
            );
        }
    }
}

/// Turn the current HTML fragment into a complete page (header, body, footer)
pub(crate) fn wrap_html_page(config: &Config, prompt: &str) {
    let path = &config.html.channel.prompt_response_file;
    let result = fs::read_to_string(path)
        .and_then(|body| fs::write(path, build_page(&config.html, prompt, &body)));
    if let Err(e) = result {
        tracing::error!(path = %path.display(), "failed to build HTML page: {e}");
    }
}

fn write_file(path: &Path, content: &str, mode: WriteMode) -> io::Result<()> {
    let mut file = match mode {
        WriteMode::Overwrite => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?,
        WriteMode::Append => OpenOptions::new().append(true).create(true).open(path)?,
    };
    file.write_all(content.as_bytes())
}
