//! Markdown converters for the styled output channels

mod ansi;
mod html;

use crate::config::{Config, Replacement};

pub(crate) use ansi::AnsiRenderer;
pub(crate) use html::{HtmlRenderer, build_page};

/// Pure markdown-to-string transform
pub(crate) trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// The converters configured for this run
pub(crate) struct Renderers {
    pub(crate) ansi: AnsiRenderer,
    pub(crate) html: HtmlRenderer,
}

impl Renderers {
    pub(crate) fn from_config(config: &Config) -> Self {
        Renderers {
            ansi: AnsiRenderer::for_terminal(&config.ansi.replace_colors),
            html: HtmlRenderer::new(&config.html.replace_elements),
        }
    }
}

/// Apply literal replacements in configured order
fn apply_replacements(text: String, replacements: &[Replacement]) -> String {
    replacements
        .iter()
        .filter(|r| !r.from.is_empty())
        .fold(text, |acc, r| acc.replace(&r.from, &r.to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacements_apply_in_order() {
        let replacements = vec![
            Replacement {
                from: "a".to_string(),
                to: "b".to_string(),
            },
            Replacement {
                from: "b".to_string(),
                to: "c".to_string(),
            },
            Replacement {
                from: String::new(),
                to: "ignored".to_string(),
            },
        ];
        assert_eq!(apply_replacements("ab".to_string(), &replacements), "cc");
    }
}
