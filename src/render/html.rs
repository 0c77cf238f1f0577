use markdown::{Options, to_html, to_html_with_options};

use super::{MarkdownRenderer, apply_replacements};
use crate::config::{HtmlConfig, Replacement};
use crate::consts::TITLE_PLACEHOLDER;
use crate::utils::{single_line, truncate_end};

/// Markdown to an HTML fragment (GitHub flavored)
pub(crate) struct HtmlRenderer {
    replacements: Vec<Replacement>,
}

impl HtmlRenderer {
    pub(crate) fn new(replacements: &[Replacement]) -> Self {
        HtmlRenderer {
            replacements: replacements.to_vec(),
        }
    }
}

impl MarkdownRenderer for HtmlRenderer {
    fn render(&self, markdown: &str) -> String {
        let html = to_html_with_options(markdown, &Options::gfm()).unwrap_or_else(|e| {
            tracing::debug!("gfm conversion failed, using commonmark: {e}");
            to_html(markdown)
        });
        apply_replacements(html, &self.replacements)
    }
}

/// Wrap a rendered body into a complete page titled after the prompt
pub(crate) fn build_page(config: &HtmlConfig, prompt: &str, body: &str) -> String {
    let title = truncate_end(&single_line(prompt), config.max_length_title, "...");
    let header = config
        .header
        .replace(TITLE_PLACEHOLDER, &escape_html(&title));
    format!("{header}{body}{}", config.footer)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::config::tests::MINIMAL;
    use std::path::Path;

    fn html_config(extra: &str) -> HtmlConfig {
        let content = MINIMAL.replace(
            "prompt_response_file = \"prompt-response.html\"",
            &format!("prompt_response_file = \"prompt-response.html\"\n{extra}"),
        );
        Config::parse(&content, Path::new("test.toml")).unwrap().html
    }

    #[test]
    fn renders_gfm_tables() {
        let html = HtmlRenderer::new(&[]).render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"), "{html}");
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn element_replacements_apply() {
        let replacements = vec![Replacement {
            from: "<pre>".to_string(),
            to: "<pre class=\"code\">".to_string(),
        }];
        let html = HtmlRenderer::new(&replacements).render("```\nx\n```\n");
        assert!(html.contains("<pre class=\"code\">"), "{html}");
    }

    #[test]
    fn page_title_is_flattened_and_truncated() {
        let config = html_config(
            "max_length_title = 12\nheader = \"<title>{title}</title>\"\nfooter = \"</html>\"",
        );
        let page = build_page(&config, "first line\nsecond\tline", "<p>body</p>");
        assert_eq!(page, "<title>first lin...</title><p>body</p></html>");
    }

    #[test]
    fn page_title_is_escaped() {
        let config = html_config("header = \"<title>{title}</title>\"");
        let page = build_page(&config, "a < b & c", "");
        assert_eq!(page, "<title>a &lt; b &amp; c</title>");
    }
}
