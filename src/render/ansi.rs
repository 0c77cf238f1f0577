use crossterm::style::Stylize;
use markdown::mdast::{self, Node};
use markdown::{ParseOptions, to_mdast};

use super::{MarkdownRenderer, apply_replacements};
use crate::config::Replacement;
use crate::consts::DEFAULT_TERMINAL_WIDTH;

const CODE_INDENT: &str = "    ";
const QUOTE_PREFIX: &str = "│ ";

/// Markdown to styled terminal text
pub(crate) struct AnsiRenderer {
    width: usize,
    replacements: Vec<Replacement>,
}

impl AnsiRenderer {
    /// Width of the attached terminal, or the default when not a terminal
    pub(crate) fn for_terminal(replacements: &[Replacement]) -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .ok()
            .filter(|&cols| cols > 0)
            .unwrap_or(DEFAULT_TERMINAL_WIDTH);
        Self::with_width(width, replacements)
    }

    pub(crate) fn with_width(width: usize, replacements: &[Replacement]) -> Self {
        AnsiRenderer {
            width: width.max(20),
            replacements: replacements.to_vec(),
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    fn render_blocks(&self, nodes: &[Node], width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            let block = self.render_block(node, width);
            if block.is_empty() {
                continue;
            }
            lines.extend(block);
            let next_is_block = nodes.get(i + 1).is_some();
            if next_is_block {
                lines.push(String::new());
            }
        }
        lines
    }

    fn render_block(&self, node: &Node, width: usize) -> Vec<String> {
        match node {
            Node::Heading(heading) => {
                let text = inline(&heading.children);
                let styled = match heading.depth {
                    1 => text.bold().underlined().cyan().to_string(),
                    2 => text.bold().cyan().to_string(),
                    depth => format!("{} {text}", "#".repeat(depth as usize))
                        .bold()
                        .to_string(),
                };
                vec![styled]
            }
            Node::Paragraph(paragraph) => wrap_styled(&inline(&paragraph.children), width),
            Node::Code(code) => {
                let mut lines = Vec::new();
                if let Some(lang) = code.lang.as_deref().filter(|l| !l.is_empty()) {
                    lines.push(format!("{CODE_INDENT}{}", lang.dark_grey()));
                }
                lines.extend(
                    code.value
                        .split('\n')
                        .map(|line| format!("{CODE_INDENT}{}", line.yellow())),
                );
                lines
            }
            Node::List(list) => self.render_list(list, width),
            Node::Blockquote(quote) => {
                let inner = width.saturating_sub(QUOTE_PREFIX.len()).max(10);
                self.render_blocks(&quote.children, inner)
                    .into_iter()
                    .map(|line| format!("{}{}", QUOTE_PREFIX.dark_grey(), line.italic()))
                    .collect()
            }
            Node::ThematicBreak(_) => vec!["─".repeat(width).dark_grey().to_string()],
            Node::Table(table) => render_table(table),
            Node::Html(html) => html.value.lines().map(str::to_string).collect(),
            Node::Root(root) => self.render_blocks(&root.children, width),
            other => {
                let text = inline(std::slice::from_ref(other));
                if text.is_empty() {
                    Vec::new()
                } else {
                    wrap_styled(&text, width)
                }
            }
        }
    }

    fn render_list(&self, list: &mdast::List, width: usize) -> Vec<String> {
        let start = list.start.unwrap_or(1);
        let mut lines = Vec::new();

        for (i, node) in list.children.iter().enumerate() {
            let Node::ListItem(item) = node else {
                continue;
            };
            let mut bullet = if list.ordered {
                format!("{}. ", start + i as u32)
            } else {
                "• ".to_string()
            };
            match item.checked {
                Some(true) => bullet.push_str("[x] "),
                Some(false) => bullet.push_str("[ ] "),
                None => {}
            }
            let indent = " ".repeat(bullet.chars().count());
            let inner = width.saturating_sub(indent.len()).max(10);

            let mut item_lines = Vec::new();
            for child in &item.children {
                item_lines.extend(self.render_block(child, inner));
            }
            for (j, line) in item_lines.into_iter().enumerate() {
                if j == 0 {
                    lines.push(format!("{}{line}", bullet.as_str().dark_grey()));
                } else if line.is_empty() {
                    lines.push(line);
                } else {
                    lines.push(format!("{indent}{line}"));
                }
            }
        }
        lines
    }
}

impl MarkdownRenderer for AnsiRenderer {
    fn render(&self, markdown: &str) -> String {
        let normalized = markdown.replace('\t', "    ");
        let rendered = match to_mdast(&normalized, &ParseOptions::gfm()) {
            Ok(Node::Root(root)) => self.render_blocks(&root.children, self.width).join("\n"),
            Ok(other) => self.render_block(&other, self.width).join("\n"),
            Err(e) => {
                tracing::debug!("markdown parse failed, passing text through: {e}");
                normalized
            }
        };
        let mut output = apply_replacements(rendered, &self.replacements);
        if !output.ends_with('\n') {
            output.push('\n');
        }
        output
    }
}

fn inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&text.value),
            Node::Strong(strong) => out.push_str(&inline(&strong.children).bold().to_string()),
            Node::Emphasis(emphasis) => {
                out.push_str(&inline(&emphasis.children).italic().to_string());
            }
            Node::Delete(delete) => {
                out.push_str(&inline(&delete.children).crossed_out().to_string());
            }
            Node::InlineCode(code) => out.push_str(&code.value.as_str().yellow().to_string()),
            Node::Link(link) => {
                let text = plain_text(&link.children);
                let label = inline(&link.children).underlined().blue().to_string();
                out.push_str(&label);
                if text != link.url {
                    out.push(' ');
                    out.push_str(&format!("({})", link.url).dark_grey().to_string());
                }
            }
            Node::Image(image) => {
                let alt = if image.alt.is_empty() { &image.url } else { &image.alt };
                out.push_str(&format!("[image: {alt}]"));
            }
            Node::Break(_) => out.push('\n'),
            Node::Html(html) => out.push_str(&html.value),
            Node::Paragraph(paragraph) => out.push_str(&inline(&paragraph.children)),
            other => {
                if let Some(children) = other.children() {
                    out.push_str(&inline(children));
                } else {
                    out.push_str(&other.to_string());
                }
            }
        }
    }
    out
}

fn plain_text(nodes: &[Node]) -> String {
    nodes.iter().map(Node::to_string).collect()
}

fn render_table(table: &mdast::Table) -> Vec<String> {
    let rows: Vec<Vec<String>> = table
        .children
        .iter()
        .filter_map(|row| match row {
            Node::TableRow(row) => Some(
                row.children
                    .iter()
                    .map(|cell| match cell {
                        Node::TableCell(cell) => plain_text(&cell.children),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        })
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(c, &w)| {
                let cell = row.get(c).map(String::as_str).unwrap_or("");
                format!("{cell:<w$}")
            })
            .collect();
        let line = cells.join(" │ ");
        lines.push(if i == 0 { line.bold().to_string() } else { line });
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            lines.push(rule.join("─┼─").dark_grey().to_string());
        }
    }
    lines
}

/// Columns a string occupies once escape sequences are removed
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (true, c) if c.is_ascii_alphabetic() => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}

/// Word-wrap styled text; hard line breaks are kept
fn wrap_styled(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in source_line.split(' ').filter(|w| !w.is_empty()) {
            let word_width = visible_width(word);
            if line_width > 0 && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }
    lines
}
