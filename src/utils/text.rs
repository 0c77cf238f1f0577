/// Pluralize a term (simply) by appending 's'
pub(crate) fn pluralize(count: usize, singular: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        format!("{singular}s")
    }
}

/// Cut to `max` characters, ending with `omission` when shortened
pub(crate) fn truncate_end(s: &str, max: usize, omission: &str) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(omission.chars().count());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(omission);
    out
}

/// Cut to `max` characters, replacing the middle with `omission` when shortened
pub(crate) fn truncate_middle(s: &str, max: usize, omission: &str) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(omission.chars().count());
    let head = keep.div_ceil(2);
    let tail = keep - head;
    let mut out: String = s.chars().take(head).collect();
    out.push_str(omission);
    out.extend(s.chars().skip(len - tail));
    out
}

/// Replace newlines and tabs with single spaces
pub(crate) fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\t'], " ")
}

/// Word-wrap to `width` columns; continuation lines are indented by `indent`.
pub(crate) fn wrap_indented(message: &str, width: usize, indent: usize) -> String {
    let limit = width.saturating_sub(indent).max(20);
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in message.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > limit {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join(&format!("\n{}", " ".repeat(indent)))
}
