//! Prompt to filename conversion
//!
//! Problematic ASCII characters are first swapped for visually similar
//! Unicode characters so the prompt stays readable, then the remaining
//! unsafe content is replaced and the result is cut to the length budget.

use uuid::Uuid;

/// ASCII characters and the homoglyphs that stand in for them
pub(crate) const HOMOGLYPHS: [(char, char); 10] = [
    ('?', '\u{0294}'), // glottal stop
    (':', '\u{02D0}'), // triangular colon
    ('/', '\u{2215}'), // division slash
    ('\\', '\u{FF3C}'), // fullwidth reverse solidus
    ('*', '\u{204E}'), // low asterisk
    ('|', '\u{00A6}'), // broken bar
    ('<', '\u{2039}'), // single left-pointing angle quotation mark
    ('>', '\u{203A}'), // single right-pointing angle quotation mark
    ('"', '\u{201D}'), // right double quotation mark
    ('.', '\u{2024}'), // one dot leader
];

const REPLACEMENT: char = ' ';

const WINDOWS_RESERVED: [&str; 4] = ["con", "prn", "aux", "nul"];

/// Derive a bracketed filename from a prompt, e.g. `prefix.[core].postfix.ext`.
///
/// Lengths are counted in bytes; the result never exceeds `max_length` as long
/// as prefix, postfix and extension leave room for the brackets.
pub(crate) fn prompt_to_filename(
    prompt: &str,
    max_length: usize,
    prefix: &str,
    postfix: &str,
    extension: &str,
) -> String {
    let mut budget = max_length.saturating_sub(2);
    if !prefix.is_empty() {
        budget = budget.saturating_sub(prefix.len() + 1);
    }
    if !postfix.is_empty() {
        budget = budget.saturating_sub(1 + postfix.len());
    }
    if !extension.is_empty() {
        budget = budget.saturating_sub(1 + extension.len());
    }

    let substituted = substitute_homoglyphs(prompt);
    let core = match filenamify(&substituted, budget) {
        Some(name) => name,
        None => {
            tracing::debug!("prompt not usable as filename, falling back to random name");
            truncate_bytes(&Uuid::new_v4().to_string(), budget).to_string()
        }
    };

    let mut filename = format!("[{core}]");
    if !prefix.is_empty() {
        filename = format!("{prefix}.{filename}");
    }
    if !postfix.is_empty() {
        filename.push('.');
        filename.push_str(postfix);
    }
    if !extension.is_empty() {
        filename.push('.');
        filename.push_str(extension);
    }
    filename
}

pub(crate) fn substitute_homoglyphs(prompt: &str) -> String {
    prompt
        .chars()
        .map(|c| {
            HOMOGLYPHS
                .iter()
                .find(|(ascii, _)| *ascii == c)
                .map_or(c, |(_, glyph)| *glyph)
        })
        .collect()
}

/// Generic filename safety: replaces reserved and control characters with a
/// space, collapses repeated spaces, trims, guards reserved device names and
/// truncates. Returns `None` when nothing usable remains.
fn filenamify(input: &str, max_length: usize) -> Option<String> {
    if max_length == 0 {
        return None;
    }

    let mut cleaned = String::with_capacity(input.len());
    let mut last_was_replacement = false;
    for c in input.chars() {
        let c = if is_reserved(c) { REPLACEMENT } else { c };
        if c == REPLACEMENT {
            if last_was_replacement {
                continue;
            }
            last_was_replacement = true;
        } else {
            last_was_replacement = false;
        }
        cleaned.push(c);
    }

    // relative path components like "." or ".." (only reachable without homoglyphs)
    let trimmed = cleaned.trim_matches(REPLACEMENT).trim_start_matches('.');
    let mut name = trimmed.trim_matches(REPLACEMENT).to_string();
    if name.is_empty() {
        return None;
    }

    if is_windows_reserved(&name) {
        name.push(REPLACEMENT);
        name.push('_');
    }

    let name = truncate_bytes(&name, max_length).trim_end_matches(REPLACEMENT);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn is_reserved(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

fn is_windows_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if WINDOWS_RESERVED.contains(&lower.as_str()) {
        return true;
    }
    let bytes = lower.as_bytes();
    bytes.len() == 4
        && (lower.starts_with("com") || lower.starts_with("lpt"))
        && bytes[3].is_ascii_digit()
}

/// Cut `s` to at most `max` bytes without splitting a character
pub(crate) fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_mark_becomes_glottal_stop() {
        assert_eq!(prompt_to_filename("Hello?", 255, "", "", "md"), "[Hello\u{0294}].md");
    }

    #[test]
    fn all_ten_characters_are_substituted() {
        let name = prompt_to_filename(r#"a?b:c/d\e*f|g<h>i"j.k"#, 255, "", "", "");
        for (ascii, glyph) in HOMOGLYPHS {
            assert!(!name.contains(ascii), "raw {ascii:?} left in {name}");
            assert!(name.contains(glyph), "missing {glyph:?} in {name}");
        }
    }

    #[test]
    fn prefix_postfix_and_extension_are_joined_with_dots() {
        let name = prompt_to_filename("hi", 255, "20250302-140509", "20250302-140509", "html");
        assert_eq!(name, "20250302-140509.[hi].20250302-140509.html");
    }

    #[test]
    fn whitespace_and_control_characters_collapse() {
        let name = prompt_to_filename("  what\n\tis   this  ", 255, "", "", "");
        assert_eq!(name, "[what is this]");
    }

    #[test]
    fn length_budget_is_respected_for_multibyte_prompts() {
        let prompt = "Warum? ".repeat(100);
        for max in [40, 64, 100, 255] {
            let name = prompt_to_filename(&prompt, max, "20250302-140509", "", "md");
            assert!(name.len() <= max, "{} > {max}: {name}", name.len());
            assert!(name.starts_with("20250302-140509.["));
            assert!(name.ends_with("].md"));
        }
    }

    #[test]
    fn empty_prompt_falls_back_to_random_name() {
        let name = prompt_to_filename("\n\t  ", 255, "", "", "md");
        let core = name.trim_start_matches('[').trim_end_matches("].md");
        assert!(Uuid::parse_str(core).is_ok(), "not a uuid: {core}");
    }

    #[test]
    fn fallback_name_is_cut_to_budget() {
        let name = prompt_to_filename("", 20, "", "", "md");
        assert!(name.len() <= 20);
    }

    #[test]
    fn reserved_device_names_are_guarded() {
        assert_eq!(prompt_to_filename("CON", 255, "", "", ""), "[CON _]");
        assert_eq!(prompt_to_filename("lpt1", 255, "", "", ""), "[lpt1 _]");
        assert_eq!(prompt_to_filename("console", 255, "", "", ""), "[console]");
    }

    #[test]
    fn truncate_bytes_keeps_char_boundaries() {
        assert_eq!(truncate_bytes("a\u{0294}b", 2), "a");
        assert_eq!(truncate_bytes("abc", 10), "abc");
    }
}
