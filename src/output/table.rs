use comfy_table::Color;
use std::fs;
use std::path::{Path, PathBuf};

use crate::gemini::ModelInfo;
use crate::output::format::{create_styled_table, format_count, header_cell, right_cell, styled_cell};
use crate::utils::files::{OCTET_STREAM, detect_mime};
use crate::utils::truncate_end;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckStatus {
    Ok,
    /// Uploadable, but likely useless to the model
    Warn,
    Error,
}

impl CheckStatus {
    fn label(self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Error => "error",
        }
    }

    fn color(self) -> Color {
        match self {
            CheckStatus::Ok => Color::Green,
            CheckStatus::Warn => Color::Yellow,
            CheckStatus::Error => Color::Red,
        }
    }
}

/// Result of checking one file that would be attached
#[derive(Debug)]
pub(crate) struct FileCheck {
    pub(crate) path: PathBuf,
    pub(crate) status: CheckStatus,
    pub(crate) size: Option<u64>,
    /// MIME type, or the reason for a warning/error
    pub(crate) detail: String,
}

pub(crate) fn check_file(path: &Path) -> FileCheck {
    let size = fs::metadata(path).ok().map(|m| m.len());
    let (status, detail) = match detect_mime(path) {
        Err(e) => (CheckStatus::Error, e.to_string()),
        Ok(_) if size == Some(0) => (CheckStatus::Warn, "empty file".to_string()),
        Ok(mime) if mime == OCTET_STREAM => (CheckStatus::Warn, mime),
        Ok(mime) => (CheckStatus::Ok, mime),
    };
    FileCheck {
        path: path.to_path_buf(),
        status,
        size,
        detail,
    }
}

/// Table of files that would be uploaded, without contacting the service
pub(crate) fn print_dryrun_table(paths: &[PathBuf], use_color: bool) -> Vec<FileCheck> {
    let checks: Vec<FileCheck> = paths.iter().map(|p| check_file(p)).collect();

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("File", use_color),
        header_cell("Status", use_color),
        header_cell("Size (KiB)", use_color),
        header_cell("MIME type / detail", use_color),
    ]);
    for check in &checks {
        let color = use_color.then(|| check.status.color());
        let size = check
            .size
            .map(|s| format!("{:.1}", s as f64 / 1024.0))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            styled_cell(&check.path.display().to_string(), None, false),
            styled_cell(check.status.label(), color, check.status != CheckStatus::Ok),
            right_cell(&size),
            styled_cell(&check.detail, None, false),
        ]);
    }

    let errors = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Error)
        .count();
    println!("\nFiles to upload (dry run):");
    println!("{table}");
    println!("  {} file(s), {} with errors\n", checks.len(), errors);
    checks
}

/// Table of remote models that can generate content
pub(crate) fn print_model_table(models: &[ModelInfo], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Model", use_color),
        header_cell("Version", use_color),
        header_cell("Input tokens", use_color),
        header_cell("Output tokens", use_color),
        header_cell("Description", use_color),
    ]);

    let mut count = 0;
    for model in models.iter().filter(|m| m.supports_generate_content()) {
        count += 1;
        table.add_row(vec![
            styled_cell(model.short_name(), None, true),
            styled_cell(&model.version, None, false),
            right_cell(&format_count(model.input_token_limit)),
            right_cell(&format_count(model.output_token_limit)),
            styled_cell(&truncate_end(&model.description, 80, "..."), None, false),
        ]);
    }

    println!("{table}");
    println!("  {count} models supporting generateContent\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_file_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, "notes").unwrap();
        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "").unwrap();
        let unknown = dir.path().join("blob.zzzunknown");
        fs::write(&unknown, "data").unwrap();

        let ok = check_file(&text);
        assert_eq!(ok.status, CheckStatus::Ok);
        assert_eq!(ok.detail, "text/plain");

        assert_eq!(check_file(&empty).status, CheckStatus::Warn);
        assert_eq!(check_file(&unknown).status, CheckStatus::Warn);

        let missing = check_file(&dir.path().join("missing.pdf"));
        assert_eq!(missing.status, CheckStatus::Error);
        assert!(missing.size.is_none());
    }

    #[test]
    fn dryrun_reports_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "a").unwrap();
        let checks = print_dryrun_table(&[a, dir.path().join("b.txt")], false);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[1].status, CheckStatus::Error);
    }
}
