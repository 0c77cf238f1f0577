use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

/// Read a list of files to upload: one entry per line, blank lines and
/// `#` comments are ignored.
pub(crate) fn read_upload_list(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Expand glob patterns. Entries without wildcards, invalid patterns and
/// patterns without matches are kept verbatim so they get reported later.
pub(crate) fn expand_patterns(entries: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in entries {
        if !entry.contains(['*', '?', '[']) {
            files.push(PathBuf::from(entry));
            continue;
        }
        let matches: Vec<PathBuf> = match glob::glob(entry) {
            Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file()).collect(),
            Err(e) => {
                tracing::warn!(pattern = entry.as_str(), "invalid glob pattern: {e}");
                Vec::new()
            }
        };
        if matches.is_empty() {
            files.push(PathBuf::from(entry));
        } else {
            files.extend(matches);
        }
    }
    files
}

/// MIME type by file extension; errors if the file cannot be opened.
pub(crate) fn detect_mime(path: &Path) -> io::Result<String> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"));
    }
    if meta.len() == 0 {
        return Ok(OCTET_STREAM.to_string());
    }
    Ok(mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string())
}
