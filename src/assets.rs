//! Files embedded in the binary and written on demand

use std::fs;
use std::path::Path;

use crate::error::AppError;

const PROMPT_INPUT_HTML: &str = include_str!("../assets/prompt-input.html");

/// Stylesheet and script referenced by the default HTML header
const PAGE_ASSETS: [(&str, &str); 2] = [
    ("gemini-prompt.css", include_str!("../assets/gemini-prompt.css")),
    ("copy-to-clipboard.js", include_str!("../assets/copy-to-clipboard.js")),
];

/// Write `assets/*` below `base`, overwriting older copies.
pub(crate) fn write_page_assets(base: &Path) -> Result<(), AppError> {
    let dir = base.join("assets");
    fs::create_dir_all(&dir).map_err(|source| AppError::Io {
        action: "create directory",
        path: dir.clone(),
        source,
    })?;
    for (name, content) in PAGE_ASSETS {
        let path = dir.join(name);
        fs::write(&path, content).map_err(|source| AppError::Io {
            action: "write",
            path,
            source,
        })?;
    }
    Ok(())
}

/// Write the browser input page into `base` unless it already exists.
pub(crate) fn write_prompt_input_page(base: &Path) -> Result<(), AppError> {
    let path = base.join("prompt-input.html");
    if path.exists() {
        return Ok(());
    }
    fs::write(&path, PROMPT_INPUT_HTML).map_err(|source| AppError::Io {
        action: "write",
        path,
        source,
    })
}
