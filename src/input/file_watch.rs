use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::PromptSender;

/// Size and modification time; any difference counts as a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    len: u64,
    modified: Option<SystemTime>,
}

fn snapshot(path: &Path) -> io::Result<Snapshot> {
    let meta = fs::metadata(path)?;
    Ok(Snapshot {
        len: meta.len(),
        modified: meta.modified().ok(),
    })
}

/// Create the watched file (empty) unless it already exists
pub(crate) fn ensure_file(path: &Path) -> io::Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
}

/// Poll `path` and publish its whole content whenever it changes.
pub(crate) async fn watch_file(path: PathBuf, interval: Duration, sender: PromptSender) {
    let mut baseline = match snapshot(&path) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(path = %path.display(), "cannot stat input file: {e}");
            None
        }
    };

    loop {
        tokio::time::sleep(interval).await;

        let current = match snapshot(&path) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(path = %path.display(), "cannot stat input file: {e}");
                continue;
            }
        };
        if baseline == Some(current) {
            continue;
        }
        baseline = Some(current);

        match tokio::fs::read(&path).await {
            Ok(content) if content.is_empty() => {}
            Ok(content) => {
                let prompt = String::from_utf8_lossy(&content).into_owned();
                if sender.send(prompt).is_err() {
                    return;
                }
            }
            Err(e) => tracing::error!(path = %path.display(), "failed to read input file: {e}"),
        }
    }
}
