use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use super::FileStore;
use super::types::{AttachedFile, FileState};
use crate::utils::files::detect_mime;

/// How long to wait for the service to finish processing an upload
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProcessingWait {
    pub(crate) max_wait: Duration,
    pub(crate) poll_interval: Duration,
}

/// Upload every file, then wait for each to leave the processing state.
///
/// Failures are reported per file and never abort the batch. Files that end
/// up in a state other than active are still returned so they can be deleted
/// at shutdown; prompts reference only the active ones.
pub(crate) fn upload_files<S: FileStore + ?Sized>(
    store: &S,
    paths: &[PathBuf],
    wait: ProcessingWait,
) -> Vec<AttachedFile> {
    if paths.is_empty() {
        return Vec::new();
    }

    println!("\nFile uploads:");
    let mut uploaded = Vec::new();
    for path in paths {
        print!("  {} ... ", path.display());
        let _ = std::io::stdout().flush();

        if !path.is_file() {
            println!("error: file doesn't exist");
            continue;
        }
        let mime_type = match detect_mime(path) {
            Ok(mime) => mime,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };
        match store.upload(path, &mime_type) {
            Ok(file) => {
                println!("uploaded ({:.1} KiB, {})", file.size_kib(), file.mime_type);
                uploaded.push(file);
            }
            Err(e) => println!("error: {e}"),
        }
    }

    if uploaded.is_empty() {
        return uploaded;
    }

    println!("\nRemote file states:");
    uploaded
        .into_iter()
        .map(|file| {
            let file = wait_until_processed(store, file, wait);
            println!("\r  {} ... {}", file.display_name, file.state.as_str());
            file
        })
        .collect()
}

/// Release every uploaded file; failures are reported and skipped
pub(crate) fn delete_files<S: FileStore + ?Sized>(store: &S, files: &[AttachedFile]) {
    for file in files {
        println!("deleting uploaded remote file [{}]", file.display_name);
        if let Err(e) = store.delete_file(&file.name) {
            tracing::error!(file = file.name.as_str(), "failed to delete uploaded file: {e}");
        }
    }
}

fn wait_until_processed<S: FileStore + ?Sized>(
    store: &S,
    file: AttachedFile,
    wait: ProcessingWait,
) -> AttachedFile {
    let mut current = file;
    let mut waited = Duration::ZERO;

    while current.state == FileState::Processing {
        match store.get_file(&current.name) {
            Ok(latest) => current = latest,
            Err(e) => {
                println!(
                    "  error [{e}] getting state for remote file [{}]",
                    current.display_name
                );
                break;
            }
        }
        if current.state != FileState::Processing {
            break;
        }
        if waited >= wait.max_wait {
            tracing::warn!(
                file = current.display_name.as_str(),
                "file still processing after {}s",
                wait.max_wait.as_secs()
            );
            break;
        }
        thread::sleep(wait.poll_interval);
        waited += wait.poll_interval;
        print!(".");
        let _ = std::io::stdout().flush();
    }

    current
}
