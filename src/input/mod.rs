//! Concurrent prompt sources feeding one ordered channel

mod file_watch;
mod localhost;
mod terminal;

use tokio::io::BufReader;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::InputConfig;
use crate::consts::FILE_POLL_INTERVAL;

pub(crate) type PromptSender = UnboundedSender<String>;

/// Spawn one task per enabled source and return their labels.
///
/// Must be called from within a tokio runtime context.
pub(crate) fn start_input_readers(config: &InputConfig, sender: &PromptSender) -> Vec<String> {
    let mut labels = Vec::new();

    if config.terminal {
        let reader = BufReader::new(tokio::io::stdin());
        tokio::spawn(terminal::read_prompts(reader, sender.clone()));
        labels.push("Terminal".to_string());
    }

    if config.file {
        let path = config.file_path.clone();
        if let Err(e) = file_watch::ensure_file(&path) {
            tracing::error!(path = %path.display(), "failed to create input file: {e}");
        }
        tokio::spawn(file_watch::watch_file(path, FILE_POLL_INTERVAL, sender.clone()));
        labels.push("File".to_string());
    }

    if config.localhost {
        let port = config.localhost_port;
        tokio::spawn(localhost::serve(port, sender.clone()));
        labels.push(format!("localhost:{port}"));
    }

    labels
}
