use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::PromptSender;
use crate::consts::REDIRECT_MARKER;

/// Publish every non-empty line read from `reader` as a prompt.
///
/// `<<< path` publishes the file's contents instead of the line. The reader
/// stops at end of input or on a read error; redirect failures only skip
/// the line.
pub(crate) async fn read_prompts<R>(mut reader: R, sender: PromptSender)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                tracing::debug!("terminal input closed");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("failed to read terminal input: {e}");
                return;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        if line == "\n" || line == "\r\n" {
            continue;
        }

        let prompt = match line.strip_prefix(REDIRECT_MARKER) {
            Some(rest) => match read_redirect(Path::new(rest.trim())).await {
                Some(content) => content,
                None => continue,
            },
            None => line.into_owned(),
        };

        if sender.send(prompt).is_err() {
            return;
        }
    }
}

async fn read_redirect(path: &Path) -> Option<String> {
    match tokio::fs::read(path).await {
        Ok(content) if content.is_empty() => {
            tracing::warn!(path = %path.display(), "prompt file is empty");
            None
        }
        Ok(content) => Some(String::from_utf8_lossy(&content).into_owned()),
        Err(e) => {
            tracing::error!(path = %path.display(), "failed to read prompt file: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    async fn collect(input: impl AsRef<[u8]>) -> Vec<String> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        read_prompts(input.as_ref(), tx).await;
        let mut prompts = Vec::new();
        while let Ok(prompt) = rx.try_recv() {
            prompts.push(prompt);
        }
        prompts
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let prompts = collect("first\n\n\r\nsecond\n").await;
        assert_eq!(prompts, ["first\n", "second\n"]);
    }

    #[tokio::test]
    async fn redirect_publishes_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "abc").unwrap();

        let prompts = collect(&format!("<<<{}\n", notes.display())).await;
        assert_eq!(prompts, ["abc"]);

        let prompts = collect(&format!("<<<   {}  \n", notes.display())).await;
        assert_eq!(prompts, ["abc"]);
    }

    #[tokio::test]
    async fn failed_redirect_skips_line() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "").unwrap();

        let input = format!(
            "<<<{}\n<<<{}\nnext\n",
            dir.path().join("missing.txt").display(),
            empty.display()
        );
        assert_eq!(collect(&input).await, ["next\n"]);
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_input() {
        let prompts = collect(b"caf\xe9 au lait\nsecond prompt\n").await;
        assert_eq!(prompts, ["caf\u{fffd} au lait\n", "second prompt\n"]);
    }

    #[tokio::test]
    async fn redirect_accepts_non_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let latin1 = dir.path().join("latin1.txt");
        std::fs::write(&latin1, b"na\xefve question").unwrap();

        let prompts = collect(format!("<<<{}\n", latin1.display())).await;
        assert_eq!(prompts, ["na\u{fffd}ve question"]);
    }

    #[tokio::test]
    async fn final_line_without_newline_is_published() {
        assert_eq!(collect("last").await, ["last"]);
    }
}
