use std::process::{Command, Stdio};

use crate::consts::FILE_PLACEHOLDER;
use crate::error::CommandError;

/// Split a command line into program and arguments.
///
/// Grammar: arguments are separated by spaces; `'...'` and `"..."` group an
/// argument; inside a quote the other quote character is literal content.
/// A closing quote always ends the current argument, even an empty one.
pub(crate) fn split_command_line(command_line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in command_line.chars() {
        match (c, quote) {
            ('"' | '\'', Some(open)) if open == c => {
                quote = None;
                args.push(std::mem::take(&mut current));
            }
            ('"' | '\'', Some(_)) => current.push(c),
            ('"' | '\'', None) => quote = Some(c),
            (' ', None) => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Fill `{file}` in a command template with the double quoted path
pub(crate) fn fill_template(template: &str, file: &str) -> String {
    template.replace(FILE_PLACEHOLDER, &format!("\"{file}\""))
}

/// Run a command line and wait for it to finish.
pub(crate) fn run_command(command_line: &str) -> Result<(), CommandError> {
    let args = split_command_line(command_line);
    let Some((program, rest)) = args.split_first() else {
        return Err(CommandError::Empty);
    };

    tracing::debug!(command = command_line, "running external command");
    let status = Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .status()
        .map_err(|source| CommandError::Spawn {
            command: command_line.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CommandError::Failed {
            command: command_line.to_string(),
            status: status.to_string(),
        })
    }
}

/// Best-effort variant: failures are logged, never returned
pub(crate) fn run_logged(command_line: &str) {
    if let Err(e) = run_command(command_line) {
        tracing::warn!("{e}");
    }
}
