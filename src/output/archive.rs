use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use super::Channel;
use crate::config::Config;
use crate::utils::{fill_template, run_logged};

/// Copy each current file into its history directory (when enabled) and open
/// it in the configured application (when enabled). Channels are independent;
/// a failure in one is logged and does not affect the others.
pub(crate) fn archive_and_launch<Tz>(config: &Config, now: &DateTime<Tz>, prompt: &str)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let policy = config.history.policy();

    for channel in Channel::ALL {
        let settings = config.channel(channel);
        let current = &settings.prompt_response_file;
        let mut target = current.clone();

        if settings.history {
            let name = policy.build_name(now, prompt, config.extension(channel));
            let destination = settings.history_directory.join(name);
            match copy_file(current, &destination) {
                Ok(()) => target = destination,
                Err(e) => tracing::error!(
                    channel = channel.label(),
                    destination = %destination.display(),
                    "failed to archive: {e}"
                ),
            }
        }

        if settings.output && channel.launches_application() {
            let path = absolute(&target);
            let command = fill_template(
                settings.output_application.current(),
                &path.display().to_string(),
            );
            run_logged(&command);
        }
    }
}

fn copy_file(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
