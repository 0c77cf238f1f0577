use std::time::Duration;

/// Timestamp layout for history filenames and file listings: "20250302-140509"
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Human readable completion time in response metadata (RFC 850 layout with
/// a numeric offset, since a local time carries no zone abbreviation)
pub(crate) const GENERATED_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S %z";

/// Poll interval of the file input source
pub(crate) const FILE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Poll interval while waiting for an uploaded file to become active
pub(crate) const UPLOAD_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Prefix of a terminal line that redirects the prompt to a file
pub(crate) const REDIRECT_MARKER: &str = "<<<";

/// Placeholder in output/notify command templates
pub(crate) const FILE_PLACEHOLDER: &str = "{file}";

/// Placeholder in the HTML header template
pub(crate) const TITLE_PLACEHOLDER: &str = "{title}";

/// Hard filesystem limit for a single path component
pub(crate) const MAX_FILENAME_LENGTH: usize = 255;

/// Fallback terminal width when stdout is not a terminal
pub(crate) const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Default configuration filename in the working directory
pub(crate) const CONFIG_FILENAME: &str = "gemini-prompt.toml";
