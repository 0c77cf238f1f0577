mod archive;
mod current;
mod format;
mod summary;
mod table;

pub(crate) use archive::archive_and_launch;
pub(crate) use current::{WriteMode, wrap_html_page, write_document};
pub(crate) use summary::{config_summary, model_report};
pub(crate) use table::{print_dryrun_table, print_model_table};

/// The three parallel representations of every prompt and response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Channel {
    Markdown,
    Ansi,
    Html,
}

impl Channel {
    pub(crate) const ALL: [Channel; 3] = [Channel::Markdown, Channel::Ansi, Channel::Html];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Channel::Markdown => "Markdown",
            Channel::Ansi => "ANSI",
            Channel::Html => "HTML",
        }
    }

    /// ANSI output is echoed to the terminal; the others open an application
    pub(crate) fn launches_application(self) -> bool {
        !matches!(self, Channel::Ansi)
    }
}
