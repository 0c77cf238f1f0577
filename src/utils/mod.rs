pub(crate) mod command;
pub(crate) mod files;
pub(crate) mod text;

pub(crate) use command::{fill_template, run_logged};
pub(crate) use text::{pluralize, single_line, truncate_end, truncate_middle, wrap_indented};
