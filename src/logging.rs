//! Diagnostic logging to stderr
//!
//! User-facing progress goes to stdout with `println!`; everything routed
//! through `tracing` lands on stderr so the two never mix in redirects.

use tracing_subscriber::EnvFilter;

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "warn,gemini_prompt=debug"
    } else {
        "warn,gemini_prompt=info"
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `--debug`.
pub(crate) fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_crate_level() {
        assert!(default_directive(true).ends_with("gemini_prompt=debug"));
        assert!(default_directive(false).ends_with("gemini_prompt=info"));
    }
}
