//! Startup console sections: configuration overview and model information

use std::fmt::Write;

use crate::config::Config;
use crate::gemini::ModelInfo;
use crate::utils::{truncate_middle, wrap_indented};

/// Column where values start in the model information block
const VALUE_INDENT: usize = 22;
const MAX_INSTRUCTION_DISPLAY: usize = 96;

/// Rough English word range for a token count, rounded down to hundreds
pub(crate) fn approx_words(tokens: u64) -> (u64, u64) {
    let floor = |words: u64| words / 100 * 100;
    (floor(tokens * 6 / 10), floor(tokens * 8 / 10))
}

/// Enabled inputs, rendering targets, history directories and outputs
pub(crate) fn config_summary(config: &Config) -> String {
    let mut out = String::new();
    let input = &config.input;

    let _ = writeln!(out, "\nNotes concerning the freely available Gemini API tier:");
    let _ = writeln!(out, "  Input data may be used by Google to improve its products.");
    let _ = writeln!(out, "  Do not process any private or confidential data.");

    let _ = writeln!(out, "\nInput from:");
    if input.terminal {
        let _ = writeln!(out, "  Terminal  : yes");
    }
    if input.file {
        let _ = writeln!(out, "  File      : {}", input.file_path.display());
    }
    if input.localhost {
        let _ = writeln!(out, "  localhost : {} (port)", input.localhost_port);
    }

    let _ = writeln!(out, "\nRendering:");
    let _ = writeln!(
        out,
        "  Markdown : {}",
        config.markdown.prompt_response_file.display()
    );
    if config.ansi.channel.rendering {
        let _ = writeln!(
            out,
            "  ANSI     : {}",
            config.ansi.channel.prompt_response_file.display()
        );
    }
    if config.html.channel.rendering {
        let _ = writeln!(
            out,
            "  HTML     : {}",
            config.html.channel.prompt_response_file.display()
        );
    }

    let _ = writeln!(out, "\nHistory ({} naming):", config.history.filename_schema.as_str());
    for (label, channel) in [
        ("Markdown", &config.markdown),
        ("ANSI    ", &config.ansi.channel),
        ("HTML    ", &config.html.channel),
    ] {
        if channel.history {
            let _ = writeln!(out, "  {label} : {}", channel.history_directory.display());
        }
    }

    let _ = writeln!(out, "\nOutput:");
    if config.ansi.channel.output {
        let _ = writeln!(out, "  Terminal : yes");
    }
    if config.markdown.output {
        let _ = writeln!(out, "  Markdown : execute application");
    }
    if config.html.channel.output {
        let _ = writeln!(out, "  HTML     : execute application");
    }
    out
}

/// Model limits and defaults followed by the user's sampling settings
pub(crate) fn model_report(info: &ModelInfo, config: &Config, width: usize) -> String {
    let mut out = String::new();
    let (in_low, in_high) = approx_words(info.input_token_limit);
    let (out_low, out_high) = approx_words(info.output_token_limit);

    let _ = writeln!(out, "\nAI model information:");
    let _ = writeln!(out, "  Name              : {}", info.name);
    let _ = writeln!(out, "  BaseModelID       : {}", info.base_model_id);
    let _ = writeln!(out, "  Version           : {}", info.version);
    let _ = writeln!(out, "  DisplayName       : {}", info.display_name);
    let _ = writeln!(
        out,
        "  Description       : {}",
        wrap_indented(&info.description, width, VALUE_INDENT)
    );
    let _ = writeln!(
        out,
        "  InputTokenLimit   : {} (approx. {in_low}-{in_high} english words)",
        info.input_token_limit
    );
    let _ = writeln!(
        out,
        "  OutputTokenLimit  : {} (approx. {out_low}-{out_high} english words)",
        info.output_token_limit
    );
    let _ = writeln!(
        out,
        "  Supported Methods : {}",
        info.supported_generation_methods.join(", ")
    );
    if let Some(t) = info.temperature {
        let _ = writeln!(out, "  Temperature       : {t}");
    }
    if let Some(t) = info.max_temperature {
        let _ = writeln!(out, "  MaxTemperature    : {t}");
    }
    if let Some(p) = info.top_p {
        let _ = writeln!(out, "  TopP              : {p}");
    }
    if let Some(k) = info.top_k {
        let _ = writeln!(out, "  TopK              : {k}");
    }

    let gemini = &config.gemini;
    let _ = writeln!(out, "\nUser defined AI model configuration:");
    let _ = writeln!(out, "  CandidateCount    : {}", gemini.candidate_count);
    if let Some(n) = gemini.max_output_tokens {
        let _ = writeln!(out, "  MaxOutputTokens   : {n}");
    }
    if let Some(t) = gemini.temperature {
        let _ = writeln!(out, "  Temperature       : {t}");
    }
    if let Some(p) = gemini.top_p {
        let _ = writeln!(out, "  TopP              : {p}");
    }
    if let Some(k) = gemini.top_k {
        let _ = writeln!(out, "  TopK              : {k}");
    }
    if let Some(instruction) = config.system_instruction() {
        let _ = writeln!(
            out,
            "  SystemInstruction : {}",
            truncate_middle(instruction, MAX_INSTRUCTION_DISPLAY, "...")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::MINIMAL;
    use std::path::Path;

    fn config() -> Config {
        Config::parse(MINIMAL, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn word_estimate_rounds_down_to_hundreds() {
        assert_eq!(approx_words(1_048_576), (629_100, 838_800));
        assert_eq!(approx_words(8192), (4900, 6500));
        assert_eq!(approx_words(99), (0, 0));
    }

    #[test]
    fn summary_lists_only_enabled_features() {
        let mut config = config();
        config.input.terminal = true;
        config.input.localhost = false;
        config.markdown.history = true;
        config.markdown.history_directory = "history-md".into();

        let summary = config_summary(&config);
        assert!(summary.contains("Terminal  : yes"));
        assert!(!summary.contains("(port)"));
        assert!(summary.contains("Markdown : history-md"));
        assert!(!summary.contains("execute application"));
    }

    #[test]
    fn model_report_wraps_description_and_truncates_instruction() {
        let mut config = config();
        config.gemini.system_instruction = "x".repeat(200);
        config.gemini.temperature = Some(0.5);
        let info = ModelInfo {
            name: "models/gemini-2.0-flash".to_string(),
            version: "2.0".to_string(),
            description: "word ".repeat(40),
            input_token_limit: 1_000_000,
            output_token_limit: 8192,
            supported_generation_methods: vec![
                "generateContent".to_string(),
                "countTokens".to_string(),
            ],
            ..Default::default()
        };

        let report = model_report(&info, &config, 60);
        assert!(report.contains("(approx. 600000-800000 english words)"));
        assert!(report.contains("Supported Methods : generateContent, countTokens"));
        assert!(report.contains(&format!("\n{}word", " ".repeat(VALUE_INDENT))));
        assert!(report.contains("  Temperature       : 0.5"));

        let line = report
            .lines()
            .find(|l| l.contains("SystemInstruction"))
            .unwrap();
        let value = line.split(" : ").nth(1).unwrap();
        assert_eq!(value.chars().count(), MAX_INSTRUCTION_DISPLAY);
        assert!(value.contains("..."));
    }
}
