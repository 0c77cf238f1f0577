//! Markdown documents for one prompt/response exchange

use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::consts::{GENERATED_FORMAT, TIMESTAMP_FORMAT};
use crate::error::GeminiError;
use crate::gemini::types::{Candidate, Part};
use crate::gemini::{AttachedFile, GenerateResponse};
use crate::utils::pluralize;

const SEPARATOR: &str = "\n***\n";

/// Facts about the generation call shown below every response
#[derive(Debug, Clone)]
pub(crate) struct ResponseMeta<'a> {
    pub(crate) model: &'a str,
    pub(crate) version: &'a str,
    pub(crate) finished: DateTime<FixedOffset>,
    pub(crate) elapsed: Duration,
}

pub(crate) fn prompt_document(
    prompt: &str,
    system_instruction: Option<&str>,
    files: &[AttachedFile],
) -> String {
    let mut doc = String::from("***\n**Prompt to Gemini:**\n");
    push_literal_block(&mut doc, prompt);
    doc.push_str(SEPARATOR);

    if let Some(instruction) = system_instruction {
        doc.push_str("**System Instruction to Gemini:**\n");
        push_literal_block(&mut doc, instruction);
        doc.push_str(SEPARATOR);
    }

    let active: Vec<&AttachedFile> = files.iter().filter(|f| f.is_active()).collect();
    if !active.is_empty() {
        doc.push_str("**Data referenced by the Prompt:**\n\n```plaintext\n");
        for file in active {
            let updated = file
                .update_time
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| "unknown".to_string());
            doc.push_str(&format!(
                "{} ({updated}, {:.1} KiB, {})\n",
                file.display_name,
                file.size_kib(),
                file.mime_type
            ));
        }
        doc.push_str("```\n");
        doc.push_str(SEPARATOR);
    }

    doc
}

fn push_literal_block(doc: &mut String, text: &str) {
    doc.push_str("\n```plaintext\n");
    doc.push_str(text);
    doc.push_str("\n```\n");
}

/// Response document; a failed call is rendered as an error block.
pub(crate) fn response_document(
    result: &Result<GenerateResponse, GeminiError>,
    meta: &ResponseMeta<'_>,
) -> String {
    let mut doc = String::new();
    match result {
        Ok(response) => {
            let several = response.candidates.len() > 1;
            for (i, candidate) in response.candidates.iter().enumerate() {
                push_candidate(&mut doc, candidate, several.then_some(i + 1));
            }
        }
        Err(e) => {
            doc.push_str("**Error Response from Gemini:**\n");
            push_literal_block(&mut doc, &e.to_string());
            doc.push_str(SEPARATOR);
        }
    }
    push_metadata(&mut doc, result, meta);
    doc
}

fn push_candidate(doc: &mut String, candidate: &Candidate, number: Option<usize>) {
    match number {
        Some(n) => doc.push_str(&format!("**Response from Gemini (Candidate #{n}):**\n\n")),
        None => doc.push_str("**Response from Gemini:**\n\n"),
    }

    match candidate.content.as_ref().filter(|c| !c.parts.is_empty()) {
        None => doc.push_str("No content available in this candidate.\n"),
        Some(content) => {
            let several = content.parts.len() > 1;
            for (j, part) in content.parts.iter().enumerate() {
                if several {
                    doc.push_str(&format!("\nPart #{}:\n", j + 1));
                }
                match part {
                    Part::Text(text) => {
                        doc.push_str(text);
                        doc.push('\n');
                    }
                    Part::FileData { uri, mime_type } => {
                        doc.push_str(&format!("File Data: URI={uri}, MIME={mime_type}\n"));
                    }
                    Part::Unsupported(kind) => {
                        doc.push_str(&format!("Unsupported part type: {kind}\n"));
                    }
                }
            }
            doc.push('\n');
        }
    }

    let sources = candidate
        .citation_metadata
        .as_ref()
        .map(|m| m.citation_sources.as_slice())
        .unwrap_or_default();

    let uris: Vec<&str> = sources
        .iter()
        .filter_map(|s| s.uri.as_deref())
        .filter(|u| !u.is_empty())
        .collect();
    if !uris.is_empty() {
        doc.push_str(SEPARATOR);
        doc.push_str(&format!(
            "Text Citation {}:\n\n",
            pluralize(uris.len(), "Source")
        ));
        for uri in uris {
            doc.push_str(&format!("* [{uri}]({uri})\n"));
        }
    }

    let licenses: Vec<&str> = sources
        .iter()
        .filter_map(|s| s.license.as_deref())
        .filter(|l| !l.is_empty())
        .collect();
    if !licenses.is_empty() {
        doc.push_str(SEPARATOR);
        doc.push_str(&format!(
            "Code Citation {}:\n\n",
            pluralize(licenses.len(), "License")
        ));
        for license in licenses {
            doc.push_str(&format!("* {license}\n"));
        }
    }

    if !candidate.finished_normally() {
        let reason = candidate
            .finish_reason
            .as_deref()
            .unwrap_or("FINISH_REASON_UNSPECIFIED");
        doc.push_str(SEPARATOR);
        doc.push_str(&format!(
            "Model stopped generating tokens (content) with reason [{reason}].\n"
        ));
    }

    doc.push_str(SEPARATOR);
}

fn push_metadata(
    doc: &mut String,
    result: &Result<GenerateResponse, GeminiError>,
    meta: &ResponseMeta<'_>,
) {
    let secs = meta.elapsed.as_secs_f64();
    doc.push_str("```plaintext\n");
    doc.push_str(&format!(
        "AI model   : {} (version {})\n",
        meta.model.trim_start_matches("models/"),
        meta.version
    ));
    doc.push_str(&format!(
        "Generated  : {}\n",
        meta.finished.format(GENERATED_FORMAT)
    ));

    match result {
        Ok(response) => {
            let count = response.candidates.len();
            doc.push_str(&format!(
                "Processing : {secs:.1} secs for {count} {}\n",
                pluralize(count, "candidate")
            ));
            if let Some(usage) = &response.usage_metadata {
                doc.push_str(&format!(
                    "Tokens     : {} (in: {}, out: {})\n",
                    usage.total_token_count, usage.prompt_token_count, usage.candidates_token_count
                ));
            }
            if let Some(reason) = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                doc.push_str(&format!("Blocked    : {reason}\n"));
            }
        }
        Err(_) => {
            doc.push_str(&format!("Processing : {secs:.1} secs resulting in error\n"));
        }
    }

    doc.push_str("```\n");
    doc.push_str(SEPARATOR);
}
