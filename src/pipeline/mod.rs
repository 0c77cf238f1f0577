//! Single-consumer prompt processing loop

mod document;

use std::fs;
use std::io::Write;
use std::time::Instant;

use chrono::Local;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::Config;
use crate::gemini::{AttachedFile, GenerateRequest, GenerationConfig, Generator};
use crate::output::{WriteMode, archive_and_launch, wrap_html_page, write_document};
use crate::render::Renderers;
use crate::utils::run_logged;

use document::{ResponseMeta, prompt_document, response_document};

/// Everything one processing cycle needs, built once at startup
pub(crate) struct Pipeline<'a, G: Generator + ?Sized> {
    config: &'a Config,
    renderers: Renderers,
    generator: &'a G,
    files: &'a [AttachedFile],
    model_version: String,
    generation: GenerationConfig,
}

impl<'a, G: Generator + ?Sized> Pipeline<'a, G> {
    pub(crate) fn new(
        config: &'a Config,
        renderers: Renderers,
        generator: &'a G,
        files: &'a [AttachedFile],
        model_version: &str,
    ) -> Self {
        let gemini = &config.gemini;
        Pipeline {
            config,
            renderers,
            generator,
            files,
            model_version: model_version.to_string(),
            generation: GenerationConfig {
                candidate_count: Some(gemini.candidate_count),
                max_output_tokens: gemini.max_output_tokens,
                temperature: gemini.temperature,
                top_p: gemini.top_p,
                top_k: gemini.top_k,
            },
        }
    }

    /// Process prompts in arrival order until every sender is gone.
    pub(crate) fn run(&self, mut prompts: UnboundedReceiver<String>, sources: &[String]) {
        loop {
            println!("Waiting for input from {} ...", sources.join(", "));
            let Some(prompt) = prompts.blocking_recv() else {
                tracing::info!("all input sources closed");
                return;
            };
            self.process(&prompt);
        }
    }

    /// One full cycle: notify, write prompt, generate, append response,
    /// notify, echo, archive. Only the generation result is carried as data;
    /// every other failure is logged and the cycle continues.
    pub(crate) fn process(&self, prompt: &str) {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            tracing::debug!("ignoring empty prompt");
            return;
        }
        let config = self.config;

        if config.notify.prompt {
            run_logged(config.notify.prompt_application.current());
        }
        println!("{}: Processing prompt ...", Local::now().format("%H:%M:%S"));

        let system_instruction = config.system_instruction();
        let document = prompt_document(prompt, system_instruction, self.files);
        write_document(config, &self.renderers, &document, WriteMode::Overwrite);

        let request = GenerateRequest::new(
            prompt,
            self.files,
            system_instruction,
            self.generation.clone(),
        );
        let started = Instant::now();
        let result = self.generator.generate(&request);
        let elapsed = started.elapsed();
        let finished = Local::now();
        if let Err(e) = &result {
            tracing::error!("generating content failed: {e}");
        }
        println!("{}: Processing response ...", finished.format("%H:%M:%S"));

        let meta = ResponseMeta {
            model: &config.gemini.model,
            version: &self.model_version,
            finished: finished.fixed_offset(),
            elapsed,
        };
        let document = response_document(&result, &meta);
        write_document(config, &self.renderers, &document, WriteMode::Append);
        wrap_html_page(config, prompt);

        if config.notify.response {
            run_logged(config.notify.response_application.current());
        }

        if config.ansi.channel.output {
            self.echo_ansi();
        }

        archive_and_launch(config, &finished, prompt);
    }

    fn echo_ansi(&self) {
        let path = &self.config.ansi.channel.prompt_response_file;
        match fs::read(path) {
            Ok(data) => {
                let mut stdout = std::io::stdout().lock();
                let _ = stdout.write_all(&data);
                let _ = stdout.flush();
            }
            Err(e) => tracing::error!(path = %path.display(), "failed to read ANSI file: {e}"),
        }
    }
}
