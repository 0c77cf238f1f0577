//! Startup sequence and the long-running prompt session

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::assets::{write_page_assets, write_prompt_input_page};
use crate::cli::Cli;
use crate::config::Config;
use crate::consts::UPLOAD_POLL_INTERVAL;
use crate::error::AppError;
use crate::gemini::upload::{ProcessingWait, delete_files, upload_files};
use crate::gemini::{AttachedFile, GeminiClient};
use crate::input::start_input_readers;
use crate::output::{
    Channel, config_summary, model_report, print_dryrun_table, print_model_table,
};
use crate::pipeline::Pipeline;
use crate::render::Renderers;
use crate::utils::files::{expand_patterns, read_upload_list};

fn print_banner() {
    println!(
        "{} {}\n{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION")
    );
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let path = Config::locate(cli.config.as_deref());
    if Config::ensure_exists(&path)? {
        println!("\nDefault configuration written to \"{}\"", path.display());
    }
    tracing::debug!(path = %path.display(), "loading configuration");

    let mut config = Config::load(&path)?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Upload list entries first, then positional arguments, globs expanded
fn collect_files(cli: &Cli) -> Vec<PathBuf> {
    let mut entries = Vec::new();
    if let Some(list) = &cli.uploads {
        match read_upload_list(list) {
            Ok(listed) => entries.extend(listed),
            Err(e) => tracing::error!(path = %list.display(), "failed to read upload list: {e}"),
        }
    }
    entries.extend(cli.files.iter().cloned());
    expand_patterns(&entries)
}

fn create_dir(path: &Path) -> Result<(), AppError> {
    fs::create_dir_all(path).map_err(|source| AppError::Io {
        action: "create directory",
        path: path.to_path_buf(),
        source,
    })
}

/// History directories, page assets and the browser input page
fn prepare_filesystem(config: &Config) -> Result<(), AppError> {
    for channel in Channel::ALL {
        let settings = config.channel(channel);
        if settings.history {
            create_dir(&settings.history_directory)?;
        }
    }

    let html = &config.html.channel;
    let base = html
        .prompt_response_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    write_page_assets(base)?;
    if html.history {
        write_page_assets(&html.history_directory)?;
    }

    if config.input.localhost {
        write_prompt_input_page(Path::new("."))?;
    }
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Release remote files and end the process once a termination signal arrives
async fn shutdown_on_signal(client: Arc<GeminiClient>, files: Vec<AttachedFile>) {
    wait_for_signal().await;
    println!("\nShutdown signal received. Exiting gracefully ...");

    let cleanup = tokio::task::spawn_blocking(move || delete_files(client.as_ref(), &files));
    if let Err(e) = cleanup.await {
        tracing::error!("file cleanup did not finish: {e}");
    }
    println!("Done");
    std::process::exit(0);
}

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    print_banner();

    let config = load_config(cli)?;
    let files = collect_files(cli);

    if cli.dryrun {
        print_dryrun_table(&files, cli.use_color());
        return Ok(());
    }

    let client = Arc::new(GeminiClient::new(
        &config.gemini.api_key,
        &config.gemini.model,
        Some(config.general.internet_proxy.as_str()),
    )?);

    if cli.models {
        let models = client.list_models()?;
        print_model_table(&models, cli.use_color());
        return Ok(());
    }

    print!("{}", config_summary(&config));
    prepare_filesystem(&config)?;

    let renderers = Renderers::from_config(&config);
    let info = client.model_info()?;
    print!("{}", model_report(&info, &config, renderers.ansi.width()));

    let uploaded = upload_files(
        client.as_ref(),
        &files,
        ProcessingWait {
            max_wait: Duration::from_secs(config.gemini.max_wait_file_processing),
            poll_interval: UPLOAD_POLL_INTERVAL,
        },
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    let (sender, prompts) = mpsc::unbounded_channel();
    let sources = {
        let _guard = runtime.enter();
        start_input_readers(&config.input, &sender)
    };
    drop(sender);

    if sources.is_empty() {
        println!("\nNo input source enabled in [input], nothing to do.");
        delete_files(client.as_ref(), &uploaded);
        return Ok(());
    }

    runtime.spawn(shutdown_on_signal(Arc::clone(&client), uploaded.clone()));
    println!("\nProgram termination:\n  Press CTRL-C to terminate this program.\n");

    let pipeline = Pipeline::new(&config, renderers, client.as_ref(), &uploaded, &info.version);
    pipeline.run(prompts, &sources);

    delete_files(client.as_ref(), &uploaded);
    Ok(())
}
