use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "gemini-prompt-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

/// Minimal configuration with a literal key and current files inside `root`
fn write_config(root: &Path, extra: &str) -> PathBuf {
    let path = root.join("gemini-prompt.toml");
    let root = root.display().to_string().replace('\\', "/");
    write_file(
        &path,
        &format!(
            r#"[gemini]
api_key = "pass:test-key"
model = "gemini-2.0-flash"

[markdown]
prompt_response_file = "{root}/prompt-response.md"

[ansi]
prompt_response_file = "{root}/prompt-response.ansi"

[html]
prompt_response_file = "{root}/prompt-response.html"
{extra}"#
        ),
    );
    path
}

fn run_gemini_prompt(args: &[&str], cwd: &Path) -> (bool, String, String) {
    let bin = std::env::var("CARGO_BIN_EXE_gemini-prompt").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("gemini-prompt.exe");
        } else {
            path.push("gemini-prompt");
        }
        path.to_string_lossy().into_owned()
    });
    let output = Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("run gemini-prompt");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn dryrun_lists_files_with_status_and_mime_type() {
    let root = unique_temp_dir("dryrun");
    let config = write_config(&root, "");
    write_file(&root.join("notes.txt"), "meeting notes");
    write_file(&root.join("data/a.json"), "{}");
    write_file(&root.join("data/b.json"), "[]");
    write_file(&root.join("uploads.txt"), "# attachments\nnotes.txt\n\n");

    let (ok, stdout, stderr) = run_gemini_prompt(
        &[
            "--config",
            config.to_str().unwrap(),
            "--dryrun",
            "--uploads",
            "uploads.txt",
            "data/*.json",
            "missing.pdf",
        ],
        &root,
    );
    assert!(ok, "stderr: {stderr}");

    assert!(stdout.contains("Files to upload (dry run):"), "{stdout}");
    assert!(stdout.contains("notes.txt"));
    assert!(stdout.contains("text/plain"));
    assert!(stdout.contains("a.json"));
    assert!(stdout.contains("b.json"));
    assert!(stdout.contains("application/json"));
    assert!(stdout.contains("missing.pdf"));
    assert!(stdout.contains("error"));
    assert!(stdout.contains("4 file(s), 1 with errors"));

    // nothing is rendered or contacted in a dry run
    assert!(!root.join("prompt-response.md").exists());
}

#[test]
fn unsupported_filename_schema_fails_at_startup() {
    let root = unique_temp_dir("schema");
    let config = write_config(&root, "\n[history]\nfilename_schema = \"random\"\n");

    let (ok, _stdout, stderr) =
        run_gemini_prompt(&["--config", config.to_str().unwrap(), "--dryrun"], &root);
    assert!(!ok);
    assert!(stderr.contains("Error:"), "{stderr}");
    assert!(stderr.contains("random"), "{stderr}");
}

#[test]
fn missing_config_is_written_then_requires_api_key() {
    let root = unique_temp_dir("default-config");
    let config = root.join("conf").join("gemini-prompt.toml");

    let (ok, stdout, stderr) =
        run_gemini_prompt(&["--config", config.to_str().unwrap(), "--dryrun"], &root);
    assert!(!ok);
    assert!(config.is_file());
    assert!(stdout.contains("Default configuration written"), "{stdout}");
    assert!(stderr.contains("GEMINI_API_KEY"), "{stderr}");

    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("[gemini]"));
    assert!(written.contains("filename_schema = \"prompt\""));
}

#[test]
fn zero_candidates_override_is_rejected() {
    let root = unique_temp_dir("candidates");
    let config = write_config(&root, "");

    let (ok, _stdout, stderr) = run_gemini_prompt(
        &["--config", config.to_str().unwrap(), "--candidates", "0", "--dryrun"],
        &root,
    );
    assert!(!ok);
    assert!(stderr.contains("gemini.candidate_count must be greater than 0"), "{stderr}");
}

#[test]
fn version_flag_prints_package_version() {
    let root = unique_temp_dir("version");
    let (ok, stdout, _stderr) = run_gemini_prompt(&["--version"], &root);
    assert!(ok);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
