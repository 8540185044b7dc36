use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI with an isolated HOME so session files land in `home`.
pub fn run_cli(args: &[&str], home: &Path, api_url: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_celebconnect"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env_remove("RUST_LOG");
    match api_url {
        Some(url) => cmd.env("CELEBCONNECT_API_URL", url),
        None => cmd.env_remove("CELEBCONNECT_API_URL"),
    };
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async runtime so the mock server keeps serving.
pub async fn run(args: &[&str], home: &Path, api_url: &str) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home = home.to_path_buf();
    let api_url = api_url.to_string();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli(&args, &home, Some(&api_url))
    })
    .await
    .expect("CLI task panicked")
}

/// Run and expect success, returning stdout.
pub async fn run_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run(args, home, api_url).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Path of the persisted session document under `home`.
pub fn session_file(home: &Path) -> std::path::PathBuf {
    home.join("data").join("celebconnect").join("session.json")
}
