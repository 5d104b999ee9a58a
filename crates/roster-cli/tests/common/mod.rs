use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI with a custom HOME directory for isolated session storage.
pub fn run_cli(args: &[&str], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_roster"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env_remove("ROSTER_API_URL");
    cmd.env_remove("ROSTER_PASSWORD");
    cmd.env("NO_COLOR", "1");
    cmd.current_dir(home);
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async test thread so the mock server keeps serving.
pub async fn run(args: &[&str], home: &Path) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home = home.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli(&args, &home)
    })
    .await
    .expect("CLI task panicked")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_success(args: &[&str], home: &Path) -> String {
    let output = run(args, home).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_failure(args: &[&str], home: &Path) -> String {
    let output = run(args, home).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn server_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

/// Mount the login endpoint and log in.
pub async fn login(server: &MockServer, home: &Path) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "cli-access",
            "refreshToken": "cli-refresh",
            "user": {"name": "Akosua", "email": "hr@example.com", "role": "admin"}
        })))
        .mount(server)
        .await;

    let url = server_url(server);
    run_success(
        &[
            "login",
            "--email",
            "hr@example.com",
            "--password",
            "secret",
            "--api",
            &url,
        ],
        home,
    )
    .await;
}
