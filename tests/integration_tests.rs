use std::process::{Command, Output};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn abcompare_binary() -> String {
    env!("CARGO_BIN_EXE_abcompare").to_string()
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn run(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = dir.path().join("missing.ini");
        Command::new(abcompare_binary())
            .arg("-c")
            .arg(config)
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute abcompare")
    })
    .await
    .unwrap()
}

async fn mock_pair() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":false}"))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_help_command() {
    let output = Command::new(abcompare_binary())
        .arg("--help")
        .output()
        .expect("Failed to execute abcompare");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Send two HTTP requests side by side"));
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_version_command() {
    let output = Command::new(abcompare_binary())
        .arg("--version")
        .output()
        .expect("Failed to execute abcompare");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("abcompare"));
}

#[test]
fn test_invalid_view() {
    let output = Command::new(abcompare_binary())
        .args(["--view", "sideways"])
        .output()
        .expect("Failed to execute abcompare");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown view"));
}

#[tokio::test]
async fn test_json_output() {
    let server = mock_pair().await;
    let output = run(vec![
        "--a-url".to_string(),
        format!("{}/v1/ping", server.uri()),
        "--b-url".to_string(),
        format!("{}/v2/ping", server.uri()),
        "--headers".to_string(),
        "{}".to_string(),
        "-o".to_string(),
        "json".to_string(),
    ])
    .await;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["resultA"]["status"], 200);
    assert_eq!(json["resultA"]["data"], "{\n  \"ok\": true\n}");
    assert_eq!(json["resultA"]["contentKind"], "json");
    assert_eq!(json["resultB"]["data"], "{\n  \"ok\": false\n}");
    assert_eq!(json["displayFormat"], "json");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Compare finished"));
}

#[tokio::test]
async fn test_text_output_shows_cards_and_diff() {
    let server = mock_pair().await;
    let output = run(vec![
        "--a-url".to_string(),
        format!("{}/v1/ping", server.uri()),
        "--b-url".to_string(),
        format!("{}/v2/ping", server.uri()),
        "--no-color".to_string(),
    ])
    .await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Original Server  200"));
    assert!(stdout.contains("Other Server  200"));
    assert!(stdout.contains("Left: Original vs Right: Others  [Format: json]"));
    assert!(stdout.contains("\"ok\": true"));
    assert!(stdout.contains("\"ok\": false"));
}

#[tokio::test]
async fn test_exit_code_on_difference() {
    let server = mock_pair().await;
    let differ = run(vec![
        "--a-url".to_string(),
        format!("{}/v1/ping", server.uri()),
        "--b-url".to_string(),
        format!("{}/v2/ping", server.uri()),
        "--exit-code".to_string(),
    ])
    .await;
    assert_eq!(differ.status.code(), Some(1));

    let same = run(vec![
        "--a-url".to_string(),
        format!("{}/v1/ping", server.uri()),
        "--b-url".to_string(),
        format!("{}/v1/ping", server.uri()),
        "--exit-code".to_string(),
    ])
    .await;
    assert_eq!(same.status.code(), Some(0));
}

#[tokio::test]
async fn test_invalid_body_is_reported_in_result() {
    let server = mock_pair().await;
    let output = run(vec![
        "--a-url".to_string(),
        format!("{}/v1/ping", server.uri()),
        "--b-url".to_string(),
        format!("{}/v2/ping", server.uri()),
        "--b-method".to_string(),
        "POST".to_string(),
        "--b-body".to_string(),
        "not-json".to_string(),
        "-o".to_string(),
        "json".to_string(),
    ])
    .await;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["resultB"]["status"], 0);
    assert_eq!(json["resultB"]["data"], "{\n  \"error\": \"Invalid JSON in Body\"\n}");
    assert_eq!(json["resultA"]["status"], 200);
}

#[tokio::test]
async fn test_config_file_supplies_requests() {
    let server = mock_pair().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join(".abcompare");
    std::fs::write(
        &config_path,
        format!(
            "[a]\n\
             url = {uri}/v1/ping\n\
             headers = {{}}\n\
             [b]\n\
             url = {uri}/v1/ping\n\
             headers = {{}}\n",
            uri = server.uri()
        ),
    )
    .expect("Failed to write config file");

    let output = tokio::task::spawn_blocking(move || {
        Command::new(abcompare_binary())
            .arg("-c")
            .arg(&config_path)
            .args(["-o", "json"])
            .output()
            .expect("Failed to execute abcompare")
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["resultA"]["data"], json["resultB"]["data"]);
    assert_eq!(json["resultA"]["status"], 200);
}

#[test]
fn test_repl_reads_commands_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = tempdir().expect("Failed to create temp dir");
    let mut child = Command::new(abcompare_binary())
        .arg("-c")
        .arg(dir.path().join("missing.ini"))
        .args(["-i", "--no-color"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn abcompare");

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(b"set a.params {\"a\":1}\nformat a.params\nset b.url https://b.example.com/\ncopy\nshow b\nview a\nexit\n")
            .expect("Failed to write to stdin");
    }
    let output = child.wait_with_output().expect("Failed to read stdout");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("\"a\": 1"));
    assert!(stdout.contains("GET https://b.example.com/"));
    assert!(stdout.contains("Press \"run\" to start the comparison."));
    assert!(stderr.contains("JSON Formatted"));
    assert!(stderr.contains("Config copied"));
}
