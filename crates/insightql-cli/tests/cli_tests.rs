//! Integration tests for the insightql binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Nothing listens on the discard port, so connections are refused at once
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

fn insightql_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("insightql").unwrap();
    cmd.env("INSIGHTQL_CONFIG", config_dir.path().join("config.yml"))
        .env("INSIGHTQL_MODEL_URL", DEAD_ENDPOINT)
        .env("INSIGHTQL_SEARCH_URL", DEAD_ENDPOINT)
        .env("INSIGHTQL_MAX_ATTEMPTS", "1")
        .env("INSIGHTQL_RETRY_BASE_DELAY_MS", "0")
        .env_remove("INSIGHTQL_SEARCH_INDEX")
        .env_remove("INSIGHTQL_EMBEDDING_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    insightql_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("embed"))
        .stdout(predicate::str::contains("prompt"));
}

#[test]
fn test_prompt_contains_question_and_model() {
    let dir = TempDir::new().unwrap();
    insightql_cmd(&dir)
        .args(["prompt", "Show", "me", "all", "articles", "tagged", "as", "Current"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "USER QUERY: Show me all articles tagged as Current",
        ))
        .stdout(predicate::str::contains("amazon.titan-embed-text-v2:0"))
        .stdout(predicate::str::contains("Index Name: ei_articles_index"));
}

#[test]
fn test_prompt_json_format() {
    let dir = TempDir::new().unwrap();
    let output = insightql_cmd(&dir)
        .args(["prompt", "wildfire", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["prompt"].as_str().unwrap().contains("USER QUERY: wildfire"));
}

#[test]
fn test_prompt_uses_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        r#"
model_service:
  url: http://127.0.0.1:9
  embedding_model: custom-embedder
search:
  url: http://127.0.0.1:9
  index: news_chunks
vocabulary:
  concerns: [PFAS, Talc]
"#,
    )
    .unwrap();

    insightql_cmd(&dir)
        .args(["prompt", "anything"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Index Name: news_chunks"))
        .stdout(predicate::str::contains("- Concerns: PFAS, Talc..."))
        .stdout(predicate::str::contains("\"model_id\": \"custom-embedder\""));
}

#[test]
fn test_query_falls_back_when_model_unreachable() {
    let dir = TempDir::new().unwrap();
    let output = insightql_cmd(&dir)
        .args(["--format", "json", "query", "Find articles about climate change"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!({"query": {"match_all": {}}}));
}

#[test]
fn test_search_reports_error_payload() {
    let dir = TempDir::new().unwrap();
    insightql_cmd(&dir)
        .args(["--format", "json", "search", "lawsuits"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn test_fields_require_rename() {
    let dir = TempDir::new().unwrap();
    insightql_cmd(&dir)
        .args(["search", "lawsuits", "--fields", "title,url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--rename"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "model_service:\n  url: http://127.0.0.1:9\n  max_attempts: 0\n",
    )
    .unwrap();

    insightql_cmd(&dir)
        .args(["prompt", "anything"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("max_attempts"));
}
