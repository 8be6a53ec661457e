//! Game data API over real HTTP, backed by a temporary directory tree

mod common;

use common::{TestStack, NOW};
use fortress_core::port::command_runner::mocks::MockCommandRunner;
use serde_json::json;
use std::fs;

#[tokio::test]
async fn health_reports_running() {
    let stack = TestStack::start(MockCommandRunner::new()).await;

    let (status, body) = stack.get_json(&stack.game_url("/api/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "running");
    assert_eq!(body["service"], "dwarf-fortress-api");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["timestamp"], NOW);

    stack.stop().await;
}

#[tokio::test]
async fn fortress_stats_without_export_uses_placeholder() {
    let stack = TestStack::start_with(MockCommandRunner::new(), "ARM Fortress").await;

    let (status, body) = stack.get_json(&stack.game_url("/api/fortress-stats")).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "no_data");
    assert_eq!(body["population"]["total"], 0);
    assert_eq!(body["fortress_info"]["name"], "ARM Fortress");
    // Output directory is created on first access
    assert!(stack.path("output").is_dir());

    stack.stop().await;
}

#[tokio::test]
async fn fortress_stats_serves_export() {
    let stack = TestStack::start(MockCommandRunner::new()).await;
    let export = json!({
        "population": {"total": 42, "dwarves": 40, "animals": 2},
        "wealth": {"total": 1000}
    });
    fs::create_dir_all(stack.path("output")).unwrap();
    fs::write(
        stack.path("output/fortress_data.json"),
        serde_json::to_string(&export).unwrap(),
    )
    .unwrap();

    let (_, body) = stack.get_json(&stack.game_url("/api/fortress-stats")).await;
    assert_eq!(body, export);

    let (_, population) = stack
        .get_json(&stack.game_url("/api/fortress-stats/population"))
        .await;
    assert_eq!(population["total"], 42);

    let (_, wealth) = stack
        .get_json(&stack.game_url("/api/fortress-stats/wealth"))
        .await;
    assert_eq!(wealth, json!({"total": 1000}));

    stack.stop().await;
}

#[tokio::test]
async fn malformed_export_is_no_data() {
    let stack = TestStack::start(MockCommandRunner::new()).await;
    fs::create_dir_all(stack.path("output")).unwrap();
    fs::write(stack.path("output/fortress_data.json"), "{\"population\":").unwrap();

    let (status, body) = stack.get_json(&stack.game_url("/api/fortress-stats")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "no_data");

    let (_, wealth) = stack
        .get_json(&stack.game_url("/api/fortress-stats/wealth"))
        .await;
    assert_eq!(
        wealth,
        json!({"total": 0, "weapons": 0, "armor": 0, "furniture": 0, "other": 0})
    );

    stack.stop().await;
}

#[tokio::test]
async fn logs_are_tailed_without_blank_lines() {
    let stack = TestStack::start(MockCommandRunner::new()).await;
    fs::create_dir_all(stack.path("logs")).unwrap();
    let content: String = (1..=80)
        .map(|i| if i % 10 == 0 { "\n".to_string() } else { format!("line {}\n", i) })
        .collect();
    fs::write(stack.path("logs/stderr.txt"), content).unwrap();
    fs::write(stack.path("logs/dfhack.log"), "  loaded  \n").unwrap();

    let (status, body) = stack.get_json(&stack.game_url("/api/logs")).await;

    assert_eq!(status, 200);
    assert_eq!(body["timestamp"], NOW);
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);

    assert_eq!(logs[0]["file"], "stderr.txt");
    assert_eq!(logs[0]["total_lines"], 80);
    let lines = logs[0]["lines"].as_array().unwrap();
    assert!(lines.len() <= 50);
    assert!(lines.iter().all(|l| !l.as_str().unwrap().is_empty()));
    assert_eq!(lines.last().unwrap(), "line 79");

    assert_eq!(logs[1]["file"], "dfhack.log");
    assert_eq!(logs[1]["lines"], json!(["loaded"]));

    stack.stop().await;
}

#[tokio::test]
async fn saves_and_output_files_are_listed() {
    let stack = TestStack::start(MockCommandRunner::new()).await;
    fs::create_dir_all(stack.path("saves/region1")).unwrap();
    fs::create_dir_all(stack.path("output")).unwrap();
    fs::write(stack.path("output/legends.xml"), "<legends/>").unwrap();

    let (_, saves) = stack.get_json(&stack.game_url("/api/saves")).await;
    assert_eq!(saves["count"], 1);
    assert_eq!(saves["saves"][0]["name"], "region1");

    let (_, files) = stack.get_json(&stack.game_url("/api/output-files")).await;
    assert_eq!(files["count"], 1);
    assert_eq!(files["files"][0]["extension"], ".xml");
    assert_eq!(files["files"][0]["size"], 10);

    stack.stop().await;
}

#[tokio::test]
async fn export_data_acknowledges() {
    let stack = TestStack::start(MockCommandRunner::new()).await;

    let (status, body) = stack
        .post_raw(&stack.game_url("/api/export-data"), "")
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Data export triggered");
    assert!(body["note"].as_str().unwrap().contains("export_fortress_data.lua"));

    stack.stop().await;
}

#[tokio::test]
async fn system_info_and_steam_status_use_commands() {
    let runner = MockCommandRunner::new()
        .on_success("uname -a", "Linux df 6.1.0 x86_64\n")
        .on_failure("free -h", 1, "free: not found")
        .on_success("which steam", "/usr/games/steam\n");
    let stack = TestStack::start(runner).await;

    let (_, info) = stack.get_json(&stack.game_url("/api/system-info")).await;
    assert_eq!(info["system"], "Linux df 6.1.0 x86_64");
    assert_eq!(info["memory"], "Unknown");

    let (_, steam) = stack.get_json(&stack.game_url("/api/steam-status")).await;
    assert_eq!(steam["steam_available"], true);
    assert_eq!(steam["steam_path"], "/usr/games/steam");

    stack.stop().await;
}

#[tokio::test]
async fn preflight_and_unknown_paths() {
    let stack = TestStack::start(MockCommandRunner::new()).await;

    let response = stack
        .client
        .request(reqwest::Method::OPTIONS, stack.game_url("/api/saves"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );

    let (status, body) = stack.get_json(&stack.game_url("/api/unknown")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Not found"}));

    stack.stop().await;
}
