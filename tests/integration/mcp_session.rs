/// End-to-end JSON-RPC sessions against the MCP server
use caveman_tracker::mcp::McpServer;
use caveman_tracker::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn offline_server(db: &NamedTempFile) -> McpServer {
    let tracker = TrackerServer::new(db.path().to_path_buf(), Config::default(), true)
        .expect("Failed to create server");
    McpServer::new(tracker)
}

/// Feed `requests` as one line each and return the parsed response lines
async fn run_session(server: &mut McpServer, requests: &[Value]) -> Vec<Value> {
    let input = requests
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let mut output: Vec<u8> = Vec::new();

    server
        .serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .expect("session failed");

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

/// The JSON document that follows the summary line of a tool result
fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let (_, body) = text.split_once("\n\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_handshake_and_tool_listing() {
    let db = NamedTempFile::new().unwrap();
    let mut server = offline_server(&db);

    let responses = run_session(
        &mut server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "1.0"}
            }}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    // the notification produces no line
    assert_eq!(responses.len(), 2);
    assert!(server.is_initialized());
    assert_eq!(responses[0]["result"]["protocolVersion"], json!("2024-11-05"));

    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    for expected in [
        "habit_create",
        "habit_update",
        "habit_delete",
        "habit_complete",
        "habit_list",
        "task_create",
        "task_update",
        "task_complete",
        "task_uncomplete",
        "task_delete",
        "task_list",
        "dashboard_stats",
        "daily_quote",
        "calendar_day",
        "calendar_month",
        "reminder_digest",
    ] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }
}

#[tokio::test]
async fn test_habit_lifecycle_over_json_rpc() {
    let db = NamedTempFile::new().unwrap();
    let mut server = offline_server(&db);

    let created = run_session(
        &mut server,
        &[call(1, "habit_create", json!({"name": "Make Fire", "frequency": "daily"}))],
    )
    .await;
    let habit_id = tool_payload(&created[0])["habit"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let responses = run_session(
        &mut server,
        &[
            call(2, "habit_complete", json!({"habit_id": habit_id, "date": "2024-01-01"})),
            call(3, "habit_complete", json!({"habit_id": habit_id, "date": "2024-01-02"})),
            call(4, "habit_complete", json!({"habit_id": habit_id, "date": "2024-01-02"})),
            call(5, "habit_delete", json!({"habit_id": habit_id, "archive": true})),
            call(6, "habit_complete", json!({"habit_id": habit_id, "date": "2024-01-03"})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 5);
    let extended = tool_payload(&responses[1]);
    assert_eq!(extended["applied"], json!(true));
    assert_eq!(extended["change"], json!("extended"));
    assert_eq!(extended["habit"]["streak"], json!(2));

    let repeat = tool_payload(&responses[2]);
    assert_eq!(repeat["applied"], json!(false));
    assert_eq!(repeat["habit"]["streak"], json!(2));

    let refused = &responses[4]["result"];
    assert_eq!(refused["isError"], json!(true));
    assert!(refused["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error [inactive]"));
}

#[tokio::test]
async fn test_tasks_stats_and_quote() {
    let db = NamedTempFile::new().unwrap();
    let mut server = offline_server(&db);

    let responses = run_session(
        &mut server,
        &[
            call(1, "task_create", json!({"title": "Fix roof", "priority": "urgent"})),
            call(2, "task_create", json!({"title": "Skip stones", "priority": "low"})),
            call(3, "task_list", json!({})),
            call(4, "dashboard_stats", json!({})),
            call(5, "daily_quote", json!({})),
            call(6, "daily_quote", json!({})),
            call(7, "calendar_day", json!({"date": "2024-01-01"})),
        ],
    )
    .await;

    let listed = tool_payload(&responses[2]);
    assert_eq!(listed["tasks"][0]["title"], json!("Fix roof"));
    assert_eq!(listed["tasks"][1]["title"], json!("Skip stones"));

    let stats = tool_payload(&responses[3]);
    assert_eq!(stats["stats"]["total_tasks"], json!(2));
    assert_eq!(stats["stats"]["active_task_count"], json!(2));
    assert_eq!(stats["stats"]["task_completion_rate"], json!(0));

    let first_quote = tool_payload(&responses[4]);
    let second_quote = tool_payload(&responses[5]);
    assert_eq!(first_quote["quote"]["origin"], json!("fallback"));
    assert_eq!(first_quote["quote"]["content"], second_quote["quote"]["content"]);

    // neither task is due or finished on that date
    let day = tool_payload(&responses[6]);
    assert_eq!(day["day"]["date"], json!("2024-01-01"));
    assert_eq!(day["day"]["tasks"], json!([]));
}
