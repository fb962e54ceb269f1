//! Console integration tests: scripted input, mock backend, rendered output.

mod common;

use common::{client_for, sample_tool, start_backend, start_backend_with, BackendState};
use std::time::{Duration, Instant};
use tokio::io::{AsyncWriteExt, BufReader};
use tooldesk::client::HttpToolClient;
use tooldesk::console::render::{APP_TITLE, EMPTY_LIST_MESSAGE};
use tooldesk::console::{Console, Tab};
use tooldesk::types::ConsoleConfig;

/// Run the console over `script` and return it with everything it printed.
async fn run_script(url: &str, script: &str) -> (Console<HttpToolClient>, String) {
    let mut console = Console::new(client_for(url), &ConsoleConfig::default());
    let mut output = Vec::new();
    console
        .run(BufReader::new(script.as_bytes()), &mut output)
        .await
        .unwrap();
    (console, String::from_utf8(output).unwrap())
}

/// Text of the last full screen drawn.
fn last_screen(output: &str) -> &str {
    output.rsplit(APP_TITLE).next().unwrap_or_default()
}

#[tokio::test]
async fn test_mount_renders_empty_state() {
    let (url, backend) = start_backend(vec![]).await;
    let (_console, output) = run_script(&url, "quit\n").await;

    assert!(output.contains(EMPTY_LIST_MESSAGE));
    assert_eq!(backend.lock().unwrap().list_calls, 1);
}

#[tokio::test]
async fn test_mount_renders_parameter_rows() {
    let (url, _backend) = start_backend(vec![sample_tool("getWeather")]).await;
    let (console, output) = run_script(&url, "").await;

    assert!(output.contains("getWeather\n  Function: getWeather\n  Parameters:\n"));
    assert!(output.contains("    location  Type: string  city  (required)\n"));
    assert_eq!(console.shell().tools().len(), 1);
}

#[tokio::test]
async fn test_delete_refetches_and_reports_name() {
    let (url, backend) = start_backend(vec![sample_tool("getMenu"), sample_tool("placeOrder")]).await;
    let (console, output) = run_script(&url, "delete getMenu\nquit\n").await;

    let screen = last_screen(&output);
    assert!(screen.contains("[success] getMenu deleted successfully"));
    assert!(!screen.contains("\ngetMenu\n"));
    assert!(screen.contains("placeOrder"));

    assert_eq!(backend.lock().unwrap().list_calls, 2);
    assert_eq!(console.shell().catalog().names(), vec!["placeOrder"]);
}

#[tokio::test]
async fn test_delete_unknown_tool_shows_error() {
    let (url, backend) = start_backend(vec![]).await;
    let (_console, output) = run_script(&url, "delete ghost\nquit\n").await;

    assert!(last_screen(&output).contains("[error] Error deleting tool: "));
    assert!(last_screen(&output).contains("Tool 'ghost' not found"));
    assert_eq!(backend.lock().unwrap().list_calls, 1);
}

#[tokio::test]
async fn test_add_python_switches_to_list_with_one_refetch() {
    let (url, backend) = start_backend(vec![]).await;
    let script = "python\nname hello\ncode\ndef hello():\n    return 1\n.\nsubmit\nquit\n";
    let (console, output) = run_script(&url, script).await;

    let screen = last_screen(&output);
    assert!(screen.contains("[success] Python tool added successfully"));
    assert!(screen.contains("[Available Tools]"));
    assert!(screen.contains("hello"));

    assert_eq!(console.shell().tab(), Tab::List);
    let state = backend.lock().unwrap();
    assert_eq!(state.list_calls, 2);
    assert_eq!(state.requests.len(), 1);
    assert_eq!(state.requests[0].1["function_code"], "def hello():\n    return 1");
    assert_eq!(state.requests[0].1["function_name"], "hello");
}

#[tokio::test]
async fn test_add_python_backend_error_stays_on_form() {
    let (url, backend) = start_backend(vec![]).await;
    let script = "python\ncode\nprint('no function here')\n.\nsubmit\nquit\n";
    let (console, output) = run_script(&url, script).await;

    let screen = last_screen(&output);
    assert!(screen.contains("[error] Error adding tool: "));
    assert!(screen.contains("[Add Python Tool]"));
    assert_eq!(console.shell().tab(), Tab::AddPython);
    assert!(console.python_form().error().is_some());
    assert_eq!(backend.lock().unwrap().list_calls, 1);
}

#[tokio::test]
async fn test_openapi_invalid_json_never_reaches_backend() {
    let (url, backend) = start_backend(vec![]).await;
    let script = "openapi\nspec\n{ \"openapi\": \n.\nsubmit\nquit\n";
    let (console, output) = run_script(&url, script).await;

    let screen = last_screen(&output);
    assert!(screen.contains("Error: invalid OpenAPI spec:"));
    assert_eq!(console.shell().tab(), Tab::AddOpenApi);

    let state = backend.lock().unwrap();
    assert!(state.requests.is_empty());
    assert_eq!(state.list_calls, 1);
}

#[tokio::test]
async fn test_openapi_default_spec_with_operation_id() {
    let (url, backend) = start_backend(vec![]).await;
    let (console, output) = run_script(&url, "openapi\nop getExample\nsubmit\nquit\n").await;

    assert!(last_screen(&output).contains("[success] OpenAPI tool added successfully"));
    assert!(console.shell().catalog().has_tool("getExample"));

    let state = backend.lock().unwrap();
    assert_eq!(state.requests[0].1["operation_id"], "getExample");
    assert_eq!(state.list_calls, 2);
}

#[tokio::test]
async fn test_form_commands_require_their_tab() {
    let (url, _backend) = start_backend(vec![]).await;
    let (console, output) = run_script(&url, "name other\nsubmit\nquit\n").await;

    assert!(output.contains("`name` is only available on the Add Python Tool tab"));
    assert!(last_screen(&output).contains("nothing to submit on the list tab"));
    assert_eq!(console.python_form().function_name, "getWeather");
}

#[tokio::test]
async fn test_load_reads_file_into_form() {
    let (url, backend) = start_backend(vec![]).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ping.py");
    std::fs::write(&path, "def ping():\n    return 'pong'\n").unwrap();

    let script = format!("python\nname ping\nload {}\nsubmit\nquit\n", path.display());
    let (_console, _output) = run_script(&url, &script).await;

    let state = backend.lock().unwrap();
    assert_eq!(
        state.requests[0].1["function_code"],
        "def ping():\n    return 'pong'\n"
    );
}

#[tokio::test]
async fn test_status_clears_without_input() {
    let (url, _backend) = start_backend(vec![sample_tool("getMenu")]).await;
    let config = ConsoleConfig {
        status_ttl: Duration::from_millis(100),
        ..ConsoleConfig::default()
    };
    let mut console = Console::new(client_for(&url), &config);

    let (mut writer, reader) = tokio::io::duplex(1024);
    let feeder = tokio::spawn(async move {
        writer.write_all(b"delete getMenu\n").await.unwrap();
        // Hold the input open, silent, well past the status lifetime
        tokio::time::sleep(Duration::from_millis(600)).await;
        drop(writer);
    });

    let mut output = Vec::new();
    console.run(BufReader::new(reader), &mut output).await.unwrap();
    feeder.await.unwrap();

    let output = String::from_utf8(output).unwrap();
    let screens: Vec<&str> = output.split(APP_TITLE).skip(1).collect();
    // mount, after delete, after expiry
    assert_eq!(screens.len(), 3);
    assert!(screens[1].contains("getMenu deleted successfully"));
    assert!(!screens[2].contains("deleted successfully"));
    assert!(console.shell().status().is_none());
}

#[tokio::test]
async fn test_add_with_non_tool_echo_switches_to_list() {
    let (url, backend) = start_backend_with(BackendState {
        add_echo: Some(serde_json::json!({"status": "registered"})),
        ..Default::default()
    })
    .await;
    let script = "python\nname hello\ncode\ndef hello():\n    return 1\n.\nsubmit\nquit\n";
    let (console, output) = run_script(&url, script).await;

    let screen = last_screen(&output);
    assert!(screen.contains("[success] Python tool added successfully"));
    assert!(screen.contains("hello"));
    assert_eq!(console.shell().tab(), Tab::List);
    assert!(console.python_form().error().is_none());
    assert_eq!(backend.lock().unwrap().list_calls, 2);
}

#[tokio::test]
async fn test_status_clears_while_request_is_outstanding() {
    let (url, _backend) = start_backend_with(BackendState {
        slow_list: Some(Duration::from_millis(800)),
        ..Default::default()
    })
    .await;
    let config = ConsoleConfig {
        status_ttl: Duration::from_millis(100),
        ..ConsoleConfig::default()
    };
    let mut console = Console::new(client_for(&url), &config);

    let started = Instant::now();
    let mut output = Vec::new();
    console
        .run(
            BufReader::new("delete ghost\nrefresh\nquit\n".as_bytes()),
            &mut output,
        )
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(800));

    let output = String::from_utf8(output).unwrap();
    let screens: Vec<&str> = output.split(APP_TITLE).skip(1).collect();
    // mount, after delete, banner expiry during the slow refresh, after refresh
    assert_eq!(screens.len(), 4);
    assert!(screens[1].contains("[error] Error deleting tool: "));
    assert!(!screens[2].contains("[error]"));
    assert!(!screens[3].contains("[error]"));
}
