use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

fn send_request(
    stdin: &mut impl Write,
    stdout: &mut impl BufRead,
    request: serde_json::Value,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let serialized = serde_json::to_string(&request)?;
    writeln!(stdin, "{serialized}")?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;
    Ok(serde_json::from_str(line.trim())?)
}

#[test]
fn tool_call_without_credentials_reports_text() -> Result<(), Box<dyn std::error::Error>> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_xero-mcp"))
        .args(["serve", "--stdio"])
        .env_remove("XERO_CLIENT_ID")
        .env_remove("XERO_CLIENT_SECRET")
        .env_remove("XERO_CLIENT_BEARER_TOKEN")
        .env("XERO_API_URL", "http://127.0.0.1:9/api.xro/2.0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    let response = send_request(
        &mut stdin,
        &mut stdout,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "list-accounts" }
        }),
    )?;
    let result = response.get("result").expect("result present");
    assert!(result.get("isError").is_none());

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("");
    assert!(text.starts_with("Error listing accounts:"), "{text}");
    assert!(text.contains("not configured"));

    let _ = child.kill();
    Ok(())
}
