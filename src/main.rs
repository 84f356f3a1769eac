use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing_subscriber::EnvFilter;

mod attachments;
mod config;
mod handlers;
mod mcp;
mod tools;
mod xero;

use attachments::{AttachmentError, AttachmentInput};
use config::XeroConfig;
use tools::ToolContext;
use xero::XeroClient;

#[derive(Parser)]
#[command(name = "xero-mcp")]
#[command(version, about = "Xero accounting tools served over MCP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
#[command(
    group(
        clap::ArgGroup::new("input")
            .required(true)
            .multiple(false)
            .args(["path", "base64"])
    )
)]
struct PrepareAttachmentArgs {
    /// Path to the file to attach
    #[arg(long)]
    path: Option<String>,
    /// Base64-encoded file content
    #[arg(long)]
    base64: Option<String>,
    /// File name override (required with --base64)
    #[arg(long)]
    file_name: Option<String>,
    /// MIME type override
    #[arg(long)]
    mime_type: Option<String>,
    /// Output the processed attachment as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
        #[command(flatten)]
        config: XeroConfig,
    },
    /// Invoke a single tool and print its text result
    Call {
        /// Tool name, e.g. list-accounts
        name: String,
        /// Tool arguments as a JSON object
        #[arg(long)]
        arguments: Option<String>,
        #[command(flatten)]
        config: XeroConfig,
    },
    /// List available tools
    Tools,
    /// Load and normalize an attachment locally without uploading it
    PrepareAttachment(PrepareAttachmentArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before parsing so clap's env fallbacks see .env values.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { stdio, config } => {
            if stdio {
                run_stdio_server(connect(config)?).await
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::Call {
            name,
            arguments,
            config,
        } => run_call(connect(config)?, &name, arguments.as_deref()).await,
        Commands::Tools => {
            for (name, description, _) in mcp::TOOLS {
                println!("{name}\t{description}");
            }
            Ok(())
        }
        Commands::PrepareAttachment(args) => run_prepare_attachment(args).await,
    }
}

fn connect(config: XeroConfig) -> Result<ToolContext> {
    if config.client_credentials().is_none() && config.bearer_token().is_none() {
        tracing::warn!("Xero credentials are not configured; tool calls will fail");
    }
    let client = XeroClient::new(config).context("failed to build Xero client")?;
    Ok(ToolContext::new(Arc::new(client)))
}

async fn run_call(ctx: ToolContext, name: &str, arguments: Option<&str>) -> Result<()> {
    let args = match arguments {
        Some(raw) => serde_json::from_str(raw).context("--arguments must be valid JSON")?,
        None => json!({}),
    };
    let result = tools::call(&ctx, name, &args).await;
    println!("{}", result_text(&result));
    Ok(())
}

async fn run_prepare_attachment(args: PrepareAttachmentArgs) -> Result<()> {
    let input = AttachmentInput {
        file_name: args.file_name,
        mime_type: args.mime_type,
        file_path: args.path,
        base64_content: args.base64,
    };

    let prepared = match attachments::normalize(std::slice::from_ref(&input)).await {
        Ok(mut prepared) => prepared.pop(),
        Err(err) => fail(&err, args.json),
    };
    let Some(prepared) = prepared else {
        anyhow::bail!("no attachment was produced");
    };
    let size = match STANDARD.decode(&prepared.base64_content) {
        Ok(bytes) => bytes.len(),
        Err(err) => fail(
            &AttachmentError::InvalidBase64 {
                file_name: prepared.file_name.clone(),
                reason: err.to_string(),
            },
            args.json,
        ),
    };

    if args.json {
        let output = serde_json::to_string_pretty(&json!({
            "fileName": prepared.file_name,
            "mimeType": prepared.mime_type,
            "size": size,
            "base64Content": prepared.base64_content,
        }))?;
        println!("{output}");
        return Ok(());
    }

    println!("{} ({}, {size} bytes)", prepared.file_name, prepared.mime_type);
    Ok(())
}

fn fail(err: &AttachmentError, json_output: bool) -> ! {
    if json_output {
        eprintln!(
            "{}",
            json!({ "error": { "kind": err.kind(), "message": err.to_string() } })
        );
    } else {
        eprintln!("{err}");
    }
    process::exit(1);
}

fn result_text(result: &Value) -> &str {
    result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("")
}

async fn run_stdio_server(ctx: ToolContext) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut writer = BufWriter::new(tokio::io::stdout());

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed request");
                continue;
            }
        };

        let Some(response) = handle_request(&ctx, &request).await else {
            continue;
        };
        let serialized = serde_json::to_string(&response).context("failed to serialize response")?;
        writer
            .write_all(serialized.as_bytes())
            .await
            .context("failed to write response")?;
        writer
            .write_all(b"\n")
            .await
            .context("failed to write response")?;
        writer.flush().await.context("failed to flush response")?;
    }

    Ok(())
}

/// Returns `None` for notifications, which never get a reply.
async fn handle_request(ctx: &ToolContext, request: &Value) -> Option<Value> {
    let method = request.get("method").and_then(|value| value.as_str());
    let id = request.get("id").cloned()?;

    let result = match method {
        Some("initialize") => json!({
            "protocolVersion": "2025-11-25",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
        Some("ping") => json!({}),
        Some("tools/list") => json!({
            "tools": mcp::tool_definitions()
        }),
        Some("tools/call") => handle_tool_call(ctx, request).await,
        other => {
            return Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": -32601,
                    "message": format!("Method not found: {}", other.unwrap_or(""))
                }
            }));
        }
    };

    Some(json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    }))
}

async fn handle_tool_call(ctx: &ToolContext, request: &Value) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result("parsing arguments", "params must be an object");
    };

    let Some(name) = params.get("name").and_then(|value| value.as_str()) else {
        return tools::error_result("parsing arguments", "params.name must be a string");
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    tools::call(ctx, name, &args).await
}
