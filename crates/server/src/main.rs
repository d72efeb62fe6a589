//! `evolution-mcp`: the Evolution WhatsApp API as MCP tools.

mod call;
mod http;
mod server;

use clap::{Parser, Subcommand, ValueEnum};
use evolution_mcp_tools::config::{API_KEY_ENV, API_URL_ENV, INSTANCE_ENV};
use evolution_mcp_tools::{AmbientConfig, Dispatcher, listing};
use rmcp::{ServiceExt as _, transport::stdio};
use std::net::SocketAddr;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "evolution-mcp", version, about = "Evolution WhatsApp API over MCP")]
struct Cli {
    /// Evolution API key (sent as the `apikey` header).
    #[arg(long, env = API_KEY_ENV, global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Instance name used by instance-scoped tools.
    #[arg(long, env = INSTANCE_ENV, global = true)]
    instance: Option<String>,

    /// API base URL. A bare `host:port` is addressed over https.
    #[arg(long, env = API_URL_ENV, global = true)]
    api_url: Option<String>,

    /// Log level (overridden by `RUST_LOG`).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve MCP over stdin/stdout (default).
    Stdio,
    /// Serve MCP over streamable HTTP at `/mcp`.
    Http {
        #[arg(long, default_value = "127.0.0.1:8787")]
        bind: SocketAddr,
    },
    /// Run a single tool and print its result envelope.
    Call {
        /// Tool name, e.g. `send_text`.
        operation: String,
        /// Arguments as a JSON object.
        arguments: Option<String>,
    },
    /// Print the tool catalog as JSON.
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let config = AmbientConfig::new(cli.api_key, cli.instance, cli.api_url);
    info!(
        tools = listing::tools().len(),
        fingerprint = %listing::fingerprint(),
        api_url = config.api_base_url(),
        "catalog loaded"
    );
    let dispatcher = Dispatcher::with_http_client(config);

    match cli.command.unwrap_or(Command::Stdio) {
        Command::Stdio => {
            info!("serving MCP over stdio");
            let service = server::EvolutionServer::new(dispatcher)
                .serve(stdio())
                .await?;
            service.waiting().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Http { bind } => {
            http::serve(bind, dispatcher).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Call {
            operation,
            arguments,
        } => Ok(call::run(&dispatcher, &operation, arguments.as_deref()).await),
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(listing::tools())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr: stdout belongs to the stdio transport and the `call`/`tools` output.
fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
