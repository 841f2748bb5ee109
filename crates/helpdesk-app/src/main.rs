use std::sync::Arc;

use anyhow::Result;

use helpdesk_app::config::{self, ConfigError, ENV_HELPDESK_TOKEN};
use helpdesk_app::{ChatScreen, ListScreen};
use helpdesk_api::{ReqwestHttpTransport, ServiceEndpoints, SnapshotLoader};
use helpdesk_core::report::TracingReporter;
use helpdesk_core::ErrorReporter;
use helpdesk_stream::ConnectionManager;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = parse_cli_flags()?;
    let config = match cli.config.as_deref() {
        Some(path) => config::load_from_path(path)?,
        None => config::load_from_env()?,
    };
    let token = config::required_env(ENV_HELPDESK_TOKEN)?;

    let transport = Arc::new(ReqwestHttpTransport::new(token.clone())?);
    let endpoints = ServiceEndpoints::new(
        &config.directory_url,
        &config.ticketing_url,
        &config.storage_url,
    );
    let loader = SnapshotLoader::new(transport, endpoints);

    let reporter: Arc<dyn ErrorReporter> = Arc::new(TracingReporter);
    let connection = Arc::new(ConnectionManager::new(reporter));
    connection.connect(&config.stream_url, &token).await?;

    match cli.ticket {
        Some(ticket_id) => run_chat(&loader, &connection, ticket_id).await?,
        None => run_list(&loader, &connection).await?,
    }

    connection.close();
    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Follow the ticket list until interrupted.
async fn run_list(loader: &SnapshotLoader, connection: &Arc<ConnectionManager>) -> Result<()> {
    let mut screen = ListScreen::mount(loader, connection).await?;

    loop {
        tokio::select! {
            event = screen.recv() => {
                let Some(event) = event else { break };
                tracing::info!(action = event.action(), "ticket list event");
                screen.apply(event);
                tracing::info!(tickets = screen.tickets().len(), "ticket list updated");
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    screen.unmount(connection);
    Ok(())
}

/// Follow one ticket's conversation until interrupted.
async fn run_chat(
    loader: &SnapshotLoader,
    connection: &Arc<ConnectionManager>,
    ticket_id: i64,
) -> Result<()> {
    let mut screen = ChatScreen::mount(loader, connection, ticket_id).await?;

    loop {
        tokio::select! {
            event = screen.recv() => {
                let Some(event) = event else { break };
                tracing::info!(action = event.action(), "chat event");
                screen.apply(event);
                tracing::info!(
                    ticket_id,
                    status = %screen.ticket().status_text,
                    messages = screen.messages().len(),
                    "chat updated"
                );
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    screen.unmount(connection);
    Ok(())
}

#[derive(Debug, Default)]
struct CliFlags {
    config: Option<String>,
    ticket: Option<i64>,
}

fn parse_cli_flags() -> Result<CliFlags, ConfigError> {
    let mut flags = CliFlags::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().ok_or_else(|| {
                    ConfigError::Message(
                        "Missing value after --config. Use --config <path>.".to_owned(),
                    )
                })?;
                flags.config = Some(value);
            }
            "--ticket" => {
                let value = args.next().ok_or_else(|| {
                    ConfigError::Message(
                        "Missing value after --ticket. Use --ticket <id>.".to_owned(),
                    )
                })?;
                let ticket_id = value.trim().parse::<i64>().map_err(|_| {
                    ConfigError::Message(format!("--ticket expects a numeric id, got '{value}'."))
                })?;
                flags.ticket = Some(ticket_id);
            }
            "--help" | "-h" => {
                print_cli_help();
                std::process::exit(0);
            }
            value if value.starts_with("--") => {
                return Err(ConfigError::Message(format!(
                    "Unknown flag '{value}'. Run with --help for valid flags."
                )));
            }
            unknown => {
                return Err(ConfigError::Message(format!(
                    "Unexpected argument '{unknown}'. Run with --help for valid flags."
                )));
            }
        }
    }

    Ok(flags)
}

fn print_cli_help() {
    println!("Usage: helpdesk-app [--config <path>] [--ticket <id>]");
    println!();
    println!("  --config <path>   Use a specific config file instead of HELPDESK_CONFIG");
    println!("  --ticket <id>     Follow one ticket's conversation instead of the list");
    println!("  --help            Show this help message");
}
