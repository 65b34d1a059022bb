use std::sync::Arc;

use clap::Parser;

use mcp_reference::{Config, LineTransport, Server, TransportKind, http_router, reference_registry, serve};

fn build_server(config: &Config) -> Result<Server, mcp_reference::McpError> {
    let registry = reference_registry(config.quote_seed)?;
    Ok(Server::builder()
        .registry(registry)
        .server_info(config.server_name.as_str(), config.server_version.as_str())
        .strict_handshake(config.strict_handshake)
        .build())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    mcp_reference::logging::init_logging(&config.log_level, config.log_json);

    let srv = Arc::new(build_server(&config)?);
    tracing::info!(
        name = %config.server_name,
        version = %config.server_version,
        transport = ?config.transport,
        strict_handshake = config.strict_handshake,
        "starting MCP server"
    );

    match config.transport {
        TransportKind::Stdio => {
            let mut transport = LineTransport::stdio().with_max_frame(config.max_frame_bytes);
            serve(&srv, &mut transport).await?;
        }
        TransportKind::Http => {
            let addr = config.bind_socket()?;
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(addr = %addr, "listening");
            axum::serve(listener, http_router(srv)).await?;
        }
    }

    tracing::info!("server stopped");
    Ok(())
}
