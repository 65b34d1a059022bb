use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

use crate::transport::DEFAULT_MAX_FRAME;
use crate::types::McpError;

pub const DEFAULT_SERVER_NAME: &str = "MCP Reference Server";
pub const DEFAULT_SERVER_VERSION: &str = "1.0.0";

/// Which adapter carries messages in and out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// Line-delimited JSON on stdin/stdout.
    Stdio,
    /// `POST /mcp` on an HTTP listener.
    Http,
}

/// Process configuration. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mcp-reference-server",
    about = "MCP reference server: echo/add/quotify tools, a greeting prompt, and two static resources",
    version
)]
pub struct Config {
    /// Transport to serve on.
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value_t = TransportKind::Stdio)]
    pub transport: TransportKind,

    /// Listen address for the HTTP transport (host:port).
    #[arg(long, env = "MCP_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Reject calls other than initialize/ping until the session is initialized.
    #[arg(long, env = "MCP_STRICT_HANDSHAKE")]
    pub strict_handshake: bool,

    /// Name reported in serverInfo.
    #[arg(long, env = "MCP_SERVER_NAME", default_value = DEFAULT_SERVER_NAME)]
    pub server_name: String,

    /// Version reported in serverInfo.
    #[arg(long, env = "MCP_SERVER_VERSION", default_value = DEFAULT_SERVER_VERSION)]
    pub server_version: String,

    /// Longest accepted stdio line in bytes; longer lines get a parse error.
    #[arg(long, env = "MCP_MAX_FRAME_BYTES", default_value_t = DEFAULT_MAX_FRAME)]
    pub max_frame_bytes: usize,

    /// Seed for the quote generator. Unset means OS entropy.
    #[arg(long, env = "MCP_QUOTE_SEED")]
    pub quote_seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG wins when set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Config {
    pub fn bind_socket(&self) -> Result<SocketAddr, McpError> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|_| McpError::Config(format!("invalid bind address '{}'", self.bind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let config = Config::try_parse_from(["mcp-reference-server"]).expect("config should parse");
        assert_eq!(config.transport, TransportKind::Stdio);
        assert_eq!(config.server_name, DEFAULT_SERVER_NAME);
        assert_eq!(config.server_version, DEFAULT_SERVER_VERSION);
        assert!(!config.strict_handshake);
        assert!(config.quote_seed.is_none());
        assert_eq!(config.max_frame_bytes, DEFAULT_MAX_FRAME);
        assert_eq!(config.bind_socket().unwrap().port(), 8080);
    }

    #[test]
    fn parse_http_flags() {
        let config = Config::try_parse_from([
            "mcp-reference-server",
            "--transport",
            "http",
            "--bind",
            "0.0.0.0:3000",
            "--strict-handshake",
            "--quote-seed",
            "42",
            "--max-frame-bytes",
            "1024",
        ])
        .expect("config should parse");
        assert_eq!(config.transport, TransportKind::Http);
        assert!(config.strict_handshake);
        assert_eq!(config.quote_seed, Some(42));
        assert_eq!(config.max_frame_bytes, 1024);
        assert_eq!(config.bind_socket().unwrap().port(), 3000);
    }

    #[test]
    fn invalid_bind_fails() {
        let config =
            Config::try_parse_from(["mcp-reference-server", "--bind", "not-an-address"]).unwrap();
        let err = config.bind_socket().expect_err("expected invalid bind error");
        assert!(matches!(err, McpError::Config(_)));
    }

    #[test]
    fn unknown_transport_fails() {
        let result = Config::try_parse_from(["mcp-reference-server", "--transport", "grpc"]);
        assert!(result.is_err());
    }
}
