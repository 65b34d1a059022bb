//! Transport adapters. Each one only moves frames; protocol logic lives in
//! [`Server`](crate::Server).

mod http;
mod stdio;

pub use http::http_router;
pub use stdio::{DEFAULT_MAX_FRAME, LineTransport};

use async_trait::async_trait;

use crate::server::{Outcome, Server};
use crate::types::McpError;

/// A framed, bidirectional message channel.
#[async_trait]
pub trait Transport: Send {
    /// Next inbound frame, or `None` once the peer has closed.
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, McpError>;

    /// Send one outbound frame.
    async fn send(&mut self, frame: &[u8]) -> Result<(), McpError>;
}

/// Drive one connection until the peer closes or asks to shut down.
///
/// The connection gets its own session; frames are handled strictly in order.
pub async fn serve<T: Transport + ?Sized>(server: &Server, transport: &mut T) -> Result<(), McpError> {
    let mut session = server.new_session();
    tracing::info!("message loop started");

    while let Some(frame) = transport.receive().await? {
        match server.handle_message(&mut session, &frame).await {
            Outcome::Reply(bytes) => transport.send(&bytes).await?,
            Outcome::Silent => {}
            Outcome::Shutdown => break,
        }
    }

    tracing::info!("message loop stopped");
    Ok(())
}
