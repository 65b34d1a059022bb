//! Per-connection handshake state.

use crate::types::{ClientInfo, InitializeParams};

/// `Fresh` until the first `initialize`, `Negotiated` afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Fresh,
    Negotiated { protocol_version: String },
}

/// Negotiation state of one connection. Never shared between connections.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    client: Option<ClientInfo>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, SessionState::Negotiated { .. })
    }

    pub fn protocol_version(&self) -> Option<&str> {
        match &self.state {
            SessionState::Fresh => None,
            SessionState::Negotiated { protocol_version } => Some(protocol_version),
        }
    }

    pub fn client_info(&self) -> Option<&ClientInfo> {
        self.client.as_ref()
    }

    /// Record an `initialize`. Repeating it re-records and stays `Negotiated`.
    /// The client's requested version is the negotiated one.
    pub fn negotiate(&mut self, params: InitializeParams) -> &str {
        if let SessionState::Negotiated { protocol_version } = &self.state {
            tracing::debug!(previous = %protocol_version, "re-initializing session");
        }
        if params.client_info.is_some() {
            self.client = params.client_info;
        }
        self.state = SessionState::Negotiated {
            protocol_version: params.protocol_version,
        };
        self.protocol_version().unwrap_or_default()
    }
}
