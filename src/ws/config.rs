use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use tokio_tungstenite::Connector;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;

use crate::logger::{Logger, NopLogger};

/// Upper bound on the close handshake performed by [`Connection::close`](super::Connection::close).
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for [`TungsteniteDialer`](super::TungsteniteDialer).
///
/// The zero value ([`Default`]) enforces no read limit and uses the transport's
/// default settings.
#[non_exhaustive]
#[derive(Clone, Default, Builder)]
pub struct DialerOptions {
    /// Maximum size in bytes of a single inbound message. `0` disables the limit.
    #[builder(default)]
    pub read_limit: usize,
    /// Buffer settings handed to the transport. Its message and frame size limits
    /// are always replaced by `read_limit`.
    #[builder(default)]
    pub websocket_config: WebSocketConfig,
    /// TLS connector for `wss://` URLs; the transport picks one when unset.
    pub connector: Option<Connector>,
    /// Set `TCP_NODELAY` on the underlying socket.
    #[builder(default)]
    pub disable_nagle: bool,
    /// Bound on the upgrade handshake, applied in addition to the dial context.
    pub handshake_timeout: Option<Duration>,
    /// Diagnostics sink shared by the dialer and its connections.
    pub logger: Option<Arc<dyn Logger>>,
}

impl DialerOptions {
    /// Transport settings with the read limit applied.
    ///
    /// The limit bounds both whole messages and single frames, so a message sent
    /// as one frame is accepted up to exactly `read_limit` bytes.
    #[must_use]
    pub fn effective_websocket_config(&self) -> WebSocketConfig {
        let limit = (self.read_limit > 0).then_some(self.read_limit);
        self.websocket_config
            .clone()
            .max_message_size(limit)
            .max_frame_size(limit)
    }

    #[must_use]
    pub fn effective_logger(&self) -> Arc<dyn Logger> {
        self.logger
            .clone()
            .unwrap_or_else(|| Arc::new(NopLogger) as Arc<dyn Logger>)
    }
}

impl fmt::Debug for DialerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialerOptions")
            .field("read_limit", &self.read_limit)
            .field("websocket_config", &self.websocket_config)
            .field("connector", &self.connector.as_ref().map(|_| ".."))
            .field("disable_nagle", &self.disable_nagle)
            .field("handshake_timeout", &self.handshake_timeout)
            .field("logger", &self.logger.as_ref().map(|_| ".."))
            .finish()
    }
}
