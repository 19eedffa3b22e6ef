//! Transport-agnostic connection traits.

use async_trait::async_trait;
use bytes::Bytes;
use tokio_tungstenite::tungstenite::http::{HeaderMap, Response, StatusCode, Version};

use crate::Result;
use crate::context::Context;
use crate::message::MessageType;

/// Produces connections by performing the upgrade handshake.
///
/// Constructing a dialer never touches the network; all I/O happens in [`Dialer::dial`].
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Dial `url` (`ws://` or `wss://`), sending `headers` with the handshake request.
    ///
    /// Handshake failures, including cancellation of `ctx`, are returned as
    /// [`PermanentError`](crate::error::PermanentError)s. A malformed URL is a
    /// validation error.
    async fn dial(&self, ctx: &Context, url: &str, headers: HeaderMap)
    -> Result<Box<dyn Connection>>;
}

/// A live, full-duplex message connection.
///
/// Reads and writes may run concurrently with each other, but each direction
/// expects a single caller at a time. Every error is either a
/// [`PermanentError`](crate::error::PermanentError), after which the connection
/// must be closed, or a validation error local to the call.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Read the next text or binary message.
    ///
    /// Returns as soon as `ctx` is done; the connection is unusable afterwards.
    async fn read_message(&self, ctx: &Context) -> Result<(MessageType, Bytes)>;

    /// Write one message.
    ///
    /// `message_type` is validated before any I/O, and text payloads must be UTF-8.
    async fn write_message(
        &self,
        ctx: &Context,
        message_type: MessageType,
        payload: Bytes,
    ) -> Result<()>;

    /// Release the transport. In-flight calls fail promptly; a second call errors.
    async fn close(&self) -> Result<()>;

    /// The HTTP response captured during the upgrade handshake.
    fn response(&self) -> &HandshakeResponse;
}

/// Status line and headers of the upgrade handshake response.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct HandshakeResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
}

impl<T> From<&Response<T>> for HandshakeResponse {
    fn from(response: &Response<T>) -> Self {
        Self {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
        }
    }
}
