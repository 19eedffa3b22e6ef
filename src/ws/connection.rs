#![expect(
    clippy::module_name_repetitions,
    reason = "Connection types expose their domain in the name for clarity"
)]

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::config::DEFAULT_CLOSE_TIMEOUT;
use super::error::WsError;
use super::traits::{Connection, HandshakeResponse};
use crate::Result;
use crate::context::Context;
use crate::error::{PermanentError, UnsupportedMessageType};
use crate::logger::Logger;
use crate::message::MessageType;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// [`Connection`] over a `tokio-tungstenite` stream.
///
/// The stream is split so that a read and a write can be in flight at the same
/// time. Each call races its I/O against the caller's [`Context`] and against
/// [`Connection::close`]; whichever finishes first decides the outcome, and the
/// losing I/O future is dropped. A dropped read or write may leave a frame half
/// consumed or half written, so any call that does not complete normally marks the
/// connection unusable.
pub struct TungsteniteConnection {
    sink: Mutex<Option<SplitSink<WsStream, Message>>>,
    stream: Mutex<Option<SplitStream<WsStream>>>,
    response: HandshakeResponse,
    /// Cancelled by `close` to interrupt in-flight calls
    shutdown: CancellationToken,
    closed: AtomicBool,
    unusable: AtomicBool,
    logger: Arc<dyn Logger>,
}

impl TungsteniteConnection {
    pub(crate) fn new(
        stream: WsStream,
        response: HandshakeResponse,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let (sink, stream) = stream.split();

        Self {
            sink: Mutex::new(Some(sink)),
            stream: Mutex::new(Some(stream)),
            response,
            shutdown: CancellationToken::new(),
            closed: AtomicBool::new(false),
            unusable: AtomicBool::new(false),
            logger,
        }
    }

    /// Whether an earlier failure or abandoned call has left this connection unusable.
    #[must_use]
    pub fn is_unusable(&self) -> bool {
        self.unusable.load(Ordering::Acquire)
    }

    /// Run `io` until it completes, `ctx` is done, or the connection is closed.
    async fn bridge<T, F>(&self, ctx: &Context, op: &str, io: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, PermanentError>> + Send,
    {
        if self.closed.load(Ordering::Acquire) {
            return Err(PermanentError::new(format!("{op} after close"), WsError::Closed).into());
        }
        if self.is_unusable() {
            return Err(PermanentError::new(format!("{op} refused"), WsError::Unusable).into());
        }
        if let Some(cause) = ctx.err() {
            return Err(PermanentError::new(format!("{op} not started"), cause).into());
        }

        let result = tokio::select! {
            biased;
            () = self.shutdown.cancelled() => {
                Err(PermanentError::new(format!("{op} interrupted by close"), WsError::Closed))
            }
            cause = ctx.done() => {
                self.logger.warn(format_args!("{op} abandoned: {cause}"));
                Err(PermanentError::new(format!("{op} abandoned"), cause))
            }
            result = io => result,
        };

        if result.is_err() {
            self.unusable.store(true, Ordering::Release);
            #[cfg(feature = "tracing")]
            if let Err(e) = &result {
                tracing::debug!(error = %e, "WebSocket connection marked unusable");
            }
        }

        result.map_err(Into::into)
    }
}

#[async_trait]
impl Connection for TungsteniteConnection {
    async fn read_message(&self, ctx: &Context) -> Result<(MessageType, Bytes)> {
        self.bridge(ctx, "read", async {
            let mut guard = self.stream.lock().await;
            let stream = guard
                .as_mut()
                .ok_or_else(|| PermanentError::new("read after close", WsError::Closed))?;

            loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok((MessageType::TEXT, Bytes::from(text)));
                    }
                    Some(Ok(Message::Binary(data))) => return Ok((MessageType::BINARY, data)),
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason): (u16, String) = frame.map_or_else(
                            || (CloseCode::Status.into(), String::new()),
                            |frame| (frame.code.into(), frame.reason.to_string()),
                        );
                        return Err(PermanentError::new(
                            "read: peer closed connection",
                            WsError::PeerClosed { code, reason },
                        ));
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {
                        // Control frames are answered by the transport.
                    }
                    Some(Err(e)) => return Err(PermanentError::from_transport("read", e)),
                    None => {
                        return Err(PermanentError::from_transport(
                            "read",
                            tungstenite::Error::ConnectionClosed,
                        ));
                    }
                }
            }
        })
        .await
    }

    async fn write_message(
        &self,
        ctx: &Context,
        message_type: MessageType,
        payload: Bytes,
    ) -> Result<()> {
        let message = match message_type {
            MessageType::TEXT => Message::text(String::from_utf8(Vec::from(payload))?),
            MessageType::BINARY => Message::binary(payload),
            other => return Err(UnsupportedMessageType(other).into()),
        };

        self.bridge(ctx, "write", async {
            let mut guard = self.sink.lock().await;
            let sink = guard
                .as_mut()
                .ok_or_else(|| PermanentError::new("write after close", WsError::Closed))?;

            sink.send(message)
                .await
                .map_err(|e| PermanentError::from_transport("write", e))
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(PermanentError::new("close", WsError::Closed).into());
        }
        self.shutdown.cancel();

        let sink = self.sink.lock().await.take();
        let stream = self.stream.lock().await.take();

        // A connection with a broken framing state gets no close frame.
        if let Some(mut sink) = sink
            && !self.is_unusable()
        {
            match timeout(DEFAULT_CLOSE_TIMEOUT, sink.close()).await {
                Ok(Ok(()) | Err(tungstenite::Error::ConnectionClosed)) => {}
                Ok(Err(e)) => self.logger.warn(format_args!("close handshake failed: {e}")),
                Err(_elapsed) => self.logger.warn(format_args!(
                    "close handshake timed out after {DEFAULT_CLOSE_TIMEOUT:?}"
                )),
            }
        }
        drop(stream);

        #[cfg(feature = "tracing")]
        tracing::debug!("WebSocket connection closed");

        Ok(())
    }

    fn response(&self) -> &HandshakeResponse {
        &self.response
    }
}
