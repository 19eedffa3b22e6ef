use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::timeout;
use tokio_tungstenite::connect_async_tls_with_config;
use tokio_tungstenite::tungstenite::client::IntoClientRequest as _;
use url::Url;

use super::HeaderMap;
use super::config::DialerOptions;
use super::connection::TungsteniteConnection;
use super::traits::{Connection, Dialer, HandshakeResponse};
use crate::Result;
use crate::context::Context;
use crate::error::{Error, PermanentError};
use crate::logger::Logger;

/// [`Dialer`] backed by `tokio-tungstenite`.
///
/// # Example
///
/// ```rust
/// use realtime_ws::ws::{DialerOptions, TungsteniteDialer};
///
/// // No network activity happens until `dial`.
/// let dialer = TungsteniteDialer::new(DialerOptions::default());
/// assert_eq!(dialer.options().read_limit, 0);
/// ```
#[derive(Debug, Clone)]
pub struct TungsteniteDialer {
    options: DialerOptions,
}

impl Default for TungsteniteDialer {
    fn default() -> Self {
        Self::new(DialerOptions::default())
    }
}

impl TungsteniteDialer {
    #[must_use]
    pub fn new(options: DialerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &DialerOptions {
        &self.options
    }

    async fn handshake(
        &self,
        url: &Url,
        headers: HeaderMap,
    ) -> std::result::Result<TungsteniteConnection, PermanentError> {
        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| PermanentError::from_transport("dial", e))?;
        for (name, value) in &headers {
            request.headers_mut().append(name.clone(), value.clone());
        }

        let connect = connect_async_tls_with_config(
            request,
            Some(self.options.effective_websocket_config()),
            self.options.disable_nagle,
            self.options.connector.clone(),
        );
        let connected = match self.options.handshake_timeout {
            Some(limit) => timeout(limit, connect)
                .await
                .map_err(|e| PermanentError::new("dial: handshake timed out", e))?,
            None => connect.await,
        };
        let (stream, response) =
            connected.map_err(|e| PermanentError::from_transport("dial", e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%url, status = %response.status(), "WebSocket handshake completed");

        Ok(TungsteniteConnection::new(
            stream,
            HandshakeResponse::from(&response),
            self.logger(),
        ))
    }

    fn logger(&self) -> Arc<dyn Logger> {
        self.options.effective_logger()
    }
}

#[async_trait]
impl Dialer for TungsteniteDialer {
    async fn dial(
        &self,
        ctx: &Context,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Box<dyn Connection>> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::validation(format!(
                "unsupported URL scheme `{}`, expected `ws` or `wss`",
                url.scheme()
            )));
        }
        if let Some(cause) = ctx.err() {
            return Err(PermanentError::new("dial not started", cause).into());
        }

        let result = tokio::select! {
            biased;
            cause = ctx.done() => Err(PermanentError::new("dial abandoned", cause)),
            result = self.handshake(&url, headers) => result,
        };

        match result {
            Ok(connection) => Ok(Box::new(connection)),
            Err(e) => {
                self.logger().error(format_args!("dial {url} failed: {e}"));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;
    use crate::error::Kind;

    #[tokio::test]
    async fn rejects_non_websocket_scheme_without_io() {
        let dialer = TungsteniteDialer::default();

        let Err(err) = dialer
            .dial(&Context::background(), "http://127.0.0.1:1", HeaderMap::new())
            .await
        else {
            panic!("dial with http scheme should fail");
        };

        assert_eq!(err.kind(), Kind::Validation);
        assert!(err.to_string().contains("unsupported URL scheme `http`"));
    }

    #[tokio::test]
    async fn rejects_malformed_url() {
        let dialer = TungsteniteDialer::default();

        let Err(err) = dialer
            .dial(&Context::background(), "not a url", HeaderMap::new())
            .await
        else {
            panic!("dial with malformed url should fail");
        };

        assert_eq!(err.kind(), Kind::Validation);
        assert!(err.downcast_ref::<url::ParseError>().is_some());
    }

    #[tokio::test]
    async fn cancelled_context_fails_permanently() {
        let dialer = TungsteniteDialer::default();
        let (ctx, token) = Context::background().with_cancel();
        token.cancel();

        let Err(err) = dialer.dial(&ctx, "ws://127.0.0.1:1", HeaderMap::new()).await else {
            panic!("dial with cancelled context should fail");
        };

        assert!(err.is_permanent());
        assert_eq!(
            err.permanent().unwrap().downcast_ref::<ContextError>(),
            Some(&ContextError::Canceled)
        );
    }
}
