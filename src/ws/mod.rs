//! Message-oriented I/O over upgraded WebSocket connections.
//!
//! The rest of a program depends only on the [`Dialer`] and [`Connection`] traits;
//! [`TungsteniteDialer`] is the concrete transport built on `tokio-tungstenite`.
//!
//! # Architecture
//!
//! - [`Dialer`]: performs the upgrade handshake and yields a [`Connection`]
//! - [`Connection`]: cancellable `read_message`/`write_message`, `close`, and the
//!   captured [`HandshakeResponse`]
//! - [`DialerOptions`]: read limit and pass-through transport settings
//!
//! # Example
//!
//! ```rust, no_run
//! use bytes::Bytes;
//! use realtime_ws::context::Context;
//! use realtime_ws::message::MessageType;
//! use realtime_ws::ws::{Connection as _, Dialer as _, DialerOptions, HeaderMap, TungsteniteDialer};
//!
//! # async fn run() -> realtime_ws::Result<()> {
//! let dialer = TungsteniteDialer::new(DialerOptions::builder().read_limit(1 << 20).build());
//! let conn = dialer.dial(&Context::background(), "ws://127.0.0.1:8080", HeaderMap::new()).await?;
//!
//! conn.write_message(&Context::background(), MessageType::TEXT, Bytes::from_static(b"hi")).await?;
//! let (message_type, payload) = conn.read_message(&Context::background()).await?;
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod dialer;
pub mod error;
pub mod traits;

pub use config::DialerOptions;
pub use connection::TungsteniteConnection;
pub use dialer::TungsteniteDialer;
#[expect(
    clippy::module_name_repetitions,
    reason = "WsError includes module name for clarity when used outside this module"
)]
pub use error::WsError;
/// Header map type, re-exported for building dial requests.
pub use tokio_tungstenite::tungstenite::http::HeaderMap;
pub use traits::*;
