#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;

/// Causes of permanent connection failures that the transport library has no
/// error value for.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsError {
    /// `close` has already been called on this connection
    Closed,
    /// The peer sent a close frame
    PeerClosed {
        /// Close code from the frame, `1005` when the frame carried none
        code: u16,
        /// Close reason from the frame
        reason: String,
    },
    /// An earlier call failed or was abandoned, leaving the framing state unknown
    Unusable,
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "WebSocket connection closed"),
            Self::PeerClosed { code, reason } if reason.is_empty() => {
                write!(f, "WebSocket closed by peer with code {code}")
            }
            Self::PeerClosed { code, reason } => {
                write!(f, "WebSocket closed by peer with code {code}: {reason}")
            }
            Self::Unusable => write!(
                f,
                "WebSocket connection unusable after an earlier failure or abandoned call"
            ),
        }
    }
}

impl StdError for WsError {}
