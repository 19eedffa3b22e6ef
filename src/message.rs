//! Message type tags.

use std::fmt;

/// Tag carried by every message read from or written to a [`Connection`](crate::ws::Connection).
///
/// Only [`MessageType::TEXT`] and [`MessageType::BINARY`] are supported. Other values
/// are representable so that they can be rejected at the call site rather than coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageType(pub u8);

impl MessageType {
    /// UTF-8 text frame
    pub const TEXT: Self = Self(1);
    /// Binary frame
    pub const BINARY: Self = Self(2);

    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::TEXT | Self::BINARY)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::TEXT => f.write_str("text"),
            Self::BINARY => f.write_str("binary"),
            Self(other) => write!(f, "unknown({other})"),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(message_type: MessageType) -> Self {
        message_type.0
    }
}
