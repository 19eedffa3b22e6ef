use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::error::CapacityError;

use crate::message::MessageType;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The connection can no longer be used and must be closed and redialed
    Permanent,
    /// Invalid input to a single call; the connection is unaffected
    Validation,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<BoxError>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    /// Whether this error means the connection must be discarded.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.kind == Kind::Permanent
    }

    /// The [`PermanentError`] carried by this error, if any.
    #[must_use]
    pub fn permanent(&self) -> Option<&PermanentError> {
        self.downcast_ref::<PermanentError>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// A failure after which the connection is unusable.
///
/// The original cause is kept intact, so callers can downcast it (for example to
/// [`tungstenite::Error`] to spot an exceeded read limit) or walk it through
/// [`StdError::source`].
#[derive(Debug)]
pub struct PermanentError {
    message: String,
    cause: BoxError,
}

impl PermanentError {
    pub fn new<M, E>(message: M, cause: E) -> Self
    where
        M: Into<String>,
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            cause: Box::new(cause),
        }
    }

    /// Classify an error raised by the transport during `op`.
    ///
    /// Every transport error is permanent: a failed read or write leaves the
    /// framing state of the connection unknown.
    #[must_use]
    pub fn from_transport(op: &str, cause: tungstenite::Error) -> Self {
        let message = match &cause {
            tungstenite::Error::Capacity(CapacityError::MessageTooLong { .. }) if op == "read" => {
                format!("{op}: read limit exceeded")
            }
            tungstenite::Error::Capacity(_) => format!("{op}: capacity exceeded"),
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                format!("{op}: connection closed")
            }
            tungstenite::Error::Io(_) => format!("{op}: i/o failure"),
            tungstenite::Error::Protocol(_) => format!("{op}: protocol violation"),
            tungstenite::Error::Http(response) => {
                format!("{op}: unexpected handshake response {}", response.status())
            }
            _ => format!("{op} failed"),
        };
        Self::new(message, cause)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }
}

impl fmt::Display for PermanentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.cause)
    }
}

impl StdError for PermanentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref() as &(dyn StdError + 'static))
    }
}

/// A write was attempted with a [`MessageType`] other than text or binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedMessageType(pub MessageType);

impl fmt::Display for UnsupportedMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported message type: {}", self.0)
    }
}

impl StdError for UnsupportedMessageType {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

impl From<PermanentError> for Error {
    fn from(err: PermanentError) -> Self {
        Error::with_source(Kind::Permanent, err)
    }
}

impl From<UnsupportedMessageType> for Error {
    fn from(err: UnsupportedMessageType) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}
