use std::error::Error;
use std::fmt::{self, Display};

use little_chat_model::{ChatServiceError, ErrorKind};

/// A type of error which can be returned whenever commands are sent to a
/// controller that has stopped.
pub struct ControllerClosedError;

impl fmt::Debug for ControllerClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerClosedError").finish()
    }
}

impl Display for ControllerClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the controller has stopped".fmt(f)
    }
}

impl Error for ControllerClosedError {}

/// A failed call to the chat service, with the service's error type erased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceFailure {
    kind: ErrorKind,
    message: String,
}

impl ServiceFailure {
    pub(crate) fn from_service_error<E: ChatServiceError>(err: &E) -> Self {
        let mut message = err.to_string();
        if message.is_empty() {
            message = "Failed to send message".to_owned();
        }
        Self {
            kind: err.kind(),
            message,
        }
    }

    #[inline]
    pub(crate) fn timed_out() -> Self {
        Self {
            kind: ErrorKind::RequestFailed,
            message: "Request timed out".to_owned(),
        }
    }

    /// Returns the kind of this failure.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message meant for the user.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ServiceFailure {}
