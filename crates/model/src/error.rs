use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service could not be reached, or reported itself unhealthy.
    ///
    /// Only the health probe fails with this kind.
    ServiceUnavailable,
    /// A message exchange did not produce a usable reply.
    RequestFailed,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ServiceUnavailable => write!(f, "Service unavailable"),
            ErrorKind::RequestFailed => write!(f, "Request failed"),
        }
    }
}
