use std::error::Error;

use serde_json::Value;

use crate::error::ErrorKind;
use crate::exchange::{ExchangeRequest, ExchangeResponse};

/// The error type for a chat service.
pub trait ChatServiceError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A remote assistant that can be probed and talked to.
///
/// A service must behave like a stateless object: it owns no conversation
/// state, never retries, and never caches. Callers pass the whole history
/// with every exchange.
pub trait ChatService: Send + Sync {
    /// The error type that may be returned by the service.
    type Error: ChatServiceError;

    /// Checks whether the service is reachable.
    ///
    /// Returns the raw body reported by the service. Failures should use
    /// [`ErrorKind::ServiceUnavailable`].
    fn probe_health(
        &self,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'static;

    /// Sends one message and waits for the complete reply.
    ///
    /// Failures should use [`ErrorKind::RequestFailed`], and the error's
    /// `Display` output is the message shown to the user.
    fn exchange(
        &self,
        req: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, Self::Error>> + Send + 'static;
}
