use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use little_chat_model::{ChatService, ExchangeRequest, ExchangeResponse};
use serde_json::Value;
use tokio::time::timeout;
use tracing::Instrument;

use crate::error::ServiceFailure;

type ExchangeResult = Result<ExchangeResponse, ServiceFailure>;
type ProbeResult = Result<Value, ServiceFailure>;
type BoxedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type ExchangeFn =
    Arc<dyn Fn(ExchangeRequest) -> BoxedFuture<ExchangeResult> + Send + Sync>;
type ProbeFn = Arc<dyn Fn() -> BoxedFuture<ProbeResult> + Send + Sync>;

/// A wrapper around a chat service that provides a type-erased interface
/// for the controller, and applies the exchange timeout if there is one.
#[derive(Clone)]
pub struct ServiceClient {
    exchange_fn: ExchangeFn,
    probe_fn: ProbeFn,
    exchange_timeout: Option<Duration>,
}

impl ServiceClient {
    pub fn new<S: ChatService + 'static>(service: S) -> Self {
        let service = Arc::new(service);

        let exchange_fn: ExchangeFn = Arc::new({
            let service = Arc::clone(&service);
            move |req| {
                let fut = service.exchange(&req);
                Box::pin(
                    async move {
                        trace!("got a request: {req:?}");
                        fut.await.map_err(|err| {
                            error!("got an error: {err:?}");
                            ServiceFailure::from_service_error(&err)
                        })
                    }
                    .instrument(trace_span!("exchange")),
                )
            }
        });

        let probe_fn: ProbeFn = Arc::new(move || {
            let fut = service.probe_health();
            Box::pin(
                async move {
                    fut.await
                        .map_err(|err| ServiceFailure::from_service_error(&err))
                }
                .instrument(trace_span!("health probe")),
            )
        });

        Self {
            exchange_fn,
            probe_fn,
            exchange_timeout: None,
        }
    }

    #[inline]
    pub fn set_exchange_timeout(&mut self, timeout: Duration) {
        self.exchange_timeout = Some(timeout);
    }

    /// Sends one exchange and waits for its outcome.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe, but the service may still have received
    /// the message.
    #[inline]
    pub async fn exchange(&self, req: ExchangeRequest) -> ExchangeResult {
        let fut = (self.exchange_fn)(req);
        let Some(limit) = self.exchange_timeout else {
            return fut.await;
        };
        match timeout(limit, fut).await {
            Ok(res) => res,
            Err(_) => {
                error!("no reply within {limit:?}");
                Err(ServiceFailure::timed_out())
            }
        }
    }

    #[inline]
    pub async fn probe_health(&self) -> ProbeResult {
        (self.probe_fn)().await
    }
}

#[cfg(test)]
mod tests {
    use little_chat_model::{ErrorKind, Turn};
    use little_chat_test_service::{PresetReply, TestChatService};

    use super::*;

    fn request(message: &str) -> ExchangeRequest {
        ExchangeRequest {
            message: message.to_owned(),
            history: vec![Turn::assistant("Welcome")],
        }
    }

    #[tokio::test]
    async fn test_exchange() {
        let service = TestChatService::default();
        service.add_reply(PresetReply::respond("How are you?"));

        let client = ServiceClient::new(service.clone());
        let resp = client.exchange(request("Hi")).await.unwrap();
        assert_eq!(resp.response, "How are you?");
        assert_eq!(service.requests(), vec![request("Hi")]);
    }

    #[tokio::test]
    async fn test_error_is_erased() {
        let service = TestChatService::default();
        service.add_reply(PresetReply::fail("Rate limited"));

        let client = ServiceClient::new(service);
        let err = client.exchange(request("Hi")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.message(), "Rate limited");
    }

    #[tokio::test]
    async fn test_empty_message_falls_back() {
        let service = TestChatService::default();
        service.add_reply(PresetReply::fail(""));

        let client = ServiceClient::new(service);
        let err = client.exchange(request("Hi")).await.unwrap_err();
        assert_eq!(err.message(), "Failed to send message");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let service = TestChatService::default();
        service.add_reply(PresetReply::Hang);

        let mut client = ServiceClient::new(service);
        client.set_exchange_timeout(Duration::from_secs(30));
        let err = client.exchange(request("Hi")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.message(), "Request timed out");
    }

    #[tokio::test]
    async fn test_probe_health() {
        let service = TestChatService::default();
        let client = ServiceClient::new(service.clone());
        assert!(client.probe_health().await.is_ok());

        service.set_unhealthy();
        let err = client.probe_health().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }
}
