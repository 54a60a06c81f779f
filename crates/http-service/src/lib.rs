//! A chat service backed by an HTTP/JSON endpoint.
//!
//! The endpoint exposes two routes:
//!
//! - `GET /api/health`, where only the status code matters.
//! - `POST /api/chat`, taking `{ message, history }` and answering with
//!   `{ success, response, history, error }`.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use little_chat_model::{
    ChatService, ChatServiceError, ErrorKind, ExchangeRequest,
    ExchangeResponse,
};
use reqwest::{Client, RequestBuilder, Response, header};
use serde_json::Value;

pub use config::{HttpServiceConfig, HttpServiceConfigBuilder};

const HEALTH_PATH: &str = "/api/health";
const CHAT_PATH: &str = "/api/chat";

/// Error type for [`HttpChatService`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    #[inline]
    fn unable_to_connect() -> Self {
        Self::new(
            "Unable to connect to chat service",
            ErrorKind::ServiceUnavailable,
        )
    }

    #[inline]
    pub(crate) fn request_failed(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::RequestFailed)
    }

    #[inline]
    pub(crate) fn failed_to_send() -> Self {
        Self::request_failed("Failed to send message")
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ChatServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Chat service reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpChatService {
    client: Client,
    config: Arc<HttpServiceConfig>,
}

impl HttpChatService {
    /// Creates a new `HttpChatService` with the given configuration.
    #[inline]
    pub fn new(config: HttpServiceConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a new `HttpChatService` that shares an existing client.
    #[inline]
    pub fn with_client(client: Client, config: HttpServiceConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this service.
    #[inline]
    pub fn config(&self) -> &HttpServiceConfig {
        &self.config
    }

    fn prepare(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header(header::CONTENT_TYPE, "application/json");
        match self.config.request_timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }
}

impl ChatService for HttpChatService {
    type Error = Error;

    fn probe_health(
        &self,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'static {
        let url = self.config.endpoint(HEALTH_PATH);
        trace!("probing {url}");
        let resp_fut = self.prepare(self.client.get(url)).send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    error!("health check error: {err}");
                    return Err(Error::unable_to_connect());
                }
            };
            let status = resp.status();
            if !status.is_success() {
                error!("health check failed: {}", status.as_u16());
                return Err(Error::unable_to_connect());
            }

            resp.json::<Value>().await.map_err(|err| {
                error!("health check returned a malformed body: {err}");
                Error::unable_to_connect()
            })
        }
    }

    fn exchange(
        &self,
        req: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, Self::Error>> + Send + 'static
    {
        let url = self.config.endpoint(CHAT_PATH);
        trace!(
            "posting to {url} with {} history turns",
            req.history.len()
        );
        let resp_fut = self.prepare(self.client.post(url)).json(req).send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    error!("failed to send message: {err}");
                    return Err(Error::failed_to_send());
                }
            };
            let status = resp.status().as_u16();
            let body = read_body(resp).await;
            proto::decode_chat_response(status, body.as_deref())
        }
    }
}

async fn read_body(resp: Response) -> Option<Vec<u8>> {
    match resp.bytes().await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(err) => {
            error!("failed to read response body: {err}");
            None
        }
    }
}
