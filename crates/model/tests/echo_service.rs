use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::time::Duration;

use little_chat_model::{
    ChatService, ChatServiceError, ErrorKind, ExchangeRequest,
    ExchangeResponse, Turn,
};
use serde_json::{Value, json};
use tokio::time::sleep;

#[derive(Debug)]
struct EchoServiceError(ErrorKind);

impl Display for EchoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for EchoServiceError {}

impl ChatServiceError for EchoServiceError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Replies with whatever the user said, and keeps the history it was given.
struct EchoService;

impl ChatService for EchoService {
    type Error = EchoServiceError;

    fn probe_health(
        &self,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'static {
        ready(Ok(json!({ "status": "healthy" })))
    }

    fn exchange(
        &self,
        req: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, Self::Error>> + Send + 'static
    {
        let req = req.clone();
        async move {
            sleep(Duration::from_millis(1)).await;
            if req.message.is_empty() {
                return Err(EchoServiceError(ErrorKind::RequestFailed));
            }

            let response = format!("You said {}", req.message);
            let mut history = req.history;
            history.push(Turn::user(req.message));
            history.push(Turn::assistant(response.clone()));
            Ok(ExchangeResponse { response, history })
        }
    }
}

#[tokio::test]
async fn test_exchange() {
    let service = EchoService;
    let req = ExchangeRequest {
        message: "Good morning".to_owned(),
        history: vec![Turn::user("Hi"), Turn::assistant("Hello!")],
    };
    let resp = service.exchange(&req).await.unwrap();
    assert_eq!(resp.response, "You said Good morning");
    assert_eq!(resp.history.len(), 4);
    assert_eq!(resp.history[2], Turn::user("Good morning"));
}

#[tokio::test]
async fn test_error() {
    let service = EchoService;
    let err = service
        .exchange(&ExchangeRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestFailed);
    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn test_probe_health() {
    let body = EchoService.probe_health().await.unwrap();
    assert_eq!(body["status"], "healthy");
}
