//! A local scripted chat service for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::future::pending;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use little_chat_model::{
    ChatService, ChatServiceError, ErrorKind, ExchangeRequest,
    ExchangeResponse, Turn,
};
use serde_json::{Value, json};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {}

impl ChatServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<PresetReply>>,
    requests: Mutex<Vec<ExchangeRequest>>,
    delay: Mutex<Option<Duration>>,
    unhealthy: AtomicBool,
    health_probes: AtomicUsize,
}

/// A local scripted chat service for testing purpose.
///
/// Before sending requests, you need to add the replies the service should
/// give. Replies are consumed in order, one per exchange. If there are no
/// replies left, the exchange fails.
///
/// Clones share the same script and the same request log, so a test can keep
/// one clone for assertions while another is owned by the code under test.
#[derive(Clone, Default)]
pub struct TestChatService {
    inner: Arc<Inner>,
}

impl TestChatService {
    #[inline]
    pub fn add_reply(&self, reply: PresetReply) {
        lock(&self.inner.script).push_back(reply);
    }

    /// Sets how long every exchange takes before it resolves.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        *lock(&self.inner.delay) = Some(duration);
    }

    /// Makes the health probe fail from now on.
    #[inline]
    pub fn set_unhealthy(&self) {
        self.inner.unhealthy.store(true, Ordering::Relaxed);
    }

    /// Returns every exchange request received so far, oldest first.
    #[inline]
    pub fn requests(&self) -> Vec<ExchangeRequest> {
        lock(&self.inner.requests).clone()
    }

    #[inline]
    pub fn health_probes(&self) -> usize {
        self.inner.health_probes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn pending_replies(&self) -> usize {
        lock(&self.inner.script).len()
    }
}

impl ChatService for TestChatService {
    type Error = crate::Error;

    fn probe_health(
        &self,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'static {
        self.inner.health_probes.fetch_add(1, Ordering::Relaxed);
        let unhealthy = self.inner.unhealthy.load(Ordering::Relaxed);
        async move {
            if unhealthy {
                return Err(Error {
                    message: "Unable to connect to chat service".to_owned(),
                    kind: ErrorKind::ServiceUnavailable,
                });
            }
            Ok(json!({ "status": "healthy" }))
        }
    }

    fn exchange(
        &self,
        req: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, Self::Error>> + Send + 'static
    {
        lock(&self.inner.requests).push(req.clone());
        let reply = lock(&self.inner.script).pop_front();
        let delay =
            (*lock(&self.inner.delay)).unwrap_or(Duration::from_millis(1));
        let req = req.clone();

        async move {
            sleep(delay).await;
            match reply {
                Some(PresetReply::Respond(response)) => {
                    let mut history = req.history;
                    history.push(Turn::user(req.message));
                    history.push(Turn::assistant(response.clone()));
                    Ok(ExchangeResponse { response, history })
                }
                Some(PresetReply::Fail(message)) => Err(Error {
                    message,
                    kind: ErrorKind::RequestFailed,
                }),
                Some(PresetReply::Hang) => pending().await,
                None => Err(Error {
                    message: "no enough replies".to_owned(),
                    kind: ErrorKind::RequestFailed,
                }),
            }
        }
    }
}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
