use std::sync::Arc;
use std::time::Duration;

use little_chat_model::ChatService;
use tokio::sync::watch;

use super::Controller;
use super::mailbox::Mailbox;
use super::state::ControllerState;
use crate::service_client::ServiceClient;

/// [`Controller`] builder.
pub struct ControllerBuilder {
    service_client: ServiceClient,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified chat service.
    #[inline]
    pub fn with_service<S: ChatService + 'static>(service: S) -> Self {
        Self {
            service_client: ServiceClient::new(service),
        }
    }

    /// Gives up on an exchange after `timeout`, and treats it as failed.
    ///
    /// Without a timeout, an exchange that never resolves keeps the
    /// controller awaiting a response forever.
    #[inline]
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.service_client.set_exchange_timeout(timeout);
        self
    }

    /// Builds the controller.
    ///
    /// This must be called within a tokio runtime.
    pub fn build(self) -> Controller {
        let (state_tx, state_rx) = watch::channel(Default::default());
        let state = ControllerState::new(self.service_client, state_tx);
        Controller {
            mailbox: Arc::new(Mailbox::spawn(state)),
            state_rx,
        }
    }
}
