mod builder;
mod mailbox;
mod state;

use std::sync::Arc;

use tokio::sync::{oneshot, watch};

pub use builder::ControllerBuilder;
use mailbox::Mailbox;
use state::{InitializeMessage, ResetMessage, SendUserTurnMessage};

use crate::ControllerClosedError;
use crate::conversation::ConversationState;

/// Options for [`Controller::initialize`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InitOptions {
    /// Greeting shown as the first assistant turn. It is never sent to the
    /// service as part of the history.
    pub seed_greeting: Option<String>,
}

impl InitOptions {
    /// Sets the seed greeting.
    #[inline]
    pub fn with_seed_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.seed_greeting = Some(greeting.into());
        self
    }
}

/// What happened to a user turn passed to [`Controller::send_user_turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SendDisposition {
    /// The turn was appended and an exchange is now outstanding.
    Accepted,
    /// Nothing changed.
    Rejected(Rejection),
}

/// Why a user turn was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The text was empty after trimming whitespace.
    EmptyInput,
    /// Another exchange is still outstanding.
    AwaitingResponse,
}

/// A conversation controller, which owns the transcript, the status and the
/// last error of one conversation.
///
/// All state lives in a background task, and commands are handled in the
/// order they are sent. User turns are applied optimistically: the turn is
/// visible right away, and removed again if the exchange fails.
///
/// Clones refer to the same conversation. The background task stops when
/// the last clone is dropped.
#[derive(Clone)]
pub struct Controller {
    mailbox: Arc<Mailbox>,
    state_rx: watch::Receiver<ConversationState>,
}

impl Controller {
    /// Seeds the conversation with a greeting if it is still empty, and
    /// probes the service's health in the background.
    ///
    /// The probe result is only logged.
    pub async fn initialize(
        &self,
        options: InitOptions,
    ) -> Result<(), ControllerClosedError> {
        let (reply, rx) = oneshot::channel();
        self.mailbox.send(InitializeMessage { options, reply })?;
        rx.await.map_err(|_| ControllerClosedError)
    }

    /// Sends a user turn to the service.
    ///
    /// This returns as soon as the turn is accepted or rejected, without
    /// waiting for the reply. Use [`Controller::wait_idle`] or
    /// [`Controller::subscribe`] to observe the outcome.
    pub async fn send_user_turn<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<SendDisposition, ControllerClosedError> {
        let (reply, rx) = oneshot::channel();
        self.mailbox.send(SendUserTurnMessage {
            text: text.into(),
            reply,
        })?;
        rx.await.map_err(|_| ControllerClosedError)
    }

    /// Clears the last error. The transcript is kept.
    pub async fn reset(&self) -> Result<(), ControllerClosedError> {
        let (reply, rx) = oneshot::channel();
        self.mailbox.send(ResetMessage { reply })?;
        rx.await.map_err(|_| ControllerClosedError)
    }

    /// Returns the latest state.
    #[inline]
    pub fn state(&self) -> ConversationState {
        self.state_rx.borrow().clone()
    }

    /// Returns a receiver that is notified on every state change.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state_rx.clone()
    }

    /// Waits until no exchange is outstanding, and returns that state.
    pub async fn wait_idle(
        &self,
    ) -> Result<ConversationState, ControllerClosedError> {
        let mut state_rx = self.state_rx.clone();
        state_rx
            .wait_for(|state| state.status.is_idle())
            .await
            .map(|state| state.clone())
            .map_err(|_| ControllerClosedError)
    }
}
