use std::collections::HashMap;

use little_chat_model::{ExchangeRequest, ExchangeResponse, Turn};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use super::mailbox::{Message, Outbox};
use super::{InitOptions, Rejection, SendDisposition};
use crate::conversation::{
    Conversation, ConversationState, ConversationStatus, PendingTurn,
};
use crate::error::ServiceFailure;
use crate::service_client::ServiceClient;

pub struct ControllerState {
    service_client: ServiceClient,
    conversation: Conversation,
    status: ConversationStatus,
    last_error: Option<String>,
    seed_greeting: Option<String>,
    state_tx: watch::Sender<ConversationState>,
    running_tasks: HashMap<u64, JoinHandle<()>>,
    next_task_id: u64,
}

impl ControllerState {
    pub fn new(
        service_client: ServiceClient,
        state_tx: watch::Sender<ConversationState>,
    ) -> Self {
        Self {
            service_client,
            conversation: Default::default(),
            status: Default::default(),
            last_error: None,
            seed_greeting: None,
            state_tx,
            running_tasks: Default::default(),
            next_task_id: 1,
        }
    }

    fn initialize(&mut self, options: InitOptions, outbox: &Outbox) {
        // Once a greeting is in the transcript it stays the filter, so a later
        // call can never let the seed turn leak into the history.
        let greeting = options.seed_greeting.filter(|g| !g.is_empty());
        if let Some(greeting) = greeting {
            if self.conversation.seed(&greeting) {
                trace!("seeded the conversation");
                self.seed_greeting = Some(greeting);
                self.publish();
            } else if self.seed_greeting.is_none() {
                self.seed_greeting = Some(greeting);
            }
        }

        let service_client = self.service_client.clone();
        self.spawn_task(
            async move {
                match service_client.probe_health().await {
                    Ok(body) => info!("chat service is healthy: {body}"),
                    Err(err) => error!("health check failed: {err}"),
                }
            },
            outbox,
        );
    }

    fn send_user_turn(
        &mut self,
        text: &str,
        outbox: &Outbox,
    ) -> SendDisposition {
        let text = text.trim();
        if text.is_empty() {
            return SendDisposition::Rejected(Rejection::EmptyInput);
        }
        if !self.status.is_idle() {
            warn!("an exchange is still outstanding, ignoring the input");
            return SendDisposition::Rejected(Rejection::AwaitingResponse);
        }

        // The history is taken before the new turn, which travels separately
        // as the message.
        let request = ExchangeRequest {
            message: text.to_owned(),
            history: self
                .conversation
                .history_for_exchange(self.seed_greeting.as_deref()),
        };
        let pending = self.conversation.begin(Turn::user(text));
        self.status = ConversationStatus::AwaitingResponse;
        self.last_error = None;
        self.publish();

        let service_client = self.service_client.clone();
        let outbox_clone = outbox.clone();
        self.spawn_task(
            async move {
                let result = service_client.exchange(request).await;
                outbox_clone
                    .send(Box::new(ExchangeFinishedMessage { pending, result }))
                    .ok();
            },
            outbox,
        );
        SendDisposition::Accepted
    }

    fn finish_exchange(
        &mut self,
        pending: PendingTurn,
        result: Result<ExchangeResponse, ServiceFailure>,
    ) {
        match result {
            Ok(resp) => {
                self.conversation
                    .commit(pending, Turn::assistant(resp.response));
            }
            Err(failure) => {
                let removed = self.conversation.roll_back(pending);
                trace!("rolled back {removed:?}");
                self.last_error = Some(failure.message().to_owned());
            }
        }
        self.status = ConversationStatus::Idle;
        self.publish();
    }

    fn reset(&mut self) {
        if self.last_error.take().is_some() {
            self.publish();
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(ConversationState {
            transcript: self.conversation.turns().to_vec(),
            status: self.status,
            last_error: self.last_error.clone(),
        });
    }

    fn spawn_task<Fut>(&mut self, fut: Fut, outbox: &Outbox)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let outbox = outbox.clone();
        let task = tokio::spawn(async move {
            fut.await;
            outbox.send(Box::new(TaskEndedMessage(task_id))).ok();
        });
        self.running_tasks.insert(task_id, task);
    }

    pub fn abort_tasks(&mut self) {
        for (_, task) in self.running_tasks.drain() {
            task.abort();
        }
    }
}

#[derive(Debug)]
pub struct InitializeMessage {
    pub options: InitOptions,
    pub reply: oneshot::Sender<()>,
}

impl Message for InitializeMessage {
    fn handle(self: Box<Self>, state: &mut ControllerState, outbox: &Outbox) {
        state.initialize(self.options, outbox);
        self.reply.send(()).ok();
    }
}

#[derive(Debug)]
pub struct SendUserTurnMessage {
    pub text: String,
    pub reply: oneshot::Sender<SendDisposition>,
}

impl Message for SendUserTurnMessage {
    fn handle(self: Box<Self>, state: &mut ControllerState, outbox: &Outbox) {
        let disposition = state.send_user_turn(&self.text, outbox);
        self.reply.send(disposition).ok();
    }
}

#[derive(Debug)]
pub struct ResetMessage {
    pub reply: oneshot::Sender<()>,
}

impl Message for ResetMessage {
    fn handle(self: Box<Self>, state: &mut ControllerState, _outbox: &Outbox) {
        state.reset();
        self.reply.send(()).ok();
    }
}

#[derive(Debug)]
struct ExchangeFinishedMessage {
    pending: PendingTurn,
    result: Result<ExchangeResponse, ServiceFailure>,
}

impl Message for ExchangeFinishedMessage {
    fn handle(self: Box<Self>, state: &mut ControllerState, _outbox: &Outbox) {
        state.finish_exchange(self.pending, self.result);
    }
}

#[derive(Debug)]
struct TaskEndedMessage(u64);

impl Message for TaskEndedMessage {
    #[inline]
    fn handle(self: Box<Self>, state: &mut ControllerState, _outbox: &Outbox) {
        if state.running_tasks.remove(&self.0).is_none() {
            warn!("task {} ended but was never tracked", self.0);
        }
    }
}
