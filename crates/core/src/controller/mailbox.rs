use std::fmt::Debug;

use tokio::select;
use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use super::state::ControllerState;
use crate::ControllerClosedError;

/// A command that the controller task handles with mutable access to the
/// conversation.
pub trait Message: Send + Debug + 'static {
    fn handle(self: Box<Self>, state: &mut ControllerState, outbox: &Outbox);
}

/// Lets handlers and the tasks they spawn report back to the controller task.
pub type Outbox = mpsc::UnboundedSender<Box<dyn Message>>;

/// Sending half of the controller task. Dropping it stops the task.
pub struct Mailbox {
    msg_tx: Outbox,
    kill_tx: watch::Sender<bool>,
}

impl Mailbox {
    pub fn spawn(state: ControllerState) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = watch::channel(false);
        tokio::spawn(
            run_controller(state, msg_tx.clone(), msg_rx, kill_rx)
                .instrument(trace_span!("controller")),
        );
        Self { msg_tx, kill_tx }
    }

    #[inline]
    pub fn send<M: Message>(
        &self,
        msg: M,
    ) -> Result<(), ControllerClosedError> {
        self.msg_tx
            .send(Box::new(msg))
            .map_err(|_| ControllerClosedError)
    }
}

impl Drop for Mailbox {
    fn drop(&mut self) {
        self.kill_tx.send(true).ok();
    }
}

async fn run_controller(
    mut state: ControllerState,
    outbox: Outbox,
    mut msg_rx: mpsc::UnboundedReceiver<Box<dyn Message>>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("started");
    loop {
        let msg = select! {
            biased;

            _ = kill_rx.changed() => {
                break;
            }
            msg = msg_rx.recv() => {
                let Some(msg) = msg else {
                    break;
                };
                msg
            }
        };
        trace!("received message: {msg:?}");

        let proc_span = trace_span!("proc msg");
        proc_span.in_scope(|| {
            msg.handle(&mut state, &outbox);
            trace!("finished");
        });
    }
    state.abort_tasks();
    debug!("will terminate");
}
