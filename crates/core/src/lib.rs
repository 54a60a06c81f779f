//! Core logic of a conversation: the transcript, the request/response cycle,
//! and the rollback of failed exchanges.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod controller;
pub mod conversation;
mod error;
mod service_client;

pub use controller::{
    Controller, ControllerBuilder, InitOptions, Rejection, SendDisposition,
};
pub use conversation::{ConversationState, ConversationStatus};
pub use error::{ControllerClosedError, ServiceFailure};
