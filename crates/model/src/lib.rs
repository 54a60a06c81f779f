//! Shared vocabulary between a conversation and the chat service behind it.
//!
//! This crate fixes the protocol that conversation controllers use to talk
//! to an assistant service, so that the controller can work against a real
//! HTTP endpoint or a scripted stub without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod exchange;
mod service;
mod turn;

pub use error::*;
pub use exchange::*;
pub use service::*;
pub use turn::*;
