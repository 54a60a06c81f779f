//! An embeddable chat widget that talks to a remote assistant.
//!
//! The crate wires the HTTP chat service into a conversation controller,
//! and exposes the configuration surface a host sets on the widget. Drawing
//! the widget is left to the host: it forwards user input to
//! [`ChatWidget::send_message`] and renders whatever
//! [`ChatWidget::state`] returns.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod widget;

pub use config::{Position, WidgetConfig};
pub use widget::{ChatWidget, ChatWidgetBuilder};

/// Re-exports of [`little_chat_core`] crate.
pub mod core {
    pub use little_chat_core::*;
}
