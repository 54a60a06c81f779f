use serde::{Deserialize, Serialize};

use crate::Turn;

/// A single user message together with the history that precedes it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// The new user message.
    pub message: String,
    /// Prior turns, oldest first. The new message is not part of it.
    pub history: Vec<Turn>,
}

/// A successful reply from the chat service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeResponse {
    /// The assistant's reply text.
    pub response: String,
    /// The history as the service sees it after this exchange.
    ///
    /// Services are free to return it, and callers are free to ignore it.
    pub history: Vec<Turn>,
}
