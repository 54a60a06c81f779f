use serde::{Deserialize, Serialize};

/// How the test service answers one exchange.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Succeeds with the given assistant text.
    #[serde(rename = "respond")]
    Respond(String),
    /// Fails with the given message.
    #[serde(rename = "fail")]
    Fail(String),
    /// Never resolves.
    #[serde(rename = "hang")]
    Hang,
}

impl PresetReply {
    /// Creates a successful reply.
    #[inline]
    pub fn respond<S: Into<String>>(text: S) -> Self {
        Self::Respond(text.into())
    }

    /// Creates a failed reply.
    #[inline]
    pub fn fail<S: Into<String>>(message: S) -> Self {
        Self::Fail(message.into())
    }
}
