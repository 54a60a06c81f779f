//! Conversation-related types.

use little_chat_model::Turn;
use serde::Serialize;

/// Whether an exchange is currently outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationStatus {
    /// Ready to accept a new user turn.
    #[default]
    Idle,
    /// A user turn has been sent and its reply is not in yet.
    AwaitingResponse,
}

impl ConversationStatus {
    /// Returns `true` if no exchange is outstanding.
    #[inline]
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// A snapshot of everything the presentation layer needs to render.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversationState {
    /// All turns, oldest first. While awaiting a response, the last turn is
    /// the pending user turn.
    pub transcript: Vec<Turn>,
    /// The current status.
    pub status: ConversationStatus,
    /// Message of the most recent failed exchange, if it hasn't been
    /// cleared yet.
    pub last_error: Option<String>,
}

/// The transcript of a conversation.
#[derive(Clone, Debug, Default)]
pub(crate) struct Conversation {
    turns: Vec<Turn>,
}

/// Undo token for a user turn that is not confirmed yet.
///
/// Exactly one of [`Conversation::commit`] and [`Conversation::roll_back`]
/// consumes it.
#[must_use]
#[derive(Debug)]
pub(crate) struct PendingTurn {
    committed_len: usize,
}

impl Conversation {
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Appends the greeting as an assistant turn, only if nothing has been
    /// said yet.
    pub fn seed(&mut self, greeting: &str) -> bool {
        if !self.turns.is_empty() {
            return false;
        }
        self.turns.push(Turn::assistant(greeting));
        true
    }

    /// Builds the history sent along with the next message.
    ///
    /// Turns whose content equals the greeting are left out, wherever they
    /// appear and whoever said them.
    pub fn history_for_exchange(&self, greeting: Option<&str>) -> Vec<Turn> {
        self.turns
            .iter()
            .filter(|turn| Some(turn.content.as_str()) != greeting)
            .cloned()
            .collect()
    }

    /// Optimistically appends a turn.
    pub fn begin(&mut self, turn: Turn) -> PendingTurn {
        let committed_len = self.turns.len();
        self.turns.push(turn);
        PendingTurn { committed_len }
    }

    /// Confirms the pending turn and appends the reply after it.
    pub fn commit(&mut self, pending: PendingTurn, reply: Turn) {
        debug_assert_eq!(self.turns.len(), pending.committed_len + 1);
        self.turns.push(reply);
    }

    /// Removes the pending turn, which is always the most recent one.
    pub fn roll_back(&mut self, pending: PendingTurn) -> Option<Turn> {
        debug_assert_eq!(self.turns.len(), pending.committed_len + 1);
        self.turns.pop()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const GREETING: &str = "Hi! How can I help?";

    #[test]
    fn test_seed_once() {
        let mut conversation = Conversation::default();
        assert!(conversation.seed(GREETING));
        assert!(!conversation.seed(GREETING));
        assert!(!conversation.seed("Another greeting"));
        assert_eq!(conversation.turns(), &[Turn::assistant(GREETING)]);
    }

    #[test]
    fn test_history_excludes_greeting() {
        let mut conversation = Conversation::default();
        conversation.seed(GREETING);
        let pending = conversation.begin(Turn::user("Hello"));
        conversation.commit(pending, Turn::assistant("Hi"));
        let pending = conversation.begin(Turn::user(GREETING));
        conversation.commit(pending, Turn::assistant("That's my line"));

        assert_eq!(
            conversation.history_for_exchange(Some(GREETING)),
            vec![
                Turn::user("Hello"),
                Turn::assistant("Hi"),
                Turn::assistant("That's my line"),
            ]
        );
        assert_eq!(conversation.history_for_exchange(None).len(), 5);
    }

    #[test]
    fn test_roll_back_restores_committed_state() {
        let mut conversation = Conversation::default();
        conversation.seed(GREETING);
        let pending = conversation.begin(Turn::user("Hello"));
        assert_eq!(conversation.turns().len(), 2);

        let removed = conversation.roll_back(pending);
        assert_eq!(removed, Some(Turn::user("Hello")));
        assert_eq!(conversation.turns(), &[Turn::assistant(GREETING)]);
    }

    #[test]
    fn test_state_serialization() {
        let state = ConversationState {
            transcript: vec![Turn::user("Hello")],
            status: ConversationStatus::AwaitingResponse,
            last_error: None,
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "transcript": [{ "role": "user", "content": "Hello" }],
                "status": "awaiting-response",
                "last_error": null
            })
        );
    }
}
