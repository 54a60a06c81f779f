use serde::{Deserialize, Serialize};

/// Who a [`Turn`] is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The local user.
    User,
    /// The remote assistant.
    Assistant,
}

/// One message in a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it.
    pub role: Role,
    /// What was said.
    pub content: String,
}

impl Turn {
    /// Creates a turn attributed to the user.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a turn attributed to the assistant.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(Turn::user("Hello")).unwrap();
        assert_eq!(value, json!({ "role": "user", "content": "Hello" }));

        let turn: Turn = serde_json::from_value(json!({
            "role": "assistant",
            "content": "Hi there"
        }))
        .unwrap();
        assert_eq!(turn, Turn::assistant("Hi there"));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let res = serde_json::from_value::<Turn>(json!({
            "role": "system",
            "content": "You are a helpful assistant."
        }));
        assert!(res.is_err());
    }
}
