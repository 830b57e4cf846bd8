//! Message types for the shared conversation.
//!
//! System (prompt, usually first), User (human input), Assistant (model reply inside
//! an agent's private exchange) and Agent (a step's contribution to the shared
//! `messages`, attributed to the step name).

use serde::{Deserialize, Serialize};

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System { content: String },
    /// Human input.
    User { content: String },
    /// Model reply.
    Assistant { content: String },
    /// Output of a named graph step (e.g. `data_gather_information`).
    Agent { name: String, content: String },
}

impl Message {
    /// Builds a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Builds a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Builds an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
        }
    }

    /// Builds a message attributed to a graph step.
    pub fn agent(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Agent {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Text content regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System { content }
            | Self::User { content }
            | Self::Assistant { content }
            | Self::Agent { content, .. } => content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_per_role() {
        assert_eq!(Message::agent("sql_generation", "SELECT 1").content(), "SELECT 1");
        assert_eq!(Message::user("hi").content(), "hi");
        assert_eq!(Message::system("s").content(), "s");
    }

    /// **Scenario**: Messages serialize with a `role` tag so transcripts are readable JSON.
    #[test]
    fn serializes_with_role_tag() {
        let v = serde_json::to_value(Message::agent("a", "b")).unwrap();
        assert_eq!(v["role"], "agent");
        assert_eq!(v["name"], "a");
        assert_eq!(v["content"], "b");
    }
}
