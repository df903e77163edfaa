//! In-memory conversation state.
//!
//! A [`Session`] is the ordered log of everything said so far: user
//! questions and assistant answers, appended in exchange order. Entries
//! are never mutated or removed; `clear` in the chat REPL simply starts a
//! fresh session.

use crate::models::{ChatMessage, ChatRole};

/// Ordered append-only log of one conversation.
#[derive(Debug, Default)]
pub struct Session {
    messages: Vec<ChatMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    /// All messages so far, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
    }

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut session = Session::new();
        session.push_user("first question");
        session.push_assistant("first answer");
        session.push_user("second question");

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "first question");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[2].role, ChatRole::User);
        assert_eq!(messages[2].content, "second question");
    }

    #[test]
    fn test_unanswered_question_stays_in_log() {
        let mut session = Session::new();
        session.push_user("q1");
        session.push_assistant("a1");
        session.push_user("q2");
        // No answer for q2; the log still ends with the open question.
        assert_eq!(session.len(), 3);
        assert_eq!(session.messages().last().unwrap().role, ChatRole::User);
    }
}
