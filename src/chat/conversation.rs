//! Chat transcript
//!
//! A [`Transcript`] is the ordered list of [`Turn`]s shown to the user. It
//! grows without bound; only the most recent turns are sent to the model
//! (see [`Transcript::recent`]). Older turns are dropped from requests as
//! they are, never summarized.

use crate::providers::{Message, Role};
use chrono::{DateTime, Utc};

/// Greeting the assistant opens every session with
pub const GREETING: &str = "Hello! I'm your AI assistant. I can help you understand credit \
scores, answer questions about our dataset, and explain the website's features. How can I \
assist you today?";

/// Who wrote a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The person chatting
    User,
    /// The assistant (replies and failure notices alike)
    Assistant,
}

impl Sender {
    /// Role used for this sender in an outbound request
    pub fn role(self) -> Role {
        match self {
            Self::User => Role::User,
            Self::Assistant => Role::Assistant,
        }
    }
}

/// One message of the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Author
    pub sender: Sender,
    /// Text as displayed
    pub text: String,
    /// When the turn was recorded
    pub at: DateTime<Utc>,
}

impl Turn {
    /// A user turn stamped now
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    /// An assistant turn stamped now
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }

    /// Convert to an outbound message
    pub fn to_message(&self) -> Message {
        Message {
            role: self.sender.role(),
            content: self.text.clone(),
        }
    }
}

/// Ordered chat transcript
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// An empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opened by the assistant greeting
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::chat::{Sender, Transcript};
    ///
    /// let transcript = Transcript::with_greeting();
    /// assert_eq!(transcript.len(), 1);
    /// assert_eq!(transcript.turns()[0].sender, Sender::Assistant);
    /// ```
    pub fn with_greeting() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
        }
    }

    /// Append a turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `n` turns, oldest first
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::chat::{Transcript, Turn};
    ///
    /// let mut transcript = Transcript::new();
    /// for i in 0..5 {
    ///     transcript.push(Turn::user(format!("m{}", i)));
    /// }
    /// let recent: Vec<_> = transcript.recent(2).iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(recent, ["m3", "m4"]);
    /// ```
    pub fn recent(&self, n: usize) -> &[Turn] {
        recent(&self.turns, n)
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn and start over with the greeting
    pub fn reset(&mut self) {
        *self = Self::with_greeting();
    }
}

/// The last `n` entries of `turns`
pub fn recent(turns: &[Turn], n: usize) -> &[Turn] {
    &turns[turns.len().saturating_sub(n)..]
}
