//! Chat session orchestration
//!
//! - `conversation`: the displayed transcript and its turns
//! - `assembler`: builds outbound requests from transcript and dataset
//! - `session`: one conversation, one request at a time
//! - `metrics`: per-request metrics

pub mod assembler;
pub mod conversation;
pub mod metrics;
pub mod session;

pub use assembler::{ChatSettings, ContextAssembler, CustomerContext};
pub use conversation::{Sender, Transcript, Turn, GREETING};
pub use metrics::RequestMetrics;
pub use session::{ChatSession, SessionError, SessionReply};
