//! Per-chat conversation state.

mod conversation;
mod store;

pub use conversation::{Conversation, TransitionOutcome};
pub use store::{Generation, SessionStore};
