//! Conversation driver
//!
//! `CopilotAgent` owns the tool-calling loop. Tool failures stay inside the
//! transcript; everything in [`AgentError`] ends the conversation.

mod engine;
mod error;
mod interrupt;
mod prompt;

pub use engine::{AgentReply, CopilotAgent, seed_message, strip_fences};
pub use error::{AgentError, RAW_EXCERPT_CHARS};
pub use interrupt::relay_interrupts;
pub use prompt::{SYSTEM_PROMPT, load_system_prompt};
