//! Conversation state and orchestration
//!
//! Glues media capture, speech recognition and speech output into a
//! turn-taking conversation over the backend's chat and analysis
//! endpoints.

pub mod message;
pub mod orchestrator;

pub use message::{Message, Role};
pub use orchestrator::ConversationOrchestrator;
