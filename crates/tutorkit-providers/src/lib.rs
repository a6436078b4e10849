//! tutorkit-providers — capability implementations.
//!
//! Implements the `Judge` and `Tutor` traits over an OpenAI-compatible
//! chat-completions API (the default endpoint is DeepSeek), plus mock
//! capabilities for testing and the configuration layer.

pub mod chat;
pub mod config;
pub mod error;
pub mod judge;
pub mod mock;
pub mod tutor;

pub use chat::{ChatClient, ChatMessage};
pub use config::{create_capabilities, load_config, Capabilities, TutorkitConfig};
pub use error::ProviderError;
pub use judge::ChatJudge;
pub use tutor::ChatTutor;
