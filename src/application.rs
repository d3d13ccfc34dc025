//! Application layer - interactive session orchestration
//!
//! The prompt turns raw terminal input into typed attempts; the session
//! controller drives the scrape pipeline state machine over them.

pub mod prompt;
pub mod session;

pub use prompt::{Attempt, Prompt};
pub use session::SessionController;
