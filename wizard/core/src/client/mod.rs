//! Content Clients
//!
//! The seam between the wizard and the remote generative service.

pub mod openai;
pub mod prompts;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{ContentClient, FailureReason, GenerationResult};
