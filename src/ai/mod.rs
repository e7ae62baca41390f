//! Email drafting through a hosted chat completion backend
//!
//! The task text is wrapped into a small context envelope, sent as the user
//! turn of a two-message exchange, and the reply is split into a subject line
//! and a body.

mod client;
mod draft;
mod prompts;

pub use client::{AzureOpenAiClient, CompletionBackend, CompletionParams};
pub use draft::{DraftError, DraftGenerator};

#[cfg(test)]
pub(crate) use draft::tests as draft_tests;
