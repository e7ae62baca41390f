use serde::Serialize;
use thiserror::Error;

use super::client::{CompletionBackend, CompletionParams};
use super::prompts::DRAFT_SYSTEM;

const REQUEST_VERSION: &str = "1.0";
const ASSISTANT_ROLE: &str = "email-assistant";
const SEND_EMAIL_TOOL: &str = "send_email";
const SUBJECT_MARKER: &str = "subject:";

#[derive(Debug, Error)]
pub enum DraftError {
    /// Transport, auth, quota or decode failure talking to the backend
    #[error("Error during generation: {0}")]
    Generation(String),
    /// The backend answered, but not with a "Subject:" line followed by a body
    #[error("Unexpected response format from the model: {0}")]
    Malformed(&'static str),
}

/// Envelope sent as the user turn: fixed metadata plus the task verbatim
#[derive(Debug, Clone, Serialize)]
pub struct DraftRequest<'a> {
    version: &'static str,
    context: DraftContext,
    task: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct DraftContext {
    role: &'static str,
    memory: Vec<String>,
    tools: [&'static str; 1],
}

impl<'a> DraftRequest<'a> {
    pub fn new(task: &'a str) -> Self {
        Self {
            version: REQUEST_VERSION,
            context: DraftContext {
                role: ASSISTANT_ROLE,
                memory: Vec::new(),
                tools: [SEND_EMAIL_TOOL],
            },
            task,
        }
    }
}

/// Subject and body parsed from a model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDraft {
    pub subject: String,
    pub body: String,
}

/// Split a reply of the form "Subject: ...\n<body>" into its parts.
///
/// The marker is matched case-insensitively after leading whitespace. The
/// body keeps its internal line breaks and is trimmed at both ends.
pub fn parse_reply(reply: &str) -> Result<GeneratedDraft, DraftError> {
    let reply = reply.trim_start();

    let starts_with_marker = reply
        .get(..SUBJECT_MARKER.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(SUBJECT_MARKER));
    if !starts_with_marker {
        return Err(DraftError::Malformed("reply does not start with \"Subject:\""));
    }

    let (subject_line, body) = reply
        .split_once('\n')
        .ok_or(DraftError::Malformed("reply has no body"))?;

    let subject = subject_line[SUBJECT_MARKER.len()..].trim();
    if subject.is_empty() {
        return Err(DraftError::Malformed("subject line is empty"));
    }

    Ok(GeneratedDraft {
        subject: subject.to_string(),
        body: body.trim().to_string(),
    })
}

/// Turns a task description into a draft using a completion backend
pub struct DraftGenerator<B> {
    backend: B,
    params: CompletionParams,
}

impl<B: CompletionBackend> DraftGenerator<B> {
    pub fn new(backend: B, params: CompletionParams) -> Self {
        Self { backend, params }
    }

    pub async fn generate(&self, task: &str) -> Result<GeneratedDraft, DraftError> {
        let request = serde_json::to_string(&DraftRequest::new(task))
            .map_err(|e| DraftError::Generation(e.to_string()))?;

        let reply = self
            .backend
            .complete(DRAFT_SYSTEM, &request, self.params)
            .await
            .map_err(|e| DraftError::Generation(format!("{:#}", e)))?;

        parse_reply(&reply)
    }
}
