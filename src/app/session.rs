//! Task → draft → send workflow
//!
//! The session holds at most one draft. A draft is stored only after a reply
//! parses completely, and it is cleared only after the relay accepts the
//! message. Every failure leaves the previous state untouched.

use thiserror::Error;

use crate::ai::{CompletionBackend, DraftError, DraftGenerator};
use crate::mail::{EmailDraft, MailTransport, SendError, extract_address};

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Task text rejected before any service was called
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error("No draft to send. Generate one first.")]
    NoDraft,
}

/// Session-scoped draft state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Drafted(EmailDraft),
}

impl SessionState {
    pub fn has_draft(&self) -> bool {
        matches!(self, Self::Drafted(_))
    }

    pub fn draft(&self) -> Option<&EmailDraft> {
        match self {
            Self::Drafted(draft) => Some(draft),
            Self::Idle => None,
        }
    }
}

pub struct Session<B, T> {
    generator: DraftGenerator<B>,
    transport: T,
    state: SessionState,
}

impl<B: CompletionBackend, T: MailTransport> Session<B, T> {
    pub fn new(generator: DraftGenerator<B>, transport: T) -> Self {
        Self {
            generator,
            transport,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Generate a draft for `task`, replacing any held draft on success.
    pub async fn submit(&mut self, task: &str) -> Result<&EmailDraft, WorkflowError> {
        if task.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "Task description is empty. Describe the email and include the recipient.",
            ));
        }

        let recipient = extract_address(task).ok_or(WorkflowError::Validation(
            "No valid email address found in the task description.",
        ))?;

        let generated = self.generator.generate(task).await?;

        tracing::info!(
            "Draft generated for {} (subject: {:?})",
            recipient,
            generated.subject
        );

        self.state = SessionState::Drafted(EmailDraft {
            recipient: recipient.to_string(),
            subject: generated.subject,
            body: generated.body,
        });

        self.state.draft().ok_or(WorkflowError::NoDraft)
    }

    /// Send the held draft. Returns the recipient once the relay accepts it.
    pub async fn confirm_send(&mut self) -> Result<String, WorkflowError> {
        let draft = self.state.draft().ok_or(WorkflowError::NoDraft)?;

        self.transport
            .send(&draft.recipient, &draft.subject, &draft.body)
            .await?;

        match std::mem::take(&mut self.state) {
            SessionState::Drafted(draft) => Ok(draft.recipient),
            SessionState::Idle => Err(WorkflowError::NoDraft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::draft_tests::{StubBackend, params};
    use crate::mail::smtp::tests::StubTransport;

    const TASK: &str = "Please follow up with jane.doe@example.com about the invoice.";
    const REPLY: &str = "Subject: Invoice Follow-up\nHi Jane, ...";

    fn session(
        backend: StubBackend,
        transport: StubTransport,
    ) -> Session<StubBackend, StubTransport> {
        Session::new(DraftGenerator::new(backend, params()), transport)
    }

    fn expected_draft() -> EmailDraft {
        EmailDraft {
            recipient: "jane.doe@example.com".to_string(),
            subject: "Invoice Follow-up".to_string(),
            body: "Hi Jane, ...".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_draft() {
        let mut session = session(StubBackend::replying(REPLY), StubTransport::ok());
        assert_eq!(session.state(), &SessionState::Idle);

        let draft = session.submit(TASK).await.unwrap().clone();
        assert_eq!(draft, expected_draft());
        assert_eq!(session.state(), &SessionState::Drafted(expected_draft()));
    }

    #[tokio::test]
    async fn test_submit_without_address_never_calls_backend() {
        let backend = StubBackend::replying(REPLY);
        let calls = backend.log();
        let mut session = session(backend, StubTransport::ok());

        let err = session.submit("Email Jane about the invoice").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));

        let err = session.submit("   \n").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn test_malformed_reply_stays_idle() {
        let mut session = session(
            StubBackend::replying("Dear Jane,\nHere is the email."),
            StubTransport::ok(),
        );

        let err = session.submit(TASK).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Draft(DraftError::Malformed(_))));
        assert!(!session.state().has_draft());
    }

    #[tokio::test]
    async fn test_backend_failure_stays_idle() {
        let mut session = session(StubBackend::failing("connection reset"), StubTransport::ok());

        let err = session.submit(TASK).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Draft(DraftError::Generation(_))));
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn test_confirm_send_clears_draft() {
        let transport = StubTransport::ok();
        let sent = transport.log();
        let mut session = session(StubBackend::replying(REPLY), transport);

        session.submit(TASK).await.unwrap();
        let recipient = session.confirm_send().await.unwrap();

        assert_eq!(recipient, "jane.doe@example.com");
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.state().draft().is_none());
        assert_eq!(
            sent.lock().unwrap().as_slice(),
            &[(
                "jane.doe@example.com".to_string(),
                "Invoice Follow-up".to_string(),
                "Hi Jane, ...".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_failed_send_keeps_draft_for_retry() {
        let transport = StubTransport::rejecting_login();
        let sent = transport.log();
        let mut session = session(StubBackend::replying(REPLY), transport);

        session.submit(TASK).await.unwrap();
        let err = session.confirm_send().await.unwrap_err();
        assert!(matches!(err, WorkflowError::Send(SendError::Authentication(_))));
        assert_eq!(session.state(), &SessionState::Drafted(expected_draft()));

        // Retrying reuses the held draft without regenerating
        let err = session.confirm_send().await.unwrap_err();
        assert!(matches!(err, WorkflowError::Send(_)));
        assert_eq!(sent.lock().unwrap().len(), 2);
        assert_eq!(session.state(), &SessionState::Drafted(expected_draft()));
    }

    #[tokio::test]
    async fn test_confirm_send_without_draft() {
        let transport = StubTransport::ok();
        let sent = transport.log();
        let mut session = session(StubBackend::replying(REPLY), transport);

        let err = session.confirm_send().await.unwrap_err();
        assert!(matches!(err, WorkflowError::NoDraft));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_previous_draft() {
        let mut session = session(StubBackend::replying(REPLY), StubTransport::ok());
        session.submit(TASK).await.unwrap();

        // Same backend: a task without an address fails validation
        let err = session.submit("now write to nobody").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(session.state(), &SessionState::Drafted(expected_draft()));

        // Swap in a failing backend while a draft is held
        let failing = Session {
            generator: DraftGenerator::new(StubBackend::failing("503"), params()),
            transport: StubTransport::ok(),
            state: session.state.clone(),
        };
        let mut session = failing;
        let err = session.submit("write to bob@example.com").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Draft(_)));
        assert_eq!(session.state(), &SessionState::Drafted(expected_draft()));
    }

    #[tokio::test]
    async fn test_resubmit_supersedes_draft() {
        let mut session = session(StubBackend::replying(REPLY), StubTransport::ok());
        session.submit(TASK).await.unwrap();

        let draft = session
            .submit("Thank bob@example.org for the help")
            .await
            .unwrap();
        assert_eq!(draft.recipient, "bob@example.org");
        assert_eq!(draft.subject, "Invoice Follow-up");
    }
}
