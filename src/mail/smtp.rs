use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::response::{Category, Code, Detail, Severity};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum SendError {
    /// The relay rejected the login
    #[error("Authentication failed: check your email/password or app password ({0})")]
    Authentication(String),
    /// Anything else: building the message, connecting, or transmitting
    #[error("Failed to send email: {0}")]
    Failed(String),
}

/// Something that can deliver a single plain-text email.
pub trait MailTransport {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError>;
}

pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl SmtpClient {
    /// Build an implicit-TLS (SMTPS) client for the configured relay.
    ///
    /// No connection is opened here; each `send` connects, authenticates,
    /// transmits and closes.
    pub fn new(config: &MailConfig, password: &str) -> Result<Self, SendError> {
        let creds = Credentials::new(config.login().to_string(), password.to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)
            .map_err(|e| SendError::Failed(format!("Failed to create SMTP transport: {}", e)))?
            .port(config.smtp_port)
            .credentials(creds)
            .authentication(vec![Mechanism::Plain, Mechanism::Login])
            .build();

        Ok(Self {
            transport,
            from_email: config.address.clone(),
        })
    }
}

/// Assemble a single-part text/plain message with From, To and Subject.
pub fn build_message(from: &str, to: &str, subject: &str, body: &str) -> Result<Message, SendError> {
    let from_mailbox = from
        .parse::<Mailbox>()
        .map_err(|e| SendError::Failed(format!("Invalid from address {}: {}", from, e)))?;
    let to_mailbox = to
        .parse::<Mailbox>()
        .map_err(|e| SendError::Failed(format!("Invalid recipient address {}: {}", to, e)))?;

    Message::builder()
        .from(from_mailbox)
        .to(to_mailbox)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| SendError::Failed(format!("Failed to build email message: {}", e)))
}

/// 530, 534 and 535 are the relay's ways of refusing credentials.
fn is_auth_rejection(code: Code) -> bool {
    matches!(
        (code.severity, code.category, code.detail),
        (
            Severity::PermanentNegativeCompletion,
            Category::Unspecified3,
            Detail::Zero | Detail::Four | Detail::Five
        )
    )
}

fn classify(err: lettre::transport::smtp::Error) -> SendError {
    match err.status() {
        Some(code) if is_auth_rejection(code) => SendError::Authentication(err.to_string()),
        _ => SendError::Failed(err.to_string()),
    }
}

impl MailTransport for SmtpClient {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError> {
        let message = build_message(&self.from_email, to, subject, body)?;

        self.transport.send(message).await.map_err(classify)?;

        tracing::info!("Email sent to {}", to);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    pub(crate) type SentLog = Arc<Mutex<Vec<(String, String, String)>>>;

    /// Transport that records sends and answers with a scripted outcome
    pub(crate) struct StubTransport {
        pub fail_with_auth: bool,
        pub sent: SentLog,
    }

    impl StubTransport {
        pub fn ok() -> Self {
            Self {
                fail_with_auth: false,
                sent: SentLog::default(),
            }
        }

        pub fn rejecting_login() -> Self {
            Self {
                fail_with_auth: true,
                sent: SentLog::default(),
            }
        }

        pub fn log(&self) -> SentLog {
            Arc::clone(&self.sent)
        }
    }

    impl MailTransport for StubTransport {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            if self.fail_with_auth {
                return Err(SendError::Authentication(
                    "535 5.7.8 Username and Password not accepted".to_string(),
                ));
            }
            Ok(())
        }
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(
            "me@example.com",
            "jane.doe@example.com",
            "Invoice Follow-up",
            "Hi Jane,\n\nJust checking in.",
        )
        .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: me@example.com"));
        assert!(raw.contains("To: jane.doe@example.com"));
        assert!(raw.contains("Subject: Invoice Follow-up"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains("Just checking in."));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let err = build_message("me@example.com", "not an address", "s", "b").unwrap_err();
        assert!(matches!(err, SendError::Failed(_)));
    }

    #[test]
    fn test_auth_codes_classified() {
        let code = |d| Code::new(Severity::PermanentNegativeCompletion, Category::Unspecified3, d);
        assert!(is_auth_rejection(code(Detail::Five)));
        assert!(is_auth_rejection(code(Detail::Four)));
        assert!(is_auth_rejection(code(Detail::Zero)));
        assert!(!is_auth_rejection(code(Detail::Eight)));
    }

    #[test]
    fn test_other_codes_not_auth() {
        // 554 transaction failed, 421 service unavailable
        assert!(!is_auth_rejection(Code::new(
            Severity::PermanentNegativeCompletion,
            Category::MailSystem,
            Detail::Four
        )));
        assert!(!is_auth_rejection(Code::new(
            Severity::TransientNegativeCompletion,
            Category::Connections,
            Detail::One
        )));
    }

    fn local_relay(port: u16) -> MailConfig {
        MailConfig {
            address: "me@example.com".to_string(),
            username: None,
            smtp_server: "127.0.0.1".to_string(),
            smtp_port: port,
        }
    }

    #[tokio::test]
    async fn test_send_opens_tls_before_smtp_greeting() {
        use std::io::Read;
        use std::net::TcpListener;
        use std::time::Duration;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        // Never send a 220 banner: a STARTTLS client would wait for one,
        // an implicit-TLS client speaks first with a ClientHello.
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let mut first = [0u8; 1];
            stream.read_exact(&mut first).unwrap();
            first[0]
        });

        let client = SmtpClient::new(&local_relay(port), "secret").unwrap();
        let result = client
            .send("jane.doe@example.com", "Invoice Follow-up", "Hi Jane, ...")
            .await;

        // TLS handshake record type
        assert_eq!(server.join().unwrap(), 0x16);
        assert!(matches!(result, Err(SendError::Failed(_))));
    }
}
