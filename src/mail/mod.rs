pub mod address;
pub mod smtp;
pub mod types;

pub use address::extract_address;
pub use smtp::{MailTransport, SendError, SmtpClient};
pub use types::EmailDraft;
