//! System prompts for AI features

/// System prompt for drafting an email from a task request
pub const DRAFT_SYSTEM: &str = r#"You are a professional assistant. Using the provided MCP context, generate a concise, polite email. Start your reply with a line of the form "Subject: <subject>", followed by the email body."#;
