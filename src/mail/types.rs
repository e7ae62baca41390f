/// A generated email waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    /// Address extracted from the task description
    pub recipient: String,
    pub subject: String,
    pub body: String,
}
