use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outbound mail seam. The concrete transport (SMTP provider, queue, test
/// recorder) is injected by the caller; the dispatcher only awaits one send
/// per recipient and counts the outcome.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        certificates: &[CertificateSummary],
    ) -> Result<(), MailError>;
}

/// One expiring certificate as rendered into a reminder e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub staff_member: String,
    pub certificate_type: String,
    pub expires_on: NaiveDate,
}

/// Mail transport failure for a single recipient.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("delivery rejected for {recipient}: {reason}")]
    Rejected { recipient: String, reason: String },
}
