//! Expiry notification selection, grouping, and dispatch.

mod dispatcher;
pub mod mailer;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use dispatcher::{
    dispatch, preview, ExpiringCertificateView, NotificationResult, SCHEDULED_THRESHOLD_DAYS,
};
pub use mailer::{CertificateSummary, MailError, MailSender};
pub use router::{compliance_router, ScheduleGate};
pub use service::{ComplianceService, ComplianceServiceError};
