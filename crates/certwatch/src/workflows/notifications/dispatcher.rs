use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::mailer::{CertificateSummary, MailSender};
use crate::workflows::compliance::domain::{Certificate, Employee};

/// Threshold applied by the scheduled (cron-triggered) dispatch path. Manual
/// triggers pass their own threshold.
pub const SCHEDULED_THRESHOLD_DAYS: u32 = 60;

/// Outcome of one dispatch run. Every selected certificate's owner lands in
/// exactly one of the three counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationResult {
    pub emails_sent: usize,
    pub emails_failed: usize,
    pub no_email_count: usize,
    pub threshold_days: u32,
    pub ran_on: NaiveDate,
}

/// A qualifying certificate as listed by the dry-run preview.
#[derive(Debug, Clone, Serialize)]
pub struct ExpiringCertificateView {
    pub id: String,
    pub staff_member: String,
    pub certificate_type: String,
    pub expires_on: NaiveDate,
    pub days_until_expiry: i64,
}

/// Lists the certificates a dispatch run with the same threshold would cover,
/// soonest expiry first, without sending anything.
pub fn preview(
    certificates: &[Certificate],
    threshold_days: u32,
    today: NaiveDate,
) -> Vec<ExpiringCertificateView> {
    let mut selected: Vec<&Certificate> = certificates
        .iter()
        .filter(|cert| cert.expiring_within(today, i64::from(threshold_days)))
        .collect();
    selected.sort_by_key(|cert| cert.expiration_date);

    selected
        .into_iter()
        .filter_map(|cert| {
            let expires_on = cert.expiration_date?;
            Some(ExpiringCertificateView {
                id: cert.id.clone(),
                staff_member: cert.staff_member.clone(),
                certificate_type: cert.certificate_type.clone(),
                expires_on,
                days_until_expiry: (expires_on - today).num_days(),
            })
        })
        .collect()
}

/// Selects certificates expiring within `threshold_days`, groups them by the
/// owning employee's e-mail, and sends one reminder per recipient.
///
/// A recipient whose send fails is counted and skipped; remaining recipients
/// still receive their mail. Certificates whose owner has no deliverable
/// address are counted per certificate under `no_email_count`.
pub async fn dispatch<M>(
    certificates: &[Certificate],
    employees: &[Employee],
    threshold_days: u32,
    today: NaiveDate,
    mail_sender: &M,
) -> NotificationResult
where
    M: MailSender + ?Sized,
{
    // First occurrence wins, matching the lookup order of the persisted data.
    let mut employees_by_name: HashMap<&str, &Employee> = HashMap::new();
    for employee in employees {
        employees_by_name.entry(employee.name.as_str()).or_insert(employee);
    }

    let mut no_email_count = 0usize;
    let mut batches: BTreeMap<&str, Vec<CertificateSummary>> = BTreeMap::new();

    // Selection yields the expiry date alongside the certificate so every
    // selected certificate is guaranteed to land in a counter below.
    let selected = certificates.iter().filter_map(|cert| {
        cert.expiration_date
            .filter(|_| cert.expiring_within(today, i64::from(threshold_days)))
            .map(|expires_on| (cert, expires_on))
    });

    for (cert, expires_on) in selected {
        let recipient = employees_by_name
            .get(cert.staff_member.as_str())
            .and_then(|employee| employee.contact_email());

        let Some(recipient) = recipient else {
            no_email_count += 1;
            continue;
        };

        batches.entry(recipient).or_default().push(CertificateSummary {
            staff_member: cert.staff_member.clone(),
            certificate_type: cert.certificate_type.clone(),
            expires_on,
        });
    }

    let mut emails_sent = 0usize;
    let mut emails_failed = 0usize;

    for (recipient, summaries) in &batches {
        match mail_sender.send(recipient, summaries).await {
            Ok(()) => emails_sent += 1,
            Err(error) => {
                warn!(%recipient, %error, "expiry reminder failed");
                emails_failed += 1;
            }
        }
    }

    NotificationResult {
        emails_sent,
        emails_failed,
        no_email_count,
        threshold_days,
        ran_on: today,
    }
}
