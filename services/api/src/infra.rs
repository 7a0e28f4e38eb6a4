use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use certwatch::workflows::compliance::domain::{Certificate, Employee, Position};
use certwatch::workflows::compliance::{DirectoryRepository, RepositoryError};
use certwatch::workflows::notifications::{CertificateSummary, MailError, MailSender};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Directory snapshot held in memory; seeded through the `/api/v1/directory`
/// endpoint.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectoryRepository {
    state: Arc<Mutex<DirectoryState>>,
}

#[derive(Default)]
struct DirectoryState {
    employees: Vec<Employee>,
    positions: Vec<Position>,
    certificates: Vec<Certificate>,
}

impl DirectoryRepository for InMemoryDirectoryRepository {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        let guard = self.state.lock().expect("directory mutex poisoned");
        Ok(guard.employees.clone())
    }

    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        let guard = self.state.lock().expect("directory mutex poisoned");
        Ok(guard.positions.clone())
    }

    fn certificates(&self) -> Result<Vec<Certificate>, RepositoryError> {
        let guard = self.state.lock().expect("directory mutex poisoned");
        Ok(guard.certificates.clone())
    }

    fn employee(&self, id: &str) -> Result<Option<Employee>, RepositoryError> {
        let guard = self.state.lock().expect("directory mutex poisoned");
        Ok(guard
            .employees
            .iter()
            .find(|employee| employee.id == id)
            .cloned())
    }

    fn update_employee(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("directory mutex poisoned");
        let slot = guard
            .employees
            .iter_mut()
            .find(|existing| existing.id == employee.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = employee;
        Ok(())
    }

    fn replace(
        &self,
        employees: Vec<Employee>,
        positions: Vec<Position>,
        certificates: Vec<Certificate>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("directory mutex poisoned");
        guard.employees = employees;
        guard.positions = positions;
        guard.certificates = certificates;
        Ok(())
    }
}

/// Stand-in transport: logs each reminder instead of delivering it. The real
/// SMTP provider sits behind the same trait outside this service.
#[derive(Default, Clone)]
pub(crate) struct LoggingMailSender;

#[async_trait]
impl MailSender for LoggingMailSender {
    async fn send(
        &self,
        recipient: &str,
        certificates: &[CertificateSummary],
    ) -> Result<(), MailError> {
        info!(
            %recipient,
            certificates = certificates.len(),
            "expiry reminder (log transport)"
        );
        Ok(())
    }
}

/// Transport double for the demo command: collects deliveries for display.
#[derive(Default, Clone)]
pub(crate) struct RecordingMailSender {
    outbox: Arc<Mutex<Vec<(String, Vec<CertificateSummary>)>>>,
}

impl RecordingMailSender {
    pub(crate) fn deliveries(&self) -> Vec<(String, Vec<CertificateSummary>)> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send(
        &self,
        recipient: &str,
        certificates: &[CertificateSummary],
    ) -> Result<(), MailError> {
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .push((recipient.to_string(), certificates.to_vec()));
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
