use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::workflows::compliance::domain::{
    Certificate, CertificateStatus, Employee, Position, PositionRef,
};
use crate::workflows::compliance::repository::{DirectoryRepository, RepositoryError};
use crate::workflows::notifications::mailer::{CertificateSummary, MailError, MailSender};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

pub(super) fn employee(name: &str, email: Option<&str>) -> Employee {
    Employee {
        id: format!("emp-{}", name.to_ascii_lowercase().replace(' ', "-")),
        name: name.to_string(),
        email: email.map(str::to_string),
        active: None,
        positions: Vec::new(),
        primary_position: None,
    }
}

pub(super) fn certificate(id: &str, staff: &str, cert_type: &str, expires_on: &str) -> Certificate {
    Certificate {
        id: id.to_string(),
        staff_member: staff.to_string(),
        certificate_type: cert_type.to_string(),
        position: None,
        status: CertificateStatus::Active,
        expiration_date: Some(
            NaiveDate::parse_from_str(expires_on, "%Y-%m-%d").expect("valid date"),
        ),
        attachment: None,
    }
}

/// Mail transport double: records every delivery, optionally rejecting
/// configured recipients.
#[derive(Default)]
pub(super) struct RecordingMailSender {
    outbox: Mutex<Vec<(String, Vec<CertificateSummary>)>>,
    rejects: HashSet<String>,
}

impl RecordingMailSender {
    pub(super) fn rejecting(addresses: &[&str]) -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            rejects: addresses.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    pub(super) fn deliveries(&self) -> Vec<(String, Vec<CertificateSummary>)> {
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
        if self.rejects.contains(recipient) {
            return Err(MailError::Rejected {
                recipient: recipient.to_string(),
                reason: "simulated bounce".to_string(),
            });
        }
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .push((recipient.to_string(), certificates.to_vec()));
        Ok(())
    }
}

/// Directory double backing the router tests.
#[derive(Default)]
pub(super) struct InMemoryDirectory {
    state: Mutex<DirectoryState>,
}

#[derive(Default)]
struct DirectoryState {
    employees: Vec<Employee>,
    positions: Vec<Position>,
    certificates: Vec<Certificate>,
}

impl InMemoryDirectory {
    pub(super) fn seeded(
        employees: Vec<Employee>,
        positions: Vec<Position>,
        certificates: Vec<Certificate>,
    ) -> Self {
        Self {
            state: Mutex::new(DirectoryState {
                employees,
                positions,
                certificates,
            }),
        }
    }
}

impl DirectoryRepository for InMemoryDirectory {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.state.lock().expect("directory mutex poisoned").employees.clone())
    }

    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        Ok(self.state.lock().expect("directory mutex poisoned").positions.clone())
    }

    fn certificates(&self) -> Result<Vec<Certificate>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .expect("directory mutex poisoned")
            .certificates
            .clone())
    }

    fn employee(&self, id: &str) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .expect("directory mutex poisoned")
            .employees
            .iter()
            .find(|employee| employee.id == id)
            .cloned())
    }

    fn update_employee(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("directory mutex poisoned");
        let slot = state
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
        let mut state = self.state.lock().expect("directory mutex poisoned");
        state.employees = employees;
        state.positions = positions;
        state.certificates = certificates;
        Ok(())
    }
}

pub(super) fn position_ref(id: &str) -> PositionRef {
    PositionRef::Id(id.to_string())
}
