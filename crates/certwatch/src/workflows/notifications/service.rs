use std::sync::Arc;

use chrono::NaiveDate;

use super::dispatcher::{self, ExpiringCertificateView, NotificationResult};
use super::mailer::MailSender;
use crate::workflows::compliance::domain::{Certificate, Employee, Position};
use crate::workflows::compliance::repository::{DirectoryRepository, RepositoryError};
use crate::workflows::compliance::{
    compute_snapshot, normalize_employee_positions, ComplianceSnapshot,
};

/// Service composing the directory repository with the aggregation engine and
/// the injected mail transport.
pub struct ComplianceService<R, M> {
    repository: Arc<R>,
    mailer: Arc<M>,
}

impl<R, M> ComplianceService<R, M>
where
    R: DirectoryRepository + 'static,
    M: MailSender + 'static,
{
    pub fn new(repository: Arc<R>, mailer: Arc<M>) -> Self {
        Self { repository, mailer }
    }

    /// Recompute the dashboard snapshot from current persisted state.
    pub fn dashboard(&self, today: NaiveDate) -> Result<ComplianceSnapshot, ComplianceServiceError> {
        let employees = self.repository.employees()?;
        let positions = self.repository.positions()?;
        let certificates = self.repository.certificates()?;
        Ok(compute_snapshot(&employees, &positions, &certificates, today))
    }

    /// Dry-run listing of the certificates a dispatch would cover.
    pub fn preview(
        &self,
        threshold_days: u32,
        today: NaiveDate,
    ) -> Result<Vec<ExpiringCertificateView>, ComplianceServiceError> {
        validate_threshold(threshold_days)?;
        let certificates = self.repository.certificates()?;
        Ok(dispatcher::preview(&certificates, threshold_days, today))
    }

    /// Manually triggered dispatch with a caller-supplied threshold.
    pub async fn dispatch(
        &self,
        threshold_days: u32,
        today: NaiveDate,
    ) -> Result<NotificationResult, ComplianceServiceError> {
        validate_threshold(threshold_days)?;
        let certificates = self.repository.certificates()?;
        let employees = self.repository.employees()?;
        Ok(dispatcher::dispatch(
            &certificates,
            &employees,
            threshold_days,
            today,
            self.mailer.as_ref(),
        )
        .await)
    }

    /// Scheduled dispatch path with the fixed threshold.
    pub async fn run_scheduled(
        &self,
        today: NaiveDate,
    ) -> Result<NotificationResult, ComplianceServiceError> {
        self.dispatch(dispatcher::SCHEDULED_THRESHOLD_DAYS, today).await
    }

    /// Repair one employee's position references and persist the result.
    pub fn normalize_employee(
        &self,
        employee_id: &str,
    ) -> Result<Employee, ComplianceServiceError> {
        let employee = self
            .repository
            .employee(employee_id)?
            .ok_or(RepositoryError::NotFound)?;
        let positions = self.repository.positions()?;

        let repaired = normalize_employee_positions(&employee, &positions);
        self.repository.update_employee(repaired.clone())?;
        Ok(repaired)
    }

    /// Replace the whole directory snapshot (the persistence collaborator's seam).
    pub fn replace_directory(
        &self,
        employees: Vec<Employee>,
        positions: Vec<Position>,
        certificates: Vec<Certificate>,
    ) -> Result<(), ComplianceServiceError> {
        self.repository.replace(employees, positions, certificates)?;
        Ok(())
    }
}

fn validate_threshold(threshold_days: u32) -> Result<(), ComplianceServiceError> {
    if threshold_days == 0 {
        return Err(ComplianceServiceError::InvalidThreshold);
    }
    Ok(())
}

/// Error raised by the compliance service.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("threshold must be a positive number of days")]
    InvalidThreshold,
}
