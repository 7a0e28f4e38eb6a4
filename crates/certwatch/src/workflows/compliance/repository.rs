use super::domain::{Certificate, Employee, Position};

/// Snapshot access to the persisted directory of employees, positions, and
/// certificates. The engine only ever reads whole collections; CRUD beyond
/// the repair write-back lives with the persistence collaborator.
pub trait DirectoryRepository: Send + Sync {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError>;
    fn positions(&self) -> Result<Vec<Position>, RepositoryError>;
    fn certificates(&self) -> Result<Vec<Certificate>, RepositoryError>;

    fn employee(&self, id: &str) -> Result<Option<Employee>, RepositoryError>;
    fn update_employee(&self, employee: Employee) -> Result<(), RepositoryError>;

    /// Replace the whole directory snapshot in one step.
    fn replace(
        &self,
        employees: Vec<Employee>,
        positions: Vec<Position>,
        certificates: Vec<Certificate>,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
