//! CSV import of directory exports (employees, positions, certificates), so
//! reports can be computed from files without a running persistence layer.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::compliance::domain::{Certificate, Employee, Position};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn employees_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<Employee>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::employees_from_reader(file)
    }

    pub fn employees_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<Employee>, RosterImportError> {
        Ok(parser::parse_employees(reader)?)
    }

    pub fn positions_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<Position>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::positions_from_reader(file)
    }

    pub fn positions_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<Position>, RosterImportError> {
        Ok(parser::parse_positions(reader)?)
    }

    pub fn certificates_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<Certificate>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::certificates_from_reader(file)
    }

    pub fn certificates_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<Certificate>, RosterImportError> {
        Ok(parser::parse_certificates(reader)?)
    }
}
