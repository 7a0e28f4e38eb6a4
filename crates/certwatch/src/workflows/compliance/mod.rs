//! Certificate compliance aggregation over directory snapshots.
//!
//! The aggregator is a pure function from (employees, positions, certificates, today)
//! to a dashboard-ready `ComplianceSnapshot`; nothing here touches persistence or the
//! mail transport.

pub mod domain;
mod repair;
pub mod repository;
mod snapshot;
pub mod views;

pub use repair::normalize_employee_positions;
pub use repository::{DirectoryRepository, RepositoryError};
pub use snapshot::{compute_snapshot, DASHBOARD_EXPIRY_WINDOW_DAYS};
pub use views::{
    ComplianceSnapshot, ComplianceTotals, PositionComplianceEntry, UrgentActionEntry,
};
