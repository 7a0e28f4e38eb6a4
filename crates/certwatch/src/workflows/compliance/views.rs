use chrono::NaiveDate;
use serde::Serialize;

/// Global certificate counters for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceTotals {
    pub total_certificates: usize,
    pub active_certificates: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub total_employees: usize,
    pub compliance_rate_percent: u8,
}

/// One row of the worst-compliance-first position ranking. The sub-rate is a
/// certificate-tag ratio, deliberately looser than the overall requirement
/// coverage rate; the two feed different dashboard panels.
#[derive(Debug, Clone, Serialize)]
pub struct PositionComplianceEntry {
    pub position_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub active_certificates: usize,
    pub total_certificates: usize,
    pub rate_percent: u8,
}

/// A soon-to-expire active certificate surfaced for follow-up.
#[derive(Debug, Clone, Serialize)]
pub struct UrgentActionEntry {
    pub employee_name: String,
    pub certificate_type: String,
    pub expires_on: NaiveDate,
    pub days_left: i64,
}

/// Derived dashboard model, recomputed on every request and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceSnapshot {
    pub totals: ComplianceTotals,
    pub position_breakdown: Vec<PositionComplianceEntry>,
    pub urgent_actions: Vec<UrgentActionEntry>,
}
