use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use super::domain::{Certificate, Employee, Position, PositionRef};
use super::views::{
    ComplianceSnapshot, ComplianceTotals, PositionComplianceEntry, UrgentActionEntry,
};

/// Fixed forward-looking window for the dashboard's "expiring soon" counters.
/// Independent of the configurable notification threshold by design; the two
/// serve different panels and are never unified.
pub const DASHBOARD_EXPIRY_WINDOW_DAYS: i64 = 30;

const BREAKDOWN_LIMIT: usize = 5;
const URGENT_LIMIT: usize = 5;

/// Computes the dashboard compliance snapshot from a directory snapshot.
/// Pure and deterministic given `today`; empty inputs yield a zero snapshot.
pub fn compute_snapshot(
    employees: &[Employee],
    positions: &[Position],
    certificates: &[Certificate],
    today: NaiveDate,
) -> ComplianceSnapshot {
    let active_employees: Vec<&Employee> = employees
        .iter()
        .filter(|employee| employee.is_active())
        .collect();

    let totals = compute_totals(&active_employees, positions, certificates, today);
    let position_breakdown = position_breakdown(&active_employees, positions, certificates);
    let urgent_actions = urgent_actions(certificates, today);

    ComplianceSnapshot {
        totals,
        position_breakdown,
        urgent_actions,
    }
}

fn compute_totals(
    active_employees: &[&Employee],
    positions: &[Position],
    certificates: &[Certificate],
    today: NaiveDate,
) -> ComplianceTotals {
    let active_certificates = certificates.iter().filter(|cert| cert.is_active()).count();
    let expired = certificates.iter().filter(|cert| cert.is_expired()).count();
    let expiring_soon = certificates
        .iter()
        .filter(|cert| cert.expiring_within(today, DASHBOARD_EXPIRY_WINDOW_DAYS))
        .count();

    ComplianceTotals {
        total_certificates: certificates.len(),
        active_certificates,
        expiring_soon,
        expired,
        total_employees: active_employees.len(),
        compliance_rate_percent: compliance_rate(active_employees, positions, certificates),
    }
}

/// Requirement coverage: the share of (active employee, held position,
/// required certificate type) triples satisfied by at least one active
/// certificate of that type for that employee. One active certificate covers
/// the same type required by every position the employee holds.
fn compliance_rate(
    active_employees: &[&Employee],
    positions: &[Position],
    certificates: &[Certificate],
) -> u8 {
    let positions_by_id: HashMap<&str, &Position> = positions
        .iter()
        .map(|position| (position.id.as_str(), position))
        .collect();

    let active_holdings: HashSet<(&str, &str)> = certificates
        .iter()
        .filter(|cert| cert.is_active())
        .map(|cert| (cert.staff_member.as_str(), cert.certificate_type.as_str()))
        .collect();

    let mut required = 0usize;
    let mut satisfied = 0usize;

    for employee in active_employees {
        for held in &employee.positions {
            let Some(position) = positions_by_id.get(held.id()) else {
                continue;
            };
            for certificate_type in &position.required_certificates {
                required += 1;
                if active_holdings.contains(&(employee.name.as_str(), certificate_type.as_str()))
                {
                    satisfied += 1;
                }
            }
        }
    }

    if required == 0 {
        return 0;
    }

    ((satisfied as f64 / required as f64) * 100.0).round() as u8
}

/// Worst-five positions by certificate-tag ratio, restricted to positions with
/// at least one currently-assigned active employee. A position with assigned
/// staff but no tagged certificates reports 0. Stable ascending sort keeps the
/// original position order on ties.
fn position_breakdown(
    active_employees: &[&Employee],
    positions: &[Position],
    certificates: &[Certificate],
) -> Vec<PositionComplianceEntry> {
    let assigned_ids: HashSet<&str> = active_employees
        .iter()
        .flat_map(|employee| employee.positions.iter().map(PositionRef::id))
        .collect();

    let mut entries: Vec<PositionComplianceEntry> = positions
        .iter()
        .filter(|position| assigned_ids.contains(position.id.as_str()))
        .map(|position| {
            let tagged: Vec<&Certificate> = certificates
                .iter()
                .filter(|cert| {
                    cert.position
                        .as_ref()
                        .is_some_and(|tag| tag.id() == position.id)
                })
                .collect();
            let active = tagged.iter().filter(|cert| cert.is_active()).count();
            let rate_percent = if tagged.is_empty() {
                0
            } else {
                ((active as f64 / tagged.len() as f64) * 100.0).round() as u8
            };

            PositionComplianceEntry {
                position_id: position.id.clone(),
                title: position.title.clone(),
                department: position.department.clone(),
                active_certificates: active,
                total_certificates: tagged.len(),
                rate_percent,
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.rate_percent);
    entries.truncate(BREAKDOWN_LIMIT);
    entries
}

fn urgent_actions(certificates: &[Certificate], today: NaiveDate) -> Vec<UrgentActionEntry> {
    let mut expiring: Vec<&Certificate> = certificates
        .iter()
        .filter(|cert| cert.expiring_within(today, DASHBOARD_EXPIRY_WINDOW_DAYS))
        .collect();

    expiring.sort_by_key(|cert| cert.expiration_date);
    expiring
        .into_iter()
        .take(URGENT_LIMIT)
        .filter_map(|cert| {
            let expires_on = cert.expiration_date?;
            Some(UrgentActionEntry {
                employee_name: cert.staff_member.clone(),
                certificate_type: cert.certificate_type.clone(),
                expires_on,
                days_left: (expires_on - today).num_days(),
            })
        })
        .collect()
}
