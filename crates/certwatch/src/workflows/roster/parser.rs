use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::compliance::domain::{
    Certificate, CertificateStatus, Employee, Position, PositionRef,
};

pub(crate) fn parse_employees<R: Read>(reader: R) -> Result<Vec<Employee>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut employees = Vec::new();

    for record in csv_reader.deserialize::<EmployeeRow>() {
        let row = record?;
        employees.push(Employee {
            id: row.id,
            name: row.name,
            email: row.email,
            active: row.active.as_deref().map(parse_flag),
            positions: split_list(row.positions.as_deref())
                .into_iter()
                .map(PositionRef::Id)
                .collect(),
            primary_position: row.primary_position.map(PositionRef::Id),
        });
    }

    Ok(employees)
}

pub(crate) fn parse_positions<R: Read>(reader: R) -> Result<Vec<Position>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut positions = Vec::new();

    for record in csv_reader.deserialize::<PositionRow>() {
        let row = record?;
        positions.push(Position {
            id: row.id,
            title: row.title,
            department: row.department,
            required_certificates: split_list(row.required_certificates.as_deref()),
        });
    }

    Ok(positions)
}

pub(crate) fn parse_certificates<R: Read>(reader: R) -> Result<Vec<Certificate>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut certificates = Vec::new();

    for record in csv_reader.deserialize::<CertificateRow>() {
        let row = record?;
        let expiration_date = row.expiration_date.as_deref().and_then(parse_date);
        certificates.push(Certificate {
            id: row.id,
            staff_member: row.staff_member,
            certificate_type: row.certificate_type,
            position: row.position.map(PositionRef::Id),
            status: CertificateStatus::from(row.status),
            expiration_date,
            attachment: None,
        });
    }

    Ok(certificates)
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    #[serde(rename = "Employee ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "Active", default, deserialize_with = "empty_string_as_none")]
    active: Option<String>,
    #[serde(rename = "Positions", default, deserialize_with = "empty_string_as_none")]
    positions: Option<String>,
    #[serde(
        rename = "Primary Position",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    primary_position: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    #[serde(rename = "Position ID")]
    id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Department", default, deserialize_with = "empty_string_as_none")]
    department: Option<String>,
    #[serde(
        rename = "Required Certificates",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    required_certificates: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CertificateRow {
    #[serde(rename = "Certificate ID")]
    id: String,
    #[serde(rename = "Staff Member")]
    staff_member: String,
    #[serde(rename = "Certificate Type")]
    certificate_type: String,
    #[serde(rename = "Position", default, deserialize_with = "empty_string_as_none")]
    position: Option<String>,
    #[serde(rename = "Status")]
    status: String,
    #[serde(
        rename = "Expiration Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    expiration_date: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Semicolon-separated list cell, blank entries dropped.
fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "false" | "no" | "0" | "inactive"
    )
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
