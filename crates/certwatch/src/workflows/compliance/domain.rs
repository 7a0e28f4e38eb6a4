use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reference to a position record. Persisted data carries either the bare
/// identifier or an embedded copy of the referenced document, so both forms
/// deserialize transparently. Identifier comparisons must go through
/// [`PositionRef::id`], never the raw field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionRef {
    Id(String),
    Embedded(PositionStub),
}

/// The subset of position fields an embedded reference may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStub {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PositionRef {
    pub fn id(&self) -> &str {
        match self {
            PositionRef::Id(id) => id,
            PositionRef::Embedded(stub) => &stub.id,
        }
    }
}

/// Certificate lifecycle status. Source data is free-form, so anything other
/// than the two statuses the engine reasons about is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CertificateStatus {
    Active,
    Expired,
    Other(String),
}

impl From<String> for CertificateStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ACTIVE" => Self::Active,
            "EXPIRED" => Self::Expired,
            _ => Self::Other(value),
        }
    }
}

impl From<CertificateStatus> for String {
    fn from(value: CertificateStatus) -> Self {
        match value {
            CertificateStatus::Active => "ACTIVE".to_string(),
            CertificateStatus::Expired => "EXPIRED".to_string(),
            CertificateStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Absent counts as active; only an explicit `false` deactivates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default)]
    pub positions: Vec<PositionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_position: Option<PositionRef>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }

    /// The deliverable e-mail address, if the employee has a non-blank one.
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Certificate-type names every holder of this position must keep active.
    #[serde(default)]
    pub required_certificates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: String,
    /// Denormalized owner reference: certificates are keyed by employee name,
    /// not identifier. Duplicate names collide; kept for compatibility with
    /// the persisted data.
    pub staff_member: String,
    pub certificate_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionRef>,
    pub status: CertificateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

impl Certificate {
    pub fn is_active(&self) -> bool {
        self.status == CertificateStatus::Active
    }

    pub fn is_expired(&self) -> bool {
        self.status == CertificateStatus::Expired
    }

    /// True when the certificate is active and expires strictly after `today`
    /// but within the next `window_days` days. Records without an expiration
    /// date never match a date predicate.
    pub fn expiring_within(&self, today: NaiveDate, window_days: i64) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.expiration_date {
            Some(expiry) => expiry > today && expiry <= today + Duration::days(window_days),
            None => false,
        }
    }

    /// Whole days until expiry, negative once past due.
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.expiration_date.map(|expiry| (expiry - today).num_days())
    }
}
