use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use certwatch::workflows::compliance::domain::{Certificate, Employee, Position};
use certwatch::workflows::compliance::{compute_snapshot, DirectoryRepository, RepositoryError};
use certwatch::workflows::notifications::{
    CertificateSummary, ComplianceService, MailError, MailSender,
};
use certwatch::workflows::roster::RosterImporter;

const EMPLOYEES_CSV: &str = "\
Employee ID,Name,Email,Active,Positions,Primary Position
e1,Dana Flores,dana@example.com,true,p1;p2,p1
e2,Sam Reyes,,true,p2,p2
e3,Lee Moore,lee@example.com,false,p1,p1
";

const POSITIONS_CSV: &str = "\
Position ID,Title,Department,Required Certificates
p1,Rigger,Operations,Forklift;First Aid
p2,Dock Lead,Operations,Forklift
";

const CERTIFICATES_CSV: &str = "\
Certificate ID,Staff Member,Certificate Type,Position,Status,Expiration Date
c1,Dana Flores,Forklift,p1,ACTIVE,2024-02-15
c2,Dana Flores,First Aid,p1,EXPIRED,2023-11-01
c3,Sam Reyes,Forklift,p2,ACTIVE,2024-01-20
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

fn load_roster() -> (Vec<Employee>, Vec<Position>, Vec<Certificate>) {
    let employees = RosterImporter::employees_from_reader(Cursor::new(EMPLOYEES_CSV))
        .expect("employees parse");
    let positions = RosterImporter::positions_from_reader(Cursor::new(POSITIONS_CSV))
        .expect("positions parse");
    let certificates = RosterImporter::certificates_from_reader(Cursor::new(CERTIFICATES_CSV))
        .expect("certificates parse");
    (employees, positions, certificates)
}

#[test]
fn roster_import_feeds_the_dashboard_snapshot() {
    let (employees, positions, certificates) = load_roster();
    let snapshot = compute_snapshot(&employees, &positions, &certificates, today());

    assert_eq!(snapshot.totals.total_certificates, 3);
    assert_eq!(snapshot.totals.active_certificates, 2);
    assert_eq!(snapshot.totals.expired, 1);
    assert_eq!(snapshot.totals.expiring_soon, 1);
    // Lee Moore is inactive and excluded from headcount and requirements.
    assert_eq!(snapshot.totals.total_employees, 2);
    // Dana satisfies Forklift for both held positions but lacks First Aid;
    // Sam satisfies Forklift: 3 of 4 requirements covered.
    assert_eq!(snapshot.totals.compliance_rate_percent, 75);

    assert_eq!(snapshot.position_breakdown.len(), 2);
    // p1 carries one active of two tagged certificates, p2 is fully active.
    assert_eq!(snapshot.position_breakdown[0].position_id, "p1");
    assert_eq!(snapshot.position_breakdown[0].rate_percent, 50);
    assert_eq!(snapshot.position_breakdown[1].rate_percent, 100);

    assert_eq!(snapshot.urgent_actions.len(), 1);
    assert_eq!(snapshot.urgent_actions[0].certificate_type, "Forklift");
    assert_eq!(snapshot.urgent_actions[0].days_left, 19);
}

struct FixedDirectory {
    employees: Vec<Employee>,
    positions: Vec<Position>,
    certificates: Vec<Certificate>,
}

impl DirectoryRepository for FixedDirectory {
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.employees.clone())
    }

    fn positions(&self) -> Result<Vec<Position>, RepositoryError> {
        Ok(self.positions.clone())
    }

    fn certificates(&self) -> Result<Vec<Certificate>, RepositoryError> {
        Ok(self.certificates.clone())
    }

    fn employee(&self, id: &str) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.employees.iter().find(|e| e.id == id).cloned())
    }

    fn update_employee(&self, _employee: Employee) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn replace(
        &self,
        _employees: Vec<Employee>,
        _positions: Vec<Position>,
        _certificates: Vec<Certificate>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read-only fixture".to_string()))
    }
}

#[derive(Default)]
struct Outbox {
    deliveries: Mutex<Vec<(String, Vec<CertificateSummary>)>>,
}

#[async_trait]
impl MailSender for Outbox {
    async fn send(
        &self,
        recipient: &str,
        certificates: &[CertificateSummary],
    ) -> Result<(), MailError> {
        self.deliveries
            .lock()
            .expect("outbox mutex poisoned")
            .push((recipient.to_string(), certificates.to_vec()));
        Ok(())
    }
}

#[tokio::test]
async fn service_dispatch_groups_by_recipient_and_counts_missing_emails() {
    let (employees, positions, certificates) = load_roster();
    let directory = Arc::new(FixedDirectory {
        employees,
        positions,
        certificates,
    });
    let outbox = Arc::new(Outbox::default());
    let service = ComplianceService::new(directory, outbox.clone());

    let preview = service.preview(60, today()).expect("preview runs");
    assert_eq!(preview.len(), 2);
    assert_eq!(preview[0].id, "c3");
    assert_eq!(preview[1].days_until_expiry, 45);

    let result = service.dispatch(60, today()).await.expect("dispatch runs");
    assert_eq!(result.emails_sent, 1);
    assert_eq!(result.emails_failed, 0);
    // Sam Reyes has a qualifying certificate but no address on file.
    assert_eq!(result.no_email_count, 1);

    let deliveries = outbox.deliveries.lock().expect("outbox mutex poisoned");
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "dana@example.com");
    assert_eq!(deliveries[0].1.len(), 1);
}
