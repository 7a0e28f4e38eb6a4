use std::path::{Path, PathBuf};

use certwatch::error::AppError;
use certwatch::workflows::compliance::domain::{
    Certificate, CertificateStatus, Employee, Position, PositionRef,
};
use certwatch::workflows::compliance::{compute_snapshot, ComplianceSnapshot};
use certwatch::workflows::notifications::{
    dispatch, preview, ExpiringCertificateView, NotificationResult,
};
use certwatch::workflows::roster::RosterImporter;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use crate::cli::NotifyCommand;
use crate::infra::RecordingMailSender;

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Employee roster CSV export
    #[arg(long)]
    pub(crate) employees: PathBuf,
    /// Position roster CSV export
    #[arg(long)]
    pub(crate) positions: PathBuf,
    /// Certificate roster CSV export
    #[arg(long)]
    pub(crate) certificates: PathBuf,
    /// Override the reporting date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct NotifyArgs {
    /// Employee roster CSV export
    #[arg(long)]
    pub(crate) employees: PathBuf,
    /// Certificate roster CSV export
    #[arg(long)]
    pub(crate) certificates: PathBuf,
    /// Forward-looking window in days
    #[arg(long, default_value_t = 60)]
    pub(crate) days: u32,
    /// Override the run date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let DashboardArgs {
        employees,
        positions,
        certificates,
        today,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let employees = RosterImporter::employees_from_path(employees)?;
    let positions = RosterImporter::positions_from_path(positions)?;
    let certificates = RosterImporter::certificates_from_path(certificates)?;

    let snapshot = compute_snapshot(&employees, &positions, &certificates, today);
    render_snapshot(&snapshot, today);
    Ok(())
}

pub(crate) async fn run_notify(command: NotifyCommand) -> Result<(), AppError> {
    match command {
        NotifyCommand::Preview(args) => {
            let (_, certificates, days, today) = load_notify_inputs(&args)?;
            let entries = preview(&certificates, days, today);
            render_preview(&entries, days, today);
            Ok(())
        }
        NotifyCommand::Dispatch(args) => {
            let (employees, certificates, days, today) = load_notify_inputs(&args)?;
            let sender = RecordingMailSender::default();
            let result = dispatch(&certificates, &employees, days, today, &sender).await;
            render_deliveries(&sender);
            render_result(&result);
            Ok(())
        }
    }
}

fn load_notify_inputs(
    args: &NotifyArgs,
) -> Result<(Vec<Employee>, Vec<Certificate>, u32, NaiveDate), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let employees = RosterImporter::employees_from_path(Path::new(&args.employees))?;
    let certificates = RosterImporter::certificates_from_path(Path::new(&args.certificates))?;
    Ok((employees, certificates, args.days, today))
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let (employees, positions, certificates) = sample_directory(today);

    println!("Compliance tracker demo (as of {today})");
    let snapshot = compute_snapshot(&employees, &positions, &certificates, today);
    render_snapshot(&snapshot, today);

    let entries = preview(&certificates, 60, today);
    render_preview(&entries, 60, today);

    let sender = RecordingMailSender::default();
    let result = dispatch(&certificates, &employees, 60, today, &sender).await;
    render_deliveries(&sender);
    render_result(&result);

    Ok(())
}

fn render_snapshot(snapshot: &ComplianceSnapshot, today: NaiveDate) {
    let totals = &snapshot.totals;
    println!();
    println!("Dashboard ({today})");
    println!(
        "  certificates: {} total / {} active / {} expiring soon / {} expired",
        totals.total_certificates,
        totals.active_certificates,
        totals.expiring_soon,
        totals.expired
    );
    println!(
        "  employees: {} active, compliance {}%",
        totals.total_employees, totals.compliance_rate_percent
    );

    if !snapshot.position_breakdown.is_empty() {
        println!("  lowest-compliance positions:");
        for entry in &snapshot.position_breakdown {
            println!(
                "    {:>3}%  {} ({}/{} active)",
                entry.rate_percent, entry.title, entry.active_certificates, entry.total_certificates
            );
        }
    }

    if !snapshot.urgent_actions.is_empty() {
        println!("  urgent actions:");
        for entry in &snapshot.urgent_actions {
            println!(
                "    {} - {} expires {} ({} days)",
                entry.employee_name, entry.certificate_type, entry.expires_on, entry.days_left
            );
        }
    }
}

fn render_preview(entries: &[ExpiringCertificateView], days: u32, today: NaiveDate) {
    println!();
    println!("Expiring within {days} days of {today}: {}", entries.len());
    for entry in entries {
        println!(
            "  {} - {} expires {} ({} days)",
            entry.staff_member, entry.certificate_type, entry.expires_on, entry.days_until_expiry
        );
    }
}

fn render_deliveries(sender: &RecordingMailSender) {
    println!();
    for (recipient, certificates) in sender.deliveries() {
        println!("Reminder to {recipient}:");
        for summary in certificates {
            println!(
                "  {} - {} expires {}",
                summary.staff_member, summary.certificate_type, summary.expires_on
            );
        }
    }
}

fn render_result(result: &NotificationResult) {
    println!(
        "Dispatch complete: {} sent, {} failed, {} without an address (threshold {} days)",
        result.emails_sent, result.emails_failed, result.no_email_count, result.threshold_days
    );
}

fn sample_directory(today: NaiveDate) -> (Vec<Employee>, Vec<Position>, Vec<Certificate>) {
    let position = |id: &str, title: &str, required: &[&str]| Position {
        id: id.to_string(),
        title: title.to_string(),
        department: Some("Operations".to_string()),
        required_certificates: required.iter().map(|name| (*name).to_string()).collect(),
    };
    let employee = |id: &str, name: &str, email: Option<&str>, held: &[&str]| Employee {
        id: id.to_string(),
        name: name.to_string(),
        email: email.map(str::to_string),
        active: None,
        positions: held
            .iter()
            .map(|p| PositionRef::Id((*p).to_string()))
            .collect(),
        primary_position: held.first().map(|p| PositionRef::Id((*p).to_string())),
    };
    let certificate = |id: &str, staff: &str, cert_type: &str, pos: &str, status: CertificateStatus, days: i64| {
        Certificate {
            id: id.to_string(),
            staff_member: staff.to_string(),
            certificate_type: cert_type.to_string(),
            position: Some(PositionRef::Id(pos.to_string())),
            status,
            expiration_date: Some(today + Duration::days(days)),
            attachment: None,
        }
    };

    let positions = vec![
        position("p1", "Rigger", &["Forklift", "First Aid"]),
        position("p2", "Dock Lead", &["Forklift"]),
    ];
    let employees = vec![
        employee("e1", "Dana Flores", Some("dana@example.com"), &["p1", "p2"]),
        employee("e2", "Sam Reyes", None, &["p2"]),
    ];
    let certificates = vec![
        certificate("c1", "Dana Flores", "Forklift", "p1", CertificateStatus::Active, 21),
        certificate("c2", "Dana Flores", "First Aid", "p1", CertificateStatus::Expired, -30),
        certificate("c3", "Sam Reyes", "Forklift", "p2", CertificateStatus::Active, 45),
    ];

    (employees, positions, certificates)
}
