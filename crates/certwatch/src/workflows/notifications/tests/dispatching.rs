use super::common::{certificate, employee, today, RecordingMailSender};
use crate::workflows::notifications::{dispatch, preview};

#[test]
fn preview_lists_qualifying_certificates_soonest_first() {
    let certificates = vec![
        certificate("c1", "Dana Flores", "Forklift", "2024-02-15"),
        certificate("c2", "Sam Reyes", "First Aid", "2024-01-10"),
        certificate("c3", "Sam Reyes", "Welding", "2024-06-01"),
    ];

    let entries = preview(&certificates, 60, today());
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "c2");
    assert_eq!(entries[1].id, "c1");
    assert_eq!(entries[1].days_until_expiry, 45);
}

#[test]
fn preview_excludes_today_and_includes_the_threshold_day() {
    let certificates = vec![
        certificate("boundary-low", "Dana Flores", "Forklift", "2024-01-01"),
        certificate("boundary-high", "Dana Flores", "First Aid", "2024-03-01"),
    ];

    // 2024-03-01 is exactly 60 days after 2024-01-01.
    let entries = preview(&certificates, 60, today());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "boundary-high");
    assert_eq!(entries[0].days_until_expiry, 60);
}

#[tokio::test]
async fn dispatch_sends_one_reminder_for_a_resolvable_recipient() {
    let employees = vec![employee("Dana Flores", Some("dana@example.com"))];
    let certificates = vec![certificate("c1", "Dana Flores", "Forklift", "2024-02-15")];
    let sender = RecordingMailSender::default();

    let result = dispatch(&certificates, &employees, 60, today(), &sender).await;

    assert_eq!(result.emails_sent, 1);
    assert_eq!(result.emails_failed, 0);
    assert_eq!(result.no_email_count, 0);
    assert_eq!(result.threshold_days, 60);
    assert_eq!(result.ran_on, today());

    let deliveries = sender.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "dana@example.com");
    assert_eq!(deliveries[0].1[0].certificate_type, "Forklift");
}

#[tokio::test]
async fn dispatch_counts_certificates_without_a_deliverable_address() {
    let employees = vec![employee("Dana Flores", None)];
    let certificates = vec![certificate("c1", "Dana Flores", "Forklift", "2024-02-15")];
    let sender = RecordingMailSender::default();

    let result = dispatch(&certificates, &employees, 60, today(), &sender).await;

    assert_eq!(result.emails_sent, 0);
    assert_eq!(result.emails_failed, 0);
    assert_eq!(result.no_email_count, 1);
    assert!(sender.deliveries().is_empty());
}

#[tokio::test]
async fn dispatch_batches_multiple_certificates_into_one_send() {
    let employees = vec![employee("Dana Flores", Some("dana@example.com"))];
    let certificates = vec![
        certificate("c1", "Dana Flores", "Forklift", "2024-02-15"),
        certificate("c2", "Dana Flores", "First Aid", "2024-02-20"),
    ];
    let sender = RecordingMailSender::default();

    let result = dispatch(&certificates, &employees, 60, today(), &sender).await;

    assert_eq!(result.emails_sent, 1);
    let deliveries = sender.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].1.len(), 2);
}

#[tokio::test]
async fn one_recipients_failure_does_not_block_the_rest() {
    let employees = vec![
        employee("Dana Flores", Some("dana@example.com")),
        employee("Sam Reyes", Some("sam@example.com")),
    ];
    let certificates = vec![
        certificate("c1", "Dana Flores", "Forklift", "2024-02-15"),
        certificate("c2", "Sam Reyes", "First Aid", "2024-02-20"),
    ];
    let sender = RecordingMailSender::rejecting(&["dana@example.com"]);

    let result = dispatch(&certificates, &employees, 60, today(), &sender).await;

    assert_eq!(result.emails_sent, 1);
    assert_eq!(result.emails_failed, 1);
    assert_eq!(result.no_email_count, 0);

    let deliveries = sender.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "sam@example.com");
}

#[tokio::test]
async fn certificates_outside_the_window_are_ignored() {
    let employees = vec![employee("Dana Flores", Some("dana@example.com"))];
    let certificates = vec![
        certificate("past", "Dana Flores", "Forklift", "2023-12-01"),
        certificate("far", "Dana Flores", "First Aid", "2024-06-01"),
    ];
    let sender = RecordingMailSender::default();

    let result = dispatch(&certificates, &employees, 60, today(), &sender).await;

    assert_eq!(result.emails_sent, 0);
    assert_eq!(result.no_email_count, 0);
    assert!(sender.deliveries().is_empty());
}

#[tokio::test]
async fn every_selected_certificate_lands_in_exactly_one_counter() {
    let employees = vec![
        employee("Dana Flores", Some("dana@example.com")),
        employee("Sam Reyes", None),
    ];
    let mut dateless = certificate("pending", "Dana Flores", "Forklift", "2024-02-15");
    dateless.expiration_date = None;
    let certificates = vec![
        dateless,
        certificate("c1", "Dana Flores", "First Aid", "2024-02-15"),
        certificate("c2", "Sam Reyes", "Welding", "2024-02-20"),
    ];
    let sender = RecordingMailSender::default();

    let result = dispatch(&certificates, &employees, 60, today(), &sender).await;

    // The dateless record never qualifies; the two that do are both counted.
    assert_eq!(result.emails_sent, 1);
    assert_eq!(result.emails_failed, 0);
    assert_eq!(result.no_email_count, 1);

    let deliveries = sender.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].1.len(), 1);
    assert_eq!(deliveries[0].1[0].certificate_type, "First Aid");
}

#[tokio::test]
async fn duplicate_employee_names_resolve_to_the_first_record() {
    let employees = vec![
        employee("Dana Flores", Some("first@example.com")),
        employee("Dana Flores", Some("second@example.com")),
    ];
    let certificates = vec![certificate("c1", "Dana Flores", "Forklift", "2024-02-15")];
    let sender = RecordingMailSender::default();

    let result = dispatch(&certificates, &employees, 60, today(), &sender).await;

    assert_eq!(result.emails_sent, 1);
    assert_eq!(sender.deliveries()[0].0, "first@example.com");
}
