use std::collections::HashSet;
use std::sync::Arc;

use super::common::*;
use crate::academics::enrollment::domain::SatisfactionMode;
use crate::academics::enrollment::service::{EnrollmentService, EnrollmentServiceError};
use crate::academics::enrollment::StoreError;

#[test]
fn partitions_are_disjoint_and_cover_the_active_catalog() {
    let (service, _, _, _) = build_service();

    let report = service
        .batch_report(&completed(&["CS101"]))
        .expect("report builds");

    let eligible: HashSet<_> = report
        .eligible_courses
        .iter()
        .map(|view| view.course_id.0.clone())
        .collect();
    let ineligible: HashSet<_> = report
        .ineligible_courses
        .iter()
        .map(|view| view.course_id.0.clone())
        .collect();
    let done: HashSet<_> = report
        .already_completed_courses
        .iter()
        .map(|view| view.course_id.0.clone())
        .collect();

    assert!(eligible.is_disjoint(&ineligible));
    assert!(eligible.is_disjoint(&done));
    assert!(ineligible.is_disjoint(&done));

    let union: HashSet<_> = eligible
        .union(&ineligible)
        .chain(done.iter())
        .cloned()
        .collect();
    let active: HashSet<_> = ["CS101", "MATH120", "CS201", "CS301", "CAP400"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(union, active);

    assert_eq!(report.counts.total_eligible, report.eligible_courses.len());
    assert_eq!(report.counts.total_ineligible, report.ineligible_courses.len());
    assert_eq!(
        report.counts.total_completed,
        report.already_completed_courses.len()
    );
}

#[test]
fn partitions_preserve_catalog_order() {
    let (service, _, _, _) = build_service();

    let report = service
        .batch_report(&completed(&["CS101"]))
        .expect("report builds");

    let eligible: Vec<_> = report
        .eligible_courses
        .iter()
        .map(|view| view.course_id.0.as_str())
        .collect();
    let ineligible: Vec<_> = report
        .ineligible_courses
        .iter()
        .map(|view| view.course_id.0.as_str())
        .collect();

    assert_eq!(eligible, vec!["MATH120", "CS201"]);
    assert_eq!(ineligible, vec!["CS301", "CAP400"]);
}

#[test]
fn completed_courses_are_excluded_from_evaluation() {
    let (service, _, _, _) = build_service();

    // CS301's own prerequisites are unmet, but completion wins the partition
    let report = service
        .batch_report(&completed(&["CS301"]))
        .expect("report builds");

    let done: Vec<_> = report
        .already_completed_courses
        .iter()
        .map(|view| view.course_id.0.as_str())
        .collect();
    assert_eq!(done, vec!["CS301"]);
    assert!(report
        .ineligible_courses
        .iter()
        .all(|view| view.course_id.0 != "CS301"));
}

#[test]
fn insights_surface_the_most_common_missing_prerequisite() {
    let catalog = Arc::new(MemoryCatalog::seeded(standard_catalog()));
    let rules = Arc::new(MemoryRuleStore::seeded(vec![
        rule(
            "CS201",
            "CS101",
            "Intro to Programming",
            SatisfactionMode::CourseApproved,
            3,
        ),
        rule(
            "CS301",
            "CS101",
            "Intro to Programming",
            SatisfactionMode::CourseApproved,
            3,
        ),
        rule(
            "CS301",
            "MATH120",
            "Discrete Mathematics",
            SatisfactionMode::ExamApproved,
            3,
        ),
    ]));
    let records = Arc::new(MemoryRecordStore::default());
    let service = EnrollmentService::new(catalog, rules, records, eligibility_config());

    let report = service.batch_report(&completed(&[])).expect("report builds");

    let top = report
        .insights
        .most_common_missing
        .expect("insights present");
    assert_eq!(top.required_course_code, "CS101");
    assert_eq!(top.blocked_courses, 2);
}

#[test]
fn insights_break_frequency_ties_toward_walk_order() {
    let (service, _, _, _) = build_service();

    // every blocker appears exactly once, so the first one seen wins
    let report = service.batch_report(&completed(&[])).expect("report builds");
    let top = report
        .insights
        .most_common_missing
        .expect("insights present");
    assert_eq!(top.required_course_code, "CS101");
    assert_eq!(top.blocked_courses, 1);
}

#[test]
fn report_with_nothing_missing_has_no_insights() {
    let (service, _, _, _) = build_service();

    let report = service
        .batch_report(&completed(&["CS101", "MATH120", "CS201", "CS301"]))
        .expect("report builds");
    assert!(report.insights.most_common_missing.is_none());
}

#[test]
fn batch_fails_atomically_when_the_rule_store_is_unreachable() {
    let catalog = Arc::new(MemoryCatalog::seeded(standard_catalog()));
    let rules = Arc::new(UnavailableRuleStore);
    let records = Arc::new(MemoryRecordStore::default());
    let service = EnrollmentService::new(catalog, rules, records, eligibility_config());

    match service.batch_report(&completed(&[])) {
        Err(EnrollmentServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected unavailable store error, got {other:?}"),
    }
}

#[test]
fn batch_fails_atomically_when_the_catalog_is_unreachable() {
    let catalog = Arc::new(UnavailableCatalog);
    let rules = Arc::new(MemoryRuleStore::seeded(standard_rules()));
    let records = Arc::new(MemoryRecordStore::default());
    let service = EnrollmentService::new(catalog, rules, records, eligibility_config());

    match service.batch_report(&completed(&[])) {
        Err(EnrollmentServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected unavailable store error, got {other:?}"),
    }
}
