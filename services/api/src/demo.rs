use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use registrar::academics::enrollment::{
    BatchReport, CompletedCourses, CourseId, EnrollmentOutcome, EnrollmentService, Grade, Semester,
    SemesterCode, StudentId,
};
use registrar::academics::transcript::TranscriptImporter;
use registrar::config::AppConfig;
use registrar::error::AppError;

use crate::infra::{
    demo_catalog, demo_semesters, InMemoryCourseCatalog, InMemoryRecordStore, InMemoryRuleStore,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Transcript CSV export to derive the completed-course set from
    #[arg(long)]
    pub(crate) transcript_csv: Option<PathBuf>,
    /// Completed course code, repeatable; merged with the transcript
    #[arg(long = "completed")]
    pub(crate) completed: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Student identifier used for the walkthrough records
    #[arg(long, default_value = "demo-student")]
    pub(crate) student: String,
    /// Skip the enrollment portion of the demo
    #[arg(long)]
    pub(crate) skip_enrollment: bool,
}

type DemoService = EnrollmentService<InMemoryCourseCatalog, InMemoryRuleStore, InMemoryRecordStore>;

fn build_demo_service() -> Result<DemoService, AppError> {
    let config = AppConfig::load()?;
    let (courses, rules) = demo_catalog();
    Ok(EnrollmentService::new(
        Arc::new(InMemoryCourseCatalog::seeded(courses)),
        Arc::new(InMemoryRuleStore::seeded(rules)),
        Arc::new(InMemoryRecordStore::default()),
        config.policy.eligibility_config(),
    ))
}

pub(crate) fn run_eligibility_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        transcript_csv,
        completed,
    } = args;

    let service = build_demo_service()?;
    let snapshot = completed_snapshot(transcript_csv, &completed)?;

    println!("Eligibility report (demo catalog)");
    println!("Completed set: {} course(s)", snapshot.len());

    match service.batch_report(&snapshot) {
        Ok(report) => render_batch_report(&report, &demo_semesters()),
        Err(err) => println!("Report unavailable: {}", err),
    }

    Ok(())
}

/// Transcript rows keep their final grades; explicitly listed codes count as
/// completed without a known grade.
fn completed_snapshot(
    transcript_csv: Option<PathBuf>,
    completed: &[String],
) -> Result<CompletedCourses, AppError> {
    let listed = completed
        .iter()
        .map(|code| CourseId(code.trim().to_ascii_uppercase()));

    match transcript_csv {
        Some(path) => {
            let transcript = TranscriptImporter::from_path(path)?;
            if completed.is_empty() {
                Ok(transcript.completed_courses())
            } else {
                Ok(CompletedCourses::from_ids(
                    transcript.completed_course_ids().into_iter().chain(listed),
                ))
            }
        }
        None => Ok(CompletedCourses::from_ids(listed)),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        student,
        skip_enrollment,
    } = args;

    let service = build_demo_service()?;
    let student = StudentId(student);

    println!("Registrar workflow demo");
    println!("Student: {}", student);

    println!("\nRecording first-semester results");
    let results: [(&str, u8, Option<u8>); 2] = [("CS101", 4, Some(5)), ("MATH120", 4, None)];
    for (code, course_grade, exam_grade) in results {
        let course_id = CourseId(code.to_string());
        if let Err(err) = service.begin_course(&student, &course_id) {
            println!("  Could not begin {}: {}", code, err);
            return Ok(());
        }

        let value = Grade::new(course_grade).expect("demo grade is on the 1-5 scale");
        let record = match service.record_course_grade(&student, &course_id, value) {
            Ok(record) => record,
            Err(err) => {
                println!("  Could not grade {}: {}", code, err);
                return Ok(());
            }
        };
        println!(
            "  - {} course grade {} -> {}",
            code,
            course_grade,
            record.status.label()
        );

        if let Some(exam) = exam_grade {
            let value = Grade::new(exam).expect("demo grade is on the 1-5 scale");
            let record = match service.record_exam_grade(&student, &course_id, value) {
                Ok(record) => record,
                Err(err) => {
                    println!("  Could not certify {}: {}", code, err);
                    return Ok(());
                }
            };
            println!(
                "  - {} exam grade {} -> {} (final {}, {} credits)",
                code,
                exam,
                record.status.label(),
                record
                    .final_grade
                    .map(|grade| grade.value().to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record.credits_earned
            );
        }
    }

    println!("\nCatalog eligibility after those grades");
    match service.batch_report_for_student(&student) {
        Ok(report) => render_batch_report(&report, &demo_semesters()),
        Err(err) => {
            println!("Report unavailable: {}", err);
            return Ok(());
        }
    }

    if skip_enrollment {
        return Ok(());
    }

    println!("\nEnrolling in CS201");
    match service.enroll_for_student(&student, &CourseId("CS201".to_string())) {
        Ok(EnrollmentOutcome::Enrolled { remaining_seats }) => {
            println!("  Enrolled ({} seats left)", remaining_seats);
        }
        Ok(EnrollmentOutcome::Rejected { eligibility }) => {
            println!("  Enrollment rejected: {}", eligibility.reason.label());
        }
        Err(err) => println!("  Enrollment unavailable: {}", err),
    }

    Ok(())
}

fn semester_label<'a>(semesters: &'a [Semester], code: &'a SemesterCode) -> &'a str {
    semesters
        .iter()
        .find(|semester| &semester.code == code)
        .map(|semester| semester.name.as_str())
        .unwrap_or(code.0.as_str())
}

fn render_batch_report(report: &BatchReport, semesters: &[Semester]) {
    println!(
        "Counts: {} eligible | {} blocked | {} completed",
        report.counts.total_eligible, report.counts.total_ineligible, report.counts.total_completed
    );

    if report.eligible_courses.is_empty() {
        println!("\nEligible now: none");
    } else {
        println!("\nEligible now");
        for view in &report.eligible_courses {
            println!(
                "- {} {} ({} cr, {})",
                view.course_id,
                view.course_name,
                view.credits,
                semester_label(semesters, &view.semester)
            );
        }
    }

    if report.ineligible_courses.is_empty() {
        println!("\nBlocked: none");
    } else {
        println!("\nBlocked");
        for view in &report.ineligible_courses {
            if view.result.missing_requirements.is_empty() {
                println!(
                    "- {} {}: {}",
                    view.course_id,
                    view.course_name,
                    view.result.reason.label()
                );
            } else {
                let gaps: Vec<_> = view
                    .result
                    .missing_requirements
                    .iter()
                    .map(|missing| missing.summary())
                    .collect();
                println!(
                    "- {} {}: missing {}",
                    view.course_id,
                    view.course_name,
                    gaps.join("; ")
                );
            }
        }
    }

    if report.already_completed_courses.is_empty() {
        println!("\nAlready completed: none");
    } else {
        println!("\nAlready completed");
        for view in &report.already_completed_courses {
            println!(
                "- {} {} ({} cr)",
                view.course_id, view.course_name, view.credits
            );
        }
    }

    if let Some(top) = &report.insights.most_common_missing {
        println!(
            "\nMost common missing prerequisite: {} {} (blocks {} course(s))",
            top.required_course_code, top.required_course_name, top.blocked_courses
        );
    }
}
