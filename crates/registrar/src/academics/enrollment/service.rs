use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::domain::{CompletionRecord, Course, CourseId, Grade, PrerequisiteRule, StudentId};
use super::eligibility::{CompletedCourses, EligibilityConfig, EligibilityEngine, EligibilityResult};
use super::records::TransitionError;
use super::report::{BatchReport, CompletedCourseView, CourseEligibilityView};
use super::repository::{CompletionRecordStore, CourseCatalog, PrerequisiteRuleStore, StoreError};
use super::rulebook::{RuleGuard, RuleViolation};

/// Service composing the catalog, rule store, record store, and eligibility
/// engine behind one facade for the HTTP layer and CLI.
pub struct EnrollmentService<C, R, S> {
    catalog: Arc<C>,
    rules: Arc<R>,
    records: Arc<S>,
    guard: RuleGuard,
    engine: EligibilityEngine,
}

impl<C, R, S> EnrollmentService<C, R, S>
where
    C: CourseCatalog + 'static,
    R: PrerequisiteRuleStore + 'static,
    S: CompletionRecordStore + 'static,
{
    pub fn new(
        catalog: Arc<C>,
        rules: Arc<R>,
        records: Arc<S>,
        config: EligibilityConfig,
    ) -> Self {
        Self {
            catalog,
            rules,
            records,
            guard: RuleGuard,
            engine: EligibilityEngine::new(config),
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Single-course verification. An unknown target course is a client
    /// error, never silently folded into "ineligible".
    pub fn check(
        &self,
        course_id: &CourseId,
        completed: &CompletedCourses,
    ) -> Result<EligibilityResult, EnrollmentServiceError> {
        let course = self.require_course(course_id)?;
        let rules = self.rules.active_rules_for(course_id)?;
        Ok(self.engine.evaluate(&course, &rules, completed))
    }

    /// Verification against the student's stored records instead of an
    /// explicit candidate set.
    pub fn check_for_student(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<EligibilityResult, EnrollmentServiceError> {
        let records = self.records.records_for(student)?;
        self.check(course_id, &CompletedCourses::from_records(&records))
    }

    /// Evaluate the whole active catalog against one completed-course
    /// snapshot. Any store failure aborts the report; no partial results.
    pub fn batch_report(
        &self,
        completed: &CompletedCourses,
    ) -> Result<BatchReport, EnrollmentServiceError> {
        let mut eligible = Vec::new();
        let mut ineligible = Vec::new();
        let mut already_completed = Vec::new();

        for course in self.catalog.list_active()? {
            if completed.contains(&course.id) {
                already_completed.push(CompletedCourseView::new(&course));
                continue;
            }

            let rules = self.rules.active_rules_for(&course.id)?;
            let result = self.engine.evaluate(&course, &rules, completed);
            let view = CourseEligibilityView::new(&course, result);
            if view.result.eligible {
                eligible.push(view);
            } else {
                ineligible.push(view);
            }
        }

        Ok(BatchReport::assemble(eligible, ineligible, already_completed))
    }

    pub fn batch_report_for_student(
        &self,
        student: &StudentId,
    ) -> Result<BatchReport, EnrollmentServiceError> {
        let records = self.records.records_for(student)?;
        self.batch_report(&CompletedCourses::from_records(&records))
    }

    /// Validate and persist a prerequisite edge.
    pub fn define_rule(&self, rule: PrerequisiteRule) -> Result<(), EnrollmentServiceError> {
        self.guard.validate(&rule)?;
        self.rules.insert(rule)?;
        Ok(())
    }

    /// Pending -> InProgress, creating the record on first contact.
    pub fn begin_course(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<CompletionRecord, EnrollmentServiceError> {
        self.require_course(course_id)?;
        let mut record = self
            .records
            .find(student, course_id)?
            .unwrap_or_else(|| CompletionRecord::new(student.clone(), course_id.clone()));
        record.begin()?;
        self.records.upsert(record.clone())?;
        Ok(record)
    }

    /// Record a coursework grade, creating the record if the student never
    /// explicitly entered the course.
    pub fn record_course_grade(
        &self,
        student: &StudentId,
        course_id: &CourseId,
        grade: Grade,
    ) -> Result<CompletionRecord, EnrollmentServiceError> {
        let course = self.require_course(course_id)?;
        let mut record = self
            .records
            .find(student, course_id)?
            .unwrap_or_else(|| CompletionRecord::new(student.clone(), course_id.clone()));
        record.record_course_grade(grade, &course, self.engine.config().passing_grade, Utc::now())?;
        self.records.upsert(record.clone())?;
        Ok(record)
    }

    /// Record an exam grade for a record awaiting certification.
    pub fn record_exam_grade(
        &self,
        student: &StudentId,
        course_id: &CourseId,
        grade: Grade,
    ) -> Result<CompletionRecord, EnrollmentServiceError> {
        let course = self.require_course(course_id)?;
        let mut record =
            self.records
                .find(student, course_id)?
                .ok_or_else(|| EnrollmentServiceError::MissingRecord {
                    student: student.clone(),
                    course: course_id.clone(),
                })?;
        record.record_exam_grade(grade, &course, self.engine.config().passing_grade, Utc::now())?;
        self.records.upsert(record.clone())?;
        Ok(record)
    }

    /// Re-verify eligibility, then claim a seat. The seat claim is the one
    /// real mutation here and is serialized by the catalog store; a lost
    /// race surfaces as `SeatsExhausted`.
    pub fn enroll(
        &self,
        course_id: &CourseId,
        completed: &CompletedCourses,
    ) -> Result<EnrollmentOutcome, EnrollmentServiceError> {
        let result = self.check(course_id, completed)?;
        if !result.eligible {
            return Ok(EnrollmentOutcome::Rejected {
                eligibility: result,
            });
        }

        let course = self.catalog.reserve_seat(course_id)?;
        Ok(EnrollmentOutcome::Enrolled {
            remaining_seats: course.available_seats,
        })
    }

    /// Enrollment against the student's stored records.
    pub fn enroll_for_student(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<EnrollmentOutcome, EnrollmentServiceError> {
        let records = self.records.records_for(student)?;
        self.enroll(course_id, &CompletedCourses::from_records(&records))
    }

    /// Return a previously claimed seat.
    pub fn drop_course(&self, course_id: &CourseId) -> Result<u32, EnrollmentServiceError> {
        let course = self.catalog.release_seat(course_id)?;
        Ok(course.available_seats)
    }

    fn require_course(&self, course_id: &CourseId) -> Result<Course, EnrollmentServiceError> {
        self.catalog
            .get(course_id)?
            .ok_or_else(|| EnrollmentServiceError::UnknownCourse(course_id.clone()))
    }
}

/// Outcome of an enrollment attempt. Rejection is a normal value carrying
/// the full eligibility verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum EnrollmentOutcome {
    #[serde(rename_all = "camelCase")]
    Enrolled { remaining_seats: u32 },
    #[serde(rename_all = "camelCase")]
    Rejected { eligibility: EligibilityResult },
}

/// Error raised by the enrollment service.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentServiceError {
    #[error("course {0} is not in the catalog")]
    UnknownCourse(CourseId),
    #[error("no completion record for student {student} in course {course}")]
    MissingRecord { student: StudentId, course: CourseId },
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error(transparent)]
    Record(#[from] TransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
