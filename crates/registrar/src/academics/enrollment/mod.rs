//! Course catalog, prerequisite rules, completion tracking, and the
//! eligibility engine that decides which courses a student may take next.
//!
//! Eligibility is a pure function of catalog state, the rule graph, and a
//! student's completed-course snapshot; the stores behind the traits in
//! `repository` supply those snapshots and own the only real mutation
//! (seat counts).

pub mod domain;
pub mod eligibility;
pub(crate) mod records;
pub mod report;
pub mod repository;
pub mod router;
pub(crate) mod rulebook;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CompletionRecord, CompletionStatus, Course, CourseId, Grade, GradeOutOfRange, PrerequisiteRule,
    SatisfactionMode, Semester, SemesterCode, StudentId,
};
pub use eligibility::{
    CompletedCourses, EligibilityConfig, EligibilityEngine, EligibilityReason, EligibilityResult,
    ExamPolicy, MissingRequirement,
};
pub use records::TransitionError;
pub use report::{
    BatchCounts, BatchInsights, BatchReport, CompletedCourseView, CourseEligibilityView,
    MissingPrerequisiteFrequency,
};
pub use repository::{CompletionRecordStore, CourseCatalog, PrerequisiteRuleStore, StoreError};
pub use router::enrollment_router;
pub use rulebook::RuleViolation;
pub use service::{EnrollmentOutcome, EnrollmentService, EnrollmentServiceError};
