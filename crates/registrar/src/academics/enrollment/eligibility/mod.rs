mod checks;
mod config;
mod policy;

pub use config::{EligibilityConfig, ExamPolicy};
pub use policy::{EligibilityReason, EligibilityResult, MissingRequirement};

use std::collections::HashMap;

use crate::academics::enrollment::domain::{CompletionRecord, Course, CourseId, Grade, PrerequisiteRule};

/// Stateless evaluator applying one policy consistently across single-course
/// checks and batch reports.
///
/// Evaluation is a pure function of already-fetched snapshots; it mutates
/// nothing and is safe to run concurrently for many students.
pub struct EligibilityEngine {
    config: EligibilityConfig,
}

impl EligibilityEngine {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    /// Decide whether `course` can currently be taken given a completed-course
    /// snapshot and the active rules gating it.
    ///
    /// Seat counts are read as-is from the snapshot; they may be stale by the
    /// time an enrollment is attempted, and the seat claim re-checks.
    pub fn evaluate(
        &self,
        course: &Course,
        rules: &[PrerequisiteRule],
        completed: &CompletedCourses,
    ) -> EligibilityResult {
        if !course.active {
            return EligibilityResult::blocked(EligibilityReason::Inactive);
        }
        if !course.has_open_seats() {
            return EligibilityResult::blocked(EligibilityReason::NoCapacity);
        }

        policy::decide(checks::unmet_requirements(rules, completed, &self.config))
    }
}

/// Immutable snapshot of the courses a student has already satisfied.
///
/// Built either from opaque identifiers (grade unknown, so any minimum is
/// met) or from full completion records (approved only, final grade retained
/// for per-rule minimum checks). Unknown identifiers are simply "not
/// completed", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedCourses {
    grades: HashMap<CourseId, Option<Grade>>,
}

impl CompletedCourses {
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = CourseId>,
    {
        Self {
            grades: ids.into_iter().map(|id| (id, None)).collect(),
        }
    }

    pub fn from_records(records: &[CompletionRecord]) -> Self {
        Self {
            grades: records
                .iter()
                .filter(|record| record.is_completed())
                .map(|record| (record.course.clone(), record.final_grade))
                .collect(),
        }
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.grades.contains_key(id)
    }

    /// Membership check honoring a rule's minimum grade. An entry without a
    /// grade satisfies any minimum.
    pub fn meets_minimum(&self, id: &CourseId, minimum: Grade) -> bool {
        match self.grades.get(id) {
            Some(Some(grade)) => *grade >= minimum,
            Some(None) => true,
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}
