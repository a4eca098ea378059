use serde::{Deserialize, Serialize};

use crate::academics::enrollment::domain::Grade;

/// How `ExamApproved` prerequisites participate in a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExamPolicy {
    /// Absence from the completed set blocks eligibility like any other rule.
    Blocking,
    /// The rule never blocks: the student can still test out via a placement
    /// exam before the course starts.
    DeferrableByExam,
}

impl Default for ExamPolicy {
    fn default() -> Self {
        ExamPolicy::Blocking
    }
}

/// Knobs applied uniformly across single-course checks and batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub exam_policy: ExamPolicy,
    /// Approval threshold used by the record state machine.
    pub passing_grade: Grade,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            exam_policy: ExamPolicy::default(),
            passing_grade: Grade::DEFAULT_MINIMUM,
        }
    }
}
