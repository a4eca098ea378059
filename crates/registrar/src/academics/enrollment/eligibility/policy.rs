use serde::{Deserialize, Serialize};

use crate::academics::enrollment::domain::{Grade, PrerequisiteRule, SatisfactionMode};

/// Machine-readable cause attached to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EligibilityReason {
    Ok,
    Inactive,
    NoCapacity,
    UnmetPrerequisites,
}

impl EligibilityReason {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityReason::Ok => "ok",
            EligibilityReason::Inactive => "inactive",
            EligibilityReason::NoCapacity => "noCapacity",
            EligibilityReason::UnmetPrerequisites => "unmetPrerequisites",
        }
    }
}

/// One unmet prerequisite edge, reported in store iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingRequirement {
    pub required_course_code: String,
    pub required_course_name: String,
    pub satisfaction_mode: SatisfactionMode,
    pub minimum_grade: Grade,
}

impl MissingRequirement {
    pub(crate) fn from_rule(rule: &PrerequisiteRule) -> Self {
        Self {
            required_course_code: rule.required_course.0.clone(),
            required_course_name: rule.required_course_name.clone(),
            satisfaction_mode: rule.mode,
            minimum_grade: rule.minimum_grade,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {}, minimum grade {}",
            self.required_course_code,
            self.required_course_name,
            self.satisfaction_mode.label(),
            self.minimum_grade.value()
        )
    }
}

/// Evaluation output. "Not eligible" is a normal value here, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub eligible: bool,
    pub reason: EligibilityReason,
    /// Populated only when `reason` is `UnmetPrerequisites`; complete, not
    /// just the first failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_requirements: Vec<MissingRequirement>,
}

impl EligibilityResult {
    pub fn ok() -> Self {
        Self {
            eligible: true,
            reason: EligibilityReason::Ok,
            missing_requirements: Vec::new(),
        }
    }

    pub(crate) fn blocked(reason: EligibilityReason) -> Self {
        Self {
            eligible: false,
            reason,
            missing_requirements: Vec::new(),
        }
    }
}

/// Fold the collected gaps into the final verdict.
pub(crate) fn decide(missing: Vec<MissingRequirement>) -> EligibilityResult {
    if missing.is_empty() {
        EligibilityResult::ok()
    } else {
        EligibilityResult {
            eligible: false,
            reason: EligibilityReason::UnmetPrerequisites,
            missing_requirements: missing,
        }
    }
}
