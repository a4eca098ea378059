use super::config::{EligibilityConfig, ExamPolicy};
use super::policy::MissingRequirement;
use super::CompletedCourses;
use crate::academics::enrollment::domain::{PrerequisiteRule, SatisfactionMode};

/// Walk every rule gating a course, collecting the unmet ones in store
/// order. No short-circuiting, so callers always see the complete set of
/// gaps rather than the first failure.
pub(crate) fn unmet_requirements(
    rules: &[PrerequisiteRule],
    completed: &CompletedCourses,
    config: &EligibilityConfig,
) -> Vec<MissingRequirement> {
    let mut missing = Vec::new();

    for rule in rules {
        if !rule.active {
            continue;
        }
        if rule.mode == SatisfactionMode::ExamApproved
            && config.exam_policy == ExamPolicy::DeferrableByExam
        {
            continue;
        }
        if completed.meets_minimum(&rule.required_course, rule.minimum_grade) {
            continue;
        }
        missing.push(MissingRequirement::from_rule(rule));
    }

    missing
}
