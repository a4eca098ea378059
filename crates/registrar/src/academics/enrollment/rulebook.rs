use super::domain::{CourseId, PrerequisiteRule};

/// Validation errors raised when administrators define prerequisite edges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("course {0} cannot require itself")]
    SelfPrerequisite(CourseId),
    #[error("rule references a blank course identifier")]
    BlankCourse,
}

/// Guard applied to every candidate rule before it reaches a store, so the
/// evaluator never sees an invalid edge. Duplicate (course, required course,
/// mode) edges are the store's conflict, not the guard's.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleGuard;

impl RuleGuard {
    pub fn validate(&self, rule: &PrerequisiteRule) -> Result<(), RuleViolation> {
        if rule.course.0.trim().is_empty() || rule.required_course.0.trim().is_empty() {
            return Err(RuleViolation::BlankCourse);
        }
        if rule.course == rule.required_course {
            return Err(RuleViolation::SelfPrerequisite(rule.course.clone()));
        }
        Ok(())
    }
}
