use super::domain::{CompletionRecord, Course, CourseId, PrerequisiteRule, StudentId};

/// Read access to the course catalog, plus the serialized seat mutations.
///
/// Seat claims are compare-and-decrement per course so concurrent
/// enrollments never oversell capacity; everything else is a plain read.
pub trait CourseCatalog: Send + Sync {
    /// Active catalog in stable iteration order.
    fn list_active(&self) -> Result<Vec<Course>, StoreError>;
    fn get(&self, id: &CourseId) -> Result<Option<Course>, StoreError>;
    /// Claim one seat, returning the updated course. `SeatsExhausted` when
    /// none remain.
    fn reserve_seat(&self, id: &CourseId) -> Result<Course, StoreError>;
    /// Return one seat, capped at the course maximum.
    fn release_seat(&self, id: &CourseId) -> Result<Course, StoreError>;
}

/// Read/insert access to the prerequisite rule edges.
pub trait PrerequisiteRuleStore: Send + Sync {
    /// Active rules gating `course`, in stable store order. The evaluator
    /// reports missing requirements in exactly this order.
    fn active_rules_for(&self, course: &CourseId) -> Result<Vec<PrerequisiteRule>, StoreError>;
    /// Insert a validated rule. Duplicate (course, required course, mode)
    /// edges are a conflict.
    fn insert(&self, rule: PrerequisiteRule) -> Result<(), StoreError>;
}

/// Storage for per-student completion records, one per (student, course).
pub trait CompletionRecordStore: Send + Sync {
    fn records_for(&self, student: &StudentId) -> Result<Vec<CompletionRecord>, StoreError>;
    fn find(
        &self,
        student: &StudentId,
        course: &CourseId,
    ) -> Result<Option<CompletionRecord>, StoreError>;
    /// Newer state replaces older for the same (student, course) pair.
    fn upsert(&self, record: CompletionRecord) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("no seats available")]
    SeatsExhausted,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
