use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog courses. The wrapped string is the course code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for semesters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemesterCode(pub String);

/// Ordering grouping for courses; membership carries no prerequisite meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub code: SemesterCode,
    pub name: String,
    pub ordinal: u8,
}

/// Bounded grade on the institutional 1-5 scale.
///
/// Construction validates the range, so every `Grade` reaching the evaluator
/// or the record state machine is already well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: Grade = Grade(1);
    pub const MAX: Grade = Grade(5);
    /// Conventional approval threshold.
    pub const DEFAULT_MINIMUM: Grade = Grade(3);

    pub fn new(value: u8) -> Result<Self, GradeOutOfRange> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GradeOutOfRange(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Weighted blend applied when an exam certifies graded coursework:
    /// 70% exam, 30% course, rounded to the nearest step on the scale.
    pub fn blend(course: Grade, exam: Grade) -> Grade {
        let raw = f32::from(exam.0) * 0.7 + f32::from(course.0) * 0.3;
        Grade(raw.round().clamp(f32::from(Self::MIN.0), f32::from(Self::MAX.0)) as u8)
    }
}

/// Rejection raised for grades outside the 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("grade {0} is outside the 1-5 scale")]
pub struct GradeOutOfRange(pub u8);

impl TryFrom<u8> for Grade {
    type Error = GradeOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

/// A catalog entry students may enroll in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Credit weight copied onto completion records at approval time.
    pub credits: u8,
    /// Soft-disable flag; inactive courses stay referenced by rules but are
    /// never takable.
    pub active: bool,
    pub maximum_seats: u32,
    /// Invariant: `available_seats <= maximum_seats`. Seat mutation is owned
    /// by the catalog store, serialized per course.
    pub available_seats: u32,
    pub semester: SemesterCode,
    /// Whether the course carries a separate exam component after coursework.
    pub has_exam: bool,
}

impl Course {
    pub fn has_open_seats(&self) -> bool {
        self.available_seats > 0
    }
}

/// How a prerequisite edge is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SatisfactionMode {
    /// The required course was formally completed and passed with at least
    /// the rule's minimum grade.
    CourseApproved,
    /// The required course's competency was certified, historically by a
    /// placement exam.
    ExamApproved,
}

impl SatisfactionMode {
    pub const fn label(self) -> &'static str {
        match self {
            SatisfactionMode::CourseApproved => "course approved (required)",
            SatisfactionMode::ExamApproved => "exam approved (required)",
        }
    }
}

/// Directed edge in the prerequisite graph: `course` requires
/// `required_course` under `mode`.
///
/// Invariant: `course != required_course`; the rule guard rejects
/// self-prerequisites before they reach a store. The required course name is
/// denormalized so evaluation never needs a catalog round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteRule {
    pub course: CourseId,
    pub required_course: CourseId,
    pub required_course_name: String,
    pub mode: SatisfactionMode,
    pub minimum_grade: Grade,
    /// Inactive rules are ignored entirely by the evaluator.
    pub active: bool,
}

/// Progress states for one student in one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionStatus {
    Pending,
    InProgress,
    CourseDonePendingExam,
    Approved,
}

impl CompletionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CompletionStatus::Pending => "pending",
            CompletionStatus::InProgress => "in_progress",
            CompletionStatus::CourseDonePendingExam => "course_done_pending_exam",
            CompletionStatus::Approved => "approved",
        }
    }
}

/// One student's progress record for one course. Uniqueness on
/// (student, course) is enforced by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub student: StudentId,
    pub course: CourseId,
    pub status: CompletionStatus,
    pub course_grade: Option<Grade>,
    pub exam_grade: Option<Grade>,
    /// Derived once both component grades are known; equals the course grade
    /// when the course has no exam component.
    pub final_grade: Option<Grade>,
    pub credits_earned: u8,
    pub approved_at: Option<DateTime<Utc>>,
}
