use chrono::{DateTime, Utc};

use super::domain::{CompletionRecord, CompletionStatus, Course, CourseId, Grade, PrerequisiteRule, StudentId};

/// Rejection raised when a grade arrives in a state that cannot accept it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} while the record is {}", .from.label())]
    InvalidTransition {
        from: CompletionStatus,
        action: &'static str,
    },
    #[error("exam grade recorded before any course grade")]
    MissingCourseGrade,
}

impl CompletionRecord {
    /// Fresh record in `Pending`, created the first time a student touches a
    /// course.
    pub fn new(student: StudentId, course: CourseId) -> Self {
        Self {
            student,
            course,
            status: CompletionStatus::Pending,
            course_grade: None,
            exam_grade: None,
            final_grade: None,
            credits_earned: 0,
            approved_at: None,
        }
    }

    /// Pending -> InProgress, when the student enters the course.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        match self.status {
            CompletionStatus::Pending => {
                self.status = CompletionStatus::InProgress;
                Ok(())
            }
            from => Err(TransitionError::InvalidTransition {
                from,
                action: "begin a course",
            }),
        }
    }

    /// Record the graded-coursework result.
    ///
    /// A passing grade moves the record to `CourseDonePendingExam` when the
    /// course carries an exam component, or straight to `Approved` when it
    /// does not (the Pending -> Approved shortcut collapses through here).
    /// A failing grade is kept and the record settles in `InProgress` so the
    /// course can be retaken.
    pub fn record_course_grade(
        &mut self,
        grade: Grade,
        course: &Course,
        passing: Grade,
        at: DateTime<Utc>,
    ) -> Result<CompletionStatus, TransitionError> {
        match self.status {
            CompletionStatus::Pending | CompletionStatus::InProgress => {}
            from => {
                return Err(TransitionError::InvalidTransition {
                    from,
                    action: "record a course grade",
                })
            }
        }

        self.course_grade = Some(grade);
        if grade < passing {
            self.status = CompletionStatus::InProgress;
        } else if course.has_exam {
            self.status = CompletionStatus::CourseDonePendingExam;
        } else {
            self.approve(grade, course, at);
        }

        Ok(self.status)
    }

    /// Record the exam result for a record awaiting certification.
    ///
    /// A passing exam approves the record with the blended final grade; a
    /// failing one leaves it in `CourseDonePendingExam` for a retake.
    pub fn record_exam_grade(
        &mut self,
        grade: Grade,
        course: &Course,
        passing: Grade,
        at: DateTime<Utc>,
    ) -> Result<CompletionStatus, TransitionError> {
        if self.status != CompletionStatus::CourseDonePendingExam {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                action: "record an exam grade",
            });
        }
        let course_grade = self.course_grade.ok_or(TransitionError::MissingCourseGrade)?;

        self.exam_grade = Some(grade);
        if grade >= passing {
            self.approve(Grade::blend(course_grade, grade), course, at);
        }

        Ok(self.status)
    }

    fn approve(&mut self, final_grade: Grade, course: &Course, at: DateTime<Utc>) {
        self.status = CompletionStatus::Approved;
        self.final_grade = Some(final_grade);
        self.credits_earned = course.credits;
        self.approved_at = Some(at);
    }

    pub fn is_completed(&self) -> bool {
        self.status == CompletionStatus::Approved
    }

    /// Whether this record satisfies a prerequisite edge: approved, and the
    /// final grade meets the rule's minimum.
    pub fn satisfies(&self, rule: &PrerequisiteRule) -> bool {
        self.status == CompletionStatus::Approved
            && self
                .final_grade
                .map(|grade| grade >= rule.minimum_grade)
                .unwrap_or(false)
    }
}
