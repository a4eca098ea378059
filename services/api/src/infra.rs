use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use registrar::academics::enrollment::{
    CompletionRecord, CompletionRecordStore, Course, CourseCatalog, CourseId, Grade,
    PrerequisiteRule, PrerequisiteRuleStore, SatisfactionMode, Semester, SemesterCode, StoreError,
    StudentId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog adapter standing in for the registrar's real course store. Seat
/// mutation happens under one lock per catalog, so claims never oversell.
#[derive(Default)]
pub(crate) struct InMemoryCourseCatalog {
    courses: Mutex<Vec<Course>>,
}

impl InMemoryCourseCatalog {
    pub(crate) fn seeded(courses: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(courses),
        }
    }
}

impl CourseCatalog for InMemoryCourseCatalog {
    fn list_active(&self) -> Result<Vec<Course>, StoreError> {
        let guard = self.courses.lock().expect("catalog mutex poisoned");
        Ok(guard.iter().filter(|course| course.active).cloned().collect())
    }

    fn get(&self, id: &CourseId) -> Result<Option<Course>, StoreError> {
        let guard = self.courses.lock().expect("catalog mutex poisoned");
        Ok(guard.iter().find(|course| &course.id == id).cloned())
    }

    fn reserve_seat(&self, id: &CourseId) -> Result<Course, StoreError> {
        let mut guard = self.courses.lock().expect("catalog mutex poisoned");
        let course = guard
            .iter_mut()
            .find(|course| &course.id == id)
            .ok_or(StoreError::NotFound)?;
        if course.available_seats == 0 {
            return Err(StoreError::SeatsExhausted);
        }
        course.available_seats -= 1;
        Ok(course.clone())
    }

    fn release_seat(&self, id: &CourseId) -> Result<Course, StoreError> {
        let mut guard = self.courses.lock().expect("catalog mutex poisoned");
        let course = guard
            .iter_mut()
            .find(|course| &course.id == id)
            .ok_or(StoreError::NotFound)?;
        course.available_seats = (course.available_seats + 1).min(course.maximum_seats);
        Ok(course.clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryRuleStore {
    rules: Mutex<Vec<PrerequisiteRule>>,
}

impl InMemoryRuleStore {
    pub(crate) fn seeded(rules: Vec<PrerequisiteRule>) -> Self {
        Self {
            rules: Mutex::new(rules),
        }
    }
}

impl PrerequisiteRuleStore for InMemoryRuleStore {
    fn active_rules_for(&self, course: &CourseId) -> Result<Vec<PrerequisiteRule>, StoreError> {
        let guard = self.rules.lock().expect("rule mutex poisoned");
        Ok(guard
            .iter()
            .filter(|rule| &rule.course == course && rule.active)
            .cloned()
            .collect())
    }

    fn insert(&self, rule: PrerequisiteRule) -> Result<(), StoreError> {
        let mut guard = self.rules.lock().expect("rule mutex poisoned");
        let duplicate = guard.iter().any(|existing| {
            existing.course == rule.course
                && existing.required_course == rule.required_course
                && existing.mode == rule.mode
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        guard.push(rule);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryRecordStore {
    records: Mutex<HashMap<(StudentId, CourseId), CompletionRecord>>,
}

impl CompletionRecordStore for InMemoryRecordStore {
    fn records_for(&self, student: &StudentId) -> Result<Vec<CompletionRecord>, StoreError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.student == student)
            .cloned()
            .collect())
    }

    fn find(
        &self,
        student: &StudentId,
        course: &CourseId,
    ) -> Result<Option<CompletionRecord>, StoreError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard.get(&(student.clone(), course.clone())).cloned())
    }

    fn upsert(&self, record: CompletionRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        guard.insert((record.student.clone(), record.course.clone()), record);
        Ok(())
    }
}

fn course(
    code: &str,
    name: &str,
    credits: u8,
    seats: u32,
    semester: &str,
    has_exam: bool,
) -> Course {
    Course {
        id: CourseId(code.to_string()),
        name: name.to_string(),
        credits,
        active: true,
        maximum_seats: seats,
        available_seats: seats,
        semester: SemesterCode(semester.to_string()),
        has_exam,
    }
}

fn requires(gated: &str, required: &str, required_name: &str, mode: SatisfactionMode) -> PrerequisiteRule {
    PrerequisiteRule {
        course: CourseId(gated.to_string()),
        required_course: CourseId(required.to_string()),
        required_course_name: required_name.to_string(),
        mode,
        minimum_grade: Grade::DEFAULT_MINIMUM,
        active: true,
    }
}

fn semester(code: &str, name: &str, ordinal: u8) -> Semester {
    Semester {
        code: SemesterCode(code.to_string()),
        name: name.to_string(),
        ordinal,
    }
}

pub(crate) fn demo_semesters() -> Vec<Semester> {
    vec![
        semester("S1", "First Semester", 1),
        semester("S2", "Second Semester", 2),
        semester("S3", "Third Semester", 3),
        semester("S4", "Fourth Semester", 4),
    ]
}

/// Four-semester computing curriculum used by the demo commands and the
/// served in-memory stores.
pub(crate) fn demo_catalog() -> (Vec<Course>, Vec<PrerequisiteRule>) {
    let courses = vec![
        course("CS101", "Intro to Programming", 6, 60, "S1", true),
        course("MATH120", "Discrete Mathematics", 4, 45, "S1", false),
        course("ENG110", "Academic Writing", 3, 80, "S1", false),
        course("CS201", "Data Structures", 6, 40, "S2", true),
        course("MATH220", "Linear Algebra", 4, 35, "S2", false),
        course("CS230", "Computer Architecture", 5, 35, "S2", false),
        course("CS301", "Algorithms", 6, 30, "S3", true),
        course("CS310", "Databases", 5, 30, "S3", false),
        course("CS340", "Operating Systems", 5, 25, "S3", true),
        course("CS401", "Distributed Systems", 6, 20, "S4", false),
        course("CAP480", "Capstone Project", 8, 15, "S4", false),
    ];

    let rules = vec![
        requires("CS201", "CS101", "Intro to Programming", SatisfactionMode::CourseApproved),
        requires("MATH220", "MATH120", "Discrete Mathematics", SatisfactionMode::CourseApproved),
        requires("CS230", "CS101", "Intro to Programming", SatisfactionMode::CourseApproved),
        requires("CS301", "CS201", "Data Structures", SatisfactionMode::CourseApproved),
        requires("CS301", "MATH220", "Linear Algebra", SatisfactionMode::ExamApproved),
        requires("CS310", "CS201", "Data Structures", SatisfactionMode::CourseApproved),
        requires("CS340", "CS201", "Data Structures", SatisfactionMode::CourseApproved),
        requires("CS340", "CS230", "Computer Architecture", SatisfactionMode::CourseApproved),
        requires("CS401", "CS301", "Algorithms", SatisfactionMode::CourseApproved),
        requires("CS401", "CS340", "Operating Systems", SatisfactionMode::CourseApproved),
        requires("CAP480", "CS301", "Algorithms", SatisfactionMode::CourseApproved),
        requires("CAP480", "CS310", "Databases", SatisfactionMode::CourseApproved),
    ];

    (courses, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_demo_course_belongs_to_a_seeded_semester() {
        let (courses, _) = demo_catalog();
        let semesters = demo_semesters();
        for course in courses {
            assert!(semesters
                .iter()
                .any(|semester| semester.code == course.semester));
        }
    }

    #[test]
    fn demo_catalog_rules_only_reference_seeded_courses() {
        let (courses, rules) = demo_catalog();
        for rule in rules {
            assert!(courses.iter().any(|course| course.id == rule.course));
            assert!(courses.iter().any(|course| course.id == rule.required_course));
            assert_ne!(rule.course, rule.required_course);
        }
    }

    #[test]
    fn seat_claims_stop_at_zero() {
        let (courses, _) = demo_catalog();
        let catalog = InMemoryCourseCatalog::seeded(courses);
        let capstone = CourseId("CAP480".to_string());

        for remaining in (0..15).rev() {
            let course = catalog.reserve_seat(&capstone).expect("seat claims");
            assert_eq!(course.available_seats, remaining);
        }

        assert!(matches!(
            catalog.reserve_seat(&capstone),
            Err(StoreError::SeatsExhausted)
        ));
    }
}
