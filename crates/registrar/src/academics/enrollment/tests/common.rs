use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::academics::enrollment::domain::{
    CompletionRecord, Course, CourseId, Grade, PrerequisiteRule, SatisfactionMode, SemesterCode,
    StudentId,
};
use crate::academics::enrollment::eligibility::{
    CompletedCourses, EligibilityConfig, EligibilityEngine,
};
use crate::academics::enrollment::repository::{
    CompletionRecordStore, CourseCatalog, PrerequisiteRuleStore, StoreError,
};
use crate::academics::enrollment::{enrollment_router, EnrollmentService};

pub(super) fn grade(value: u8) -> Grade {
    Grade::new(value).expect("grade on scale")
}

pub(super) fn course_id(code: &str) -> CourseId {
    CourseId(code.to_string())
}

pub(super) fn course(code: &str, name: &str, credits: u8, seats: u32, has_exam: bool) -> Course {
    Course {
        id: course_id(code),
        name: name.to_string(),
        credits,
        active: true,
        maximum_seats: seats.max(1),
        available_seats: seats,
        semester: SemesterCode("S1".to_string()),
        has_exam,
    }
}

pub(super) fn rule(
    gated: &str,
    required: &str,
    required_name: &str,
    mode: SatisfactionMode,
    minimum: u8,
) -> PrerequisiteRule {
    PrerequisiteRule {
        course: course_id(gated),
        required_course: course_id(required),
        required_course_name: required_name.to_string(),
        mode,
        minimum_grade: grade(minimum),
        active: true,
    }
}

pub(super) fn completed(codes: &[&str]) -> CompletedCourses {
    CompletedCourses::from_ids(codes.iter().map(|code| course_id(code)))
}

pub(super) fn student(id: &str) -> StudentId {
    StudentId(id.to_string())
}

/// Small standard catalog: CS101 and MATH120 are open entry points, CS201
/// requires CS101, CS301 requires CS201 plus a MATH120 exam certification,
/// CAP400 is full, and HIST250 is soft-disabled.
pub(super) fn standard_catalog() -> Vec<Course> {
    let mut cap400 = course("CAP400", "Capstone Seminar", 2, 15, false);
    cap400.available_seats = 0;
    let mut hist250 = course("HIST250", "History of Computing", 3, 20, false);
    hist250.active = false;

    vec![
        course("CS101", "Intro to Programming", 6, 40, true),
        course("MATH120", "Discrete Mathematics", 4, 30, false),
        course("CS201", "Data Structures", 6, 30, true),
        course("CS301", "Algorithms", 6, 25, true),
        cap400,
        hist250,
    ]
}

pub(super) fn standard_rules() -> Vec<PrerequisiteRule> {
    let mut retired = rule(
        "CS201",
        "CS110",
        "Computing Lab",
        SatisfactionMode::CourseApproved,
        3,
    );
    retired.active = false;

    vec![
        rule(
            "CS201",
            "CS101",
            "Intro to Programming",
            SatisfactionMode::CourseApproved,
            3,
        ),
        retired,
        rule(
            "CS301",
            "CS201",
            "Data Structures",
            SatisfactionMode::CourseApproved,
            3,
        ),
        rule(
            "CS301",
            "MATH120",
            "Discrete Mathematics",
            SatisfactionMode::ExamApproved,
            3,
        ),
    ]
}

pub(super) fn eligibility_config() -> EligibilityConfig {
    EligibilityConfig::default()
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(eligibility_config())
}

pub(super) fn build_service() -> (
    EnrollmentService<MemoryCatalog, MemoryRuleStore, MemoryRecordStore>,
    Arc<MemoryCatalog>,
    Arc<MemoryRuleStore>,
    Arc<MemoryRecordStore>,
) {
    let catalog = Arc::new(MemoryCatalog::seeded(standard_catalog()));
    let rules = Arc::new(MemoryRuleStore::seeded(standard_rules()));
    let records = Arc::new(MemoryRecordStore::default());
    let service = EnrollmentService::new(
        catalog.clone(),
        rules.clone(),
        records.clone(),
        eligibility_config(),
    );
    (service, catalog, rules, records)
}

pub(super) fn router_with_service(
    service: EnrollmentService<MemoryCatalog, MemoryRuleStore, MemoryRecordStore>,
) -> axum::Router {
    enrollment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    courses: Mutex<Vec<Course>>,
}

impl MemoryCatalog {
    pub(super) fn seeded(courses: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(courses),
        }
    }
}

impl CourseCatalog for MemoryCatalog {
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
pub(super) struct MemoryRuleStore {
    rules: Mutex<Vec<PrerequisiteRule>>,
}

impl MemoryRuleStore {
    pub(super) fn seeded(rules: Vec<PrerequisiteRule>) -> Self {
        Self {
            rules: Mutex::new(rules),
        }
    }
}

impl PrerequisiteRuleStore for MemoryRuleStore {
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
pub(super) struct MemoryRecordStore {
    records: Mutex<HashMap<(StudentId, CourseId), CompletionRecord>>,
}

impl CompletionRecordStore for MemoryRecordStore {
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

pub(super) struct UnavailableCatalog;

impl CourseCatalog for UnavailableCatalog {
    fn list_active(&self) -> Result<Vec<Course>, StoreError> {
        Err(StoreError::Unavailable("catalog offline".to_string()))
    }

    fn get(&self, _id: &CourseId) -> Result<Option<Course>, StoreError> {
        Err(StoreError::Unavailable("catalog offline".to_string()))
    }

    fn reserve_seat(&self, _id: &CourseId) -> Result<Course, StoreError> {
        Err(StoreError::Unavailable("catalog offline".to_string()))
    }

    fn release_seat(&self, _id: &CourseId) -> Result<Course, StoreError> {
        Err(StoreError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) struct UnavailableRuleStore;

impl PrerequisiteRuleStore for UnavailableRuleStore {
    fn active_rules_for(&self, _course: &CourseId) -> Result<Vec<PrerequisiteRule>, StoreError> {
        Err(StoreError::Unavailable("rule store offline".to_string()))
    }

    fn insert(&self, _rule: PrerequisiteRule) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("rule store offline".to_string()))
    }
}
