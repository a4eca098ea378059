use std::collections::HashMap;

use serde::Serialize;

use super::domain::{Course, CourseId, SemesterCode};
use super::eligibility::EligibilityResult;

/// Per-course slice of a batch evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEligibilityView {
    pub course_id: CourseId,
    pub course_name: String,
    pub credits: u8,
    pub semester: SemesterCode,
    pub result: EligibilityResult,
}

impl CourseEligibilityView {
    pub(crate) fn new(course: &Course, result: EligibilityResult) -> Self {
        Self {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            credits: course.credits,
            semester: course.semester.clone(),
            result,
        }
    }
}

/// Catalog entry the student has already completed; excluded from further
/// evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedCourseView {
    pub course_id: CourseId,
    pub course_name: String,
    pub credits: u8,
}

impl CompletedCourseView {
    pub(crate) fn new(course: &Course) -> Self {
        Self {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            credits: course.credits,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCounts {
    pub total_eligible: usize,
    pub total_ineligible: usize,
    pub total_completed: usize,
}

/// How often one prerequisite blocked courses across a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingPrerequisiteFrequency {
    pub required_course_code: String,
    pub required_course_name: String,
    pub blocked_courses: usize,
}

/// Summary statistics layered over the partitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_missing: Option<MissingPrerequisiteFrequency>,
}

/// Whole-catalog eligibility report. The three partitions are disjoint and
/// together cover the active catalog, each in catalog iteration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub eligible_courses: Vec<CourseEligibilityView>,
    pub ineligible_courses: Vec<CourseEligibilityView>,
    pub already_completed_courses: Vec<CompletedCourseView>,
    pub counts: BatchCounts,
    pub insights: BatchInsights,
}

impl BatchReport {
    pub(crate) fn assemble(
        eligible_courses: Vec<CourseEligibilityView>,
        ineligible_courses: Vec<CourseEligibilityView>,
        already_completed_courses: Vec<CompletedCourseView>,
    ) -> Self {
        let counts = BatchCounts {
            total_eligible: eligible_courses.len(),
            total_ineligible: ineligible_courses.len(),
            total_completed: already_completed_courses.len(),
        };
        let insights = BatchInsights {
            most_common_missing: most_common_missing(&ineligible_courses),
        };

        Self {
            eligible_courses,
            ineligible_courses,
            already_completed_courses,
            counts,
            insights,
        }
    }
}

/// The prerequisite blocking the most courses in this run. Ties break toward
/// the requirement seen first in walk order, keeping the output
/// deterministic.
fn most_common_missing(
    ineligible: &[CourseEligibilityView],
) -> Option<MissingPrerequisiteFrequency> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<(&str, &str)> = Vec::new();

    for view in ineligible {
        for missing in &view.result.missing_requirements {
            let code = missing.required_course_code.as_str();
            let count = counts.entry(code).or_insert(0);
            if *count == 0 {
                first_seen.push((code, missing.required_course_name.as_str()));
            }
            *count += 1;
        }
    }

    let mut best: Option<(&str, &str, usize)> = None;
    for &(code, name) in &first_seen {
        let count = counts.get(code).copied().unwrap_or(0);
        if best.map(|(_, _, top)| count > top).unwrap_or(true) {
            best = Some((code, name, count));
        }
    }

    best.map(|(code, name, count)| MissingPrerequisiteFrequency {
        required_course_code: code.to_string(),
        required_course_name: name.to_string(),
        blocked_courses: count,
    })
}
