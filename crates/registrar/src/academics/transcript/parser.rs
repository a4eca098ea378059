use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::{normalize_code, TranscriptImportError};
use crate::academics::enrollment::{
    CompletionRecord, CompletionStatus, CourseId, Grade, StudentId,
};

/// One normalized transcript row.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub course_code: String,
    pub course_title: String,
    pub approved: bool,
    pub final_grade: Option<Grade>,
    pub credits: u8,
}

impl TranscriptEntry {
    pub fn course_id(&self) -> CourseId {
        CourseId(self.course_code.clone())
    }

    /// Approved with a grade at or above the conventional minimum.
    pub fn counts_as_completed(&self) -> bool {
        self.approved
            && self
                .final_grade
                .map(|grade| grade >= Grade::DEFAULT_MINIMUM)
                .unwrap_or(false)
    }

    /// Bridge into the record shape the eligibility snapshot is built from.
    /// Rows that never reached approval produce no record.
    pub(crate) fn as_completion_record(&self) -> Option<CompletionRecord> {
        if !self.counts_as_completed() {
            return None;
        }

        let mut record = CompletionRecord::new(
            StudentId("transcript".to_string()),
            self.course_id(),
        );
        record.status = CompletionStatus::Approved;
        record.course_grade = self.final_grade;
        record.final_grade = self.final_grade;
        record.credits_earned = self.credits;
        Some(record)
    }
}

pub(crate) fn parse_entries<R: Read>(
    reader: R,
) -> Result<Vec<TranscriptEntry>, TranscriptImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<TranscriptRow>() {
        let row = record?;
        let course_code = normalize_code(&row.course_code);
        let final_grade = match row.final_grade {
            Some(value) => Some(Grade::new(value).map_err(|source| {
                TranscriptImportError::Grade {
                    course_code: course_code.clone(),
                    source,
                }
            })?),
            None => None,
        };

        let approved = row.approved();
        entries.push(TranscriptEntry {
            course_code,
            course_title: row.course_title,
            approved,
            final_grade,
            credits: row.credits.unwrap_or(0),
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct TranscriptRow {
    #[serde(rename = "Course Code")]
    course_code: String,
    #[serde(rename = "Course Title", default)]
    course_title: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "Final Grade", default, deserialize_with = "empty_as_none")]
    final_grade: Option<u8>,
    #[serde(rename = "Credits", default, deserialize_with = "empty_as_none")]
    credits: Option<u8>,
}

impl TranscriptRow {
    fn approved(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("approved")
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u8>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
