//! Transcript import from student-information-system CSV exports.
//!
//! Parsed entries feed a [`CompletedCourses`] snapshot for the eligibility
//! engine; rows that never reached approval, or passed below the default
//! minimum, are parsed but excluded from the snapshot.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::academics::enrollment::{CompletedCourses, CourseId, GradeOutOfRange};

pub use parser::TranscriptEntry;

#[derive(Debug)]
pub enum TranscriptImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Grade { course_code: String, source: GradeOutOfRange },
}

impl std::fmt::Display for TranscriptImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptImportError::Io(err) => write!(f, "failed to read transcript export: {}", err),
            TranscriptImportError::Csv(err) => write!(f, "invalid transcript CSV data: {}", err),
            TranscriptImportError::Grade { course_code, source } => {
                write!(f, "transcript row for {} carries an invalid grade: {}", course_code, source)
            }
        }
    }
}

impl std::error::Error for TranscriptImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscriptImportError::Io(err) => Some(err),
            TranscriptImportError::Csv(err) => Some(err),
            TranscriptImportError::Grade { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for TranscriptImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TranscriptImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A parsed transcript: every row retained, course codes normalized.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Snapshot of the approved, passing rows, with final grades carried so
    /// per-rule minimum-grade checks stay meaningful.
    pub fn completed_courses(&self) -> CompletedCourses {
        CompletedCourses::from_records(
            &self
                .entries
                .iter()
                .filter_map(TranscriptEntry::as_completion_record)
                .collect::<Vec<_>>(),
        )
    }

    /// Just the identifiers of the approved, passing rows.
    pub fn completed_course_ids(&self) -> Vec<CourseId> {
        self.entries
            .iter()
            .filter(|entry| entry.counts_as_completed())
            .map(|entry| entry.course_id())
            .collect()
    }
}

pub struct TranscriptImporter;

impl TranscriptImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Transcript, TranscriptImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Transcript, TranscriptImportError> {
        Ok(Transcript {
            entries: parser::parse_entries(reader)?,
        })
    }
}

/// Course codes in exports vary in casing and spacing; fold them to a
/// canonical form before they are compared against catalog identifiers.
pub(crate) fn normalize_code(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}
