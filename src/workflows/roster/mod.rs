mod mapping;
mod normalizer;
mod parser;

use crate::workflows::mission::evaluations::{CandidateIntake, CandidateStatus, StagedIntake};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads ATS roster exports into staged candidate intakes. Columns:
/// `Candidate`, `Email`, `Applied At`, `Stage`, `Source`.
pub struct CandidateRosterImporter;

impl CandidateRosterImporter {
    /// Import a roster export from disk. `exported_on` backfills rows whose
    /// `Applied At` cell is blank or unreadable.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        exported_on: NaiveDate,
    ) -> Result<Vec<StagedIntake>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, exported_on)
    }

    /// Rows without a usable email or candidate name are skipped, and a
    /// duplicated email keeps its first row only.
    pub fn from_reader<R: Read>(
        reader: R,
        exported_on: NaiveDate,
    ) -> Result<Vec<StagedIntake>, RosterImportError> {
        let mut staged = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for record in parser::parse_records(reader)? {
            let Some(email) = record.email else {
                continue;
            };
            if record.full_name.is_empty() {
                continue;
            }
            if !seen.insert(email.clone()) {
                continue;
            }

            let stage = record
                .normalized_stage
                .as_deref()
                .and_then(mapping::status_for_normalized)
                .unwrap_or(CandidateStatus::Applied);

            staged.push(StagedIntake {
                intake: CandidateIntake {
                    full_name: record.full_name,
                    email,
                    headline: None,
                    applied_on: record.applied_on.unwrap_or(exported_on),
                    source: record.source,
                },
                stage,
            });
        }

        Ok(staged)
    }
}
