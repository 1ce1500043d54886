use itertools::Itertools;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// cell content used for every field of a missing or broken report
pub const PLACEHOLDER: &str = "-";
/// separates the label from the value on every report line
pub const FIELD_SEPARATOR: &str = ": ";
/// time, throughput, proof size and peak memory
pub const RECORD_FIELDS: usize = 4;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to access report file")]
    FileAccess(#[from] std::io::Error),
    #[error("Line {line} is missing the `: ` separator")]
    MalformedLine { line: usize },
    #[error("Expected {expected} lines, found {found}")]
    LineCount { expected: usize, found: usize },
}

/// Identifies the report written by a single benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportKey<'a> {
    pub package: &'a str,
    pub hash: &'a str,
    pub threads: &'a str,
    pub log_permutations: u32,
}

impl ReportKey<'_> {
    pub fn file_name(&self) -> String {
        format!("t{}_{}_lp{}", self.threads, self.hash, self.log_permutations)
    }

    /// `{root}/{package}/report/t{threads}_{hash}_lp{log_permutations}`
    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(self.package).join("report").join(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub time: String,
    pub throughput: String,
    pub proof_size: String,
    pub peak_mem: String,
}

impl ReportRecord {
    pub fn placeholder() -> Self {
        Self {
            time: PLACEHOLDER.to_string(),
            throughput: PLACEHOLDER.to_string(),
            proof_size: PLACEHOLDER.to_string(),
            peak_mem: PLACEHOLDER.to_string(),
        }
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        self.fields().iter().all(|field| *field == PLACEHOLDER)
    }

    pub fn fields(&self) -> [&str; RECORD_FIELDS] {
        [
            self.time.as_str(),
            self.throughput.as_str(),
            self.proof_size.as_str(),
            self.peak_mem.as_str(),
        ]
    }

    /// Parse the contents of a report file.
    ///
    /// Only the first four lines are looked at, unless `strict_line_count` is set
    /// in which case any other line count is rejected as well.
    pub fn parse(contents: &str, strict_line_count: bool) -> Result<Self, RecordError> {
        let lines = contents.lines().collect_vec();

        if lines.len() < RECORD_FIELDS || (strict_line_count && lines.len() != RECORD_FIELDS) {
            return Err(RecordError::LineCount {
                expected: RECORD_FIELDS,
                found: lines.len(),
            });
        }

        let values: Vec<String> = lines
            .iter()
            .take(RECORD_FIELDS)
            .enumerate()
            .map(|(idx, line)| {
                extract_value(line)
                    .map(str::to_string)
                    .ok_or(RecordError::MalformedLine { line: idx + 1 })
            })
            .collect::<Result<_, _>>()?;

        match values.into_iter().collect_tuple() {
            Some((time, throughput, proof_size, peak_mem)) => Ok(Self {
                time,
                throughput,
                proof_size,
                peak_mem,
            }),
            None => Err(RecordError::LineCount {
                expected: RECORD_FIELDS,
                found: lines.len(),
            }),
        }
    }

    pub fn read(path: &Path, strict_line_count: bool) -> Result<Self, RecordError> {
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents, strict_line_count)
    }

    /// Read a report, any failure results in a placeholder record
    pub fn load_or_placeholder(path: &Path, strict_line_count: bool) -> Self {
        match Self::read(path, strict_line_count) {
            Ok(record) => record,
            Err(error) => {
                debug!(path = ?path, error = %error, "Using placeholder for report");

                Self::placeholder()
            }
        }
    }
}

/// value after the first `: `, surrounding whitespace is ignored
fn extract_value(line: &str) -> Option<&str> {
    line.trim()
        .split_once(FIELD_SEPARATOR)
        .map(|(_label, value)| value)
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
