use crate::{
    config::PackageEntry,
    record::{ReportKey, ReportRecord},
};
use itertools::Itertools;
use std::{iter, ops::RangeInclusive, path::PathBuf};
use tracing::{info, instrument};

/// every hash gets one row per log2 of the permutation count in this range
pub const LOG_PERMUTATIONS: RangeInclusive<u32> = 10..=20;

const COLUMNS: [&str; 6] = ["hash", "perm", "time", "throughput", "proof_size", "peak_mem"];
const BLANK_ROW: &str = "| | | | | | |";

/// Renders one markdown table per package out of the benchmark reports on disk
#[derive(Debug, Clone)]
pub struct ReportTableRenderer {
    catalog: Vec<PackageEntry>,
    root: PathBuf,
    strict_line_count: bool,
}

impl ReportTableRenderer {
    /// renderer reading reports relative to the working directory in lenient mode
    pub fn new(catalog: Vec<PackageEntry>) -> Self {
        Self {
            catalog,
            root: PathBuf::from("."),
            strict_line_count: false,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// reject reports that don't have exactly four lines
    pub fn strict_line_count(mut self, strict_line_count: bool) -> Self {
        self.strict_line_count = strict_line_count;
        self
    }

    /// Render all packages, one element per output line.
    ///
    /// Missing or malformed reports never fail the rendering, they show up as a
    /// row of placeholders so the tables keep their shape.
    #[instrument(skip(self), level = "debug")]
    pub fn render(&self, threads: &str) -> Vec<String> {
        let mut lines = vec![String::new()];

        for package in self.catalog.iter() {
            self.render_package(package, threads, &mut lines);
        }

        lines
    }

    fn render_package(&self, package: &PackageEntry, threads: &str, lines: &mut Vec<String>) {
        info!(package = %package.name, "Rendering table");

        lines.push(format!("<!-- {} -->", package.name));
        lines.push(String::new());
        lines.push(table_row(COLUMNS.iter().map(|column| code(column))));
        lines.push(table_row(iter::repeat("-".to_string()).take(COLUMNS.len())));

        for (idx, hash) in package.hashes.iter().enumerate() {
            if idx != 0 {
                lines.push(BLANK_ROW.to_string());
            }

            for log_permutations in LOG_PERMUTATIONS {
                let key = ReportKey {
                    package: &package.name,
                    hash,
                    threads,
                    log_permutations,
                };
                let record =
                    ReportRecord::load_or_placeholder(&key.path(&self.root), self.strict_line_count);

                lines.push(record_row(hash, log_permutations, &record));
            }
        }

        lines.push(String::new());
    }
}

/// `| {hash} | 2^{log_permutations} | {time} | {throughput} | {proof_size} | {peak_mem} |`
pub fn record_row(hash: &str, log_permutations: u32, record: &ReportRecord) -> String {
    table_row(
        iter::once(code(hash))
            .chain(iter::once(format!("<code>2<sup>{log_permutations}</sup></code>")))
            .chain(record.fields().into_iter().map(code)),
    )
}

fn code(value: &str) -> String {
    format!("`{value}`")
}

fn table_row(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |", cells.format(" | "))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
