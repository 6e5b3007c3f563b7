//! Directory inspection reports.
//!
//! Backs the `scan` and `check` commands of the `patch-dataset` binary:
//! `scan` parses every filename without decoding, `check` performs a full
//! retrieval of every patch and records the failures.

use std::fmt;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::patch::PatchDataset;

// =============================================================================
// Scan
// =============================================================================

/// One listed patch and the outcome of parsing its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    pub index: usize,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coord: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Filename-level view of a patch directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub dir: String,
    pub patches: usize,
    pub malformed: usize,
    pub entries: Vec<ScanEntry>,
}

/// Parse the coordinate of every listed patch.
pub fn scan_dataset<T>(dataset: &PatchDataset<T>) -> ScanReport {
    let entries: Vec<ScanEntry> = (0..dataset.len())
        .map(|index| {
            let file = file_label(dataset.path(index));
            match dataset.coord(index) {
                Ok(coord) => ScanEntry {
                    index,
                    file,
                    coord: Some(coord.to_array()),
                    error: None,
                },
                Err(e) => ScanEntry {
                    index,
                    file,
                    coord: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    ScanReport {
        dir: dataset.dir().display().to_string(),
        patches: entries.len(),
        malformed: entries.iter().filter(|e| e.error.is_some()).count(),
        entries,
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {} patch(es)", self.dir, self.patches)?;
        for entry in &self.entries {
            match (&entry.coord, &entry.error) {
                (Some([x, y]), _) => writeln!(
                    f,
                    "  {:>6}  x={:<8} y={:<8} {}",
                    entry.index, x, y, entry.file
                )?,
                (None, Some(error)) => writeln!(f, "  {:>6}  {}", entry.index, error)?,
                (None, None) => writeln!(f, "  {:>6}  {}", entry.index, entry.file)?,
            }
        }
        if self.malformed > 0 {
            writeln!(f, "{} malformed filename(s)", self.malformed)?;
        }
        Ok(())
    }
}

// =============================================================================
// Check
// =============================================================================

/// A patch that failed full retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    pub index: usize,
    pub file: String,
    pub kind: &'static str,
    pub error: String,
}

/// Outcome of retrieving every patch of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub dir: String,
    pub patches: usize,
    pub ok: usize,
    pub failures: Vec<CheckFailure>,
}

impl CheckReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Retrieve every patch, in parallel on the current rayon pool.
///
/// Failures are reported in index order regardless of completion order.
pub fn check_dataset<T>(dataset: &PatchDataset<T>) -> CheckReport {
    let failures: Vec<CheckFailure> = (0..dataset.len())
        .into_par_iter()
        .filter_map(|index| {
            dataset.get(index).err().map(|e| CheckFailure {
                index,
                file: file_label(dataset.path(index)),
                kind: e.kind(),
                error: e.to_string(),
            })
        })
        .collect();

    CheckReport {
        dir: dataset.dir().display().to_string(),
        patches: dataset.len(),
        ok: dataset.len() - failures.len(),
        failures,
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}/{} patch(es) readable",
            self.dir, self.ok, self.patches
        )?;
        for failure in &self.failures {
            writeln!(
                f,
                "  {:>6}  [{}] {}",
                failure.index, failure.kind, failure.error
            )?;
        }
        Ok(())
    }
}

fn file_label(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Serialize a report as pretty JSON.
pub fn to_json<R: Serialize>(report: &R) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

// =============================================================================
// Tests
// =============================================================================
