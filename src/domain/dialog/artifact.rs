//! The rendered file name proposal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A standardized file name assembled from the captured answers.
///
/// The format is fixed: `kind_group_filename_YYYYMMDD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifact(String);

impl Artifact {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assembles the proposal from the three captured values and a date.
///
/// Pure function of its inputs. Callers supply the date so the render
/// itself stays deterministic and testable.
pub fn render(kind: &str, group: &str, filename: &str, date: NaiveDate) -> Artifact {
    Artifact(format!(
        "{}_{}_{}_{}",
        kind,
        group,
        filename,
        date.format("%Y%m%d")
    ))
}
