use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Test suite family launched under the group launcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuiteKind {
    /// Client-side suite.
    Plain,
    /// Suite whose tests talk to each other across ranks.
    Group,
}

impl SuiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteKind::Plain => "plain",
            SuiteKind::Group => "group",
        }
    }
}

/// One command of the harness.
///
/// Every operation except [`Operation::CoverageReport`] is a full
/// detect → plan → launch → collect → aggregate cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Plain,
    PlainCoverage,
    Group,
    GroupCoverage,
    CoverageReport,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Plain,
        Operation::PlainCoverage,
        Operation::Group,
        Operation::GroupCoverage,
        Operation::CoverageReport,
    ];

    /// Suite launched by this operation; `None` for the report.
    pub const fn suite(&self) -> Option<SuiteKind> {
        match self {
            Operation::Plain | Operation::PlainCoverage => Some(SuiteKind::Plain),
            Operation::Group | Operation::GroupCoverage => Some(SuiteKind::Group),
            Operation::CoverageReport => None,
        }
    }

    /// Whether the launched command runs under the coverage tool.
    pub const fn with_coverage(&self) -> bool {
        matches!(self, Operation::PlainCoverage | Operation::GroupCoverage)
    }

    /// Base name of the per-rank output files.
    ///
    /// Distinct per launching operation, so a plain run never reads a coverage run's files.
    pub fn base_name(&self) -> &'static str {
        self.as_str()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Plain => "plain",
            Operation::PlainCoverage => "plain-coverage",
            Operation::Group => "group",
            Operation::GroupCoverage => "group-coverage",
            Operation::CoverageReport => "coverage-report",
        }
    }
}

impl FromStr for Operation {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == norm)
            .ok_or_else(|| ModelError::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn launching_operations_have_distinct_base_names() {
        let names: HashSet<_> = Operation::ALL
            .iter()
            .filter(|op| op.suite().is_some())
            .map(|op| op.base_name())
            .collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn report_launches_nothing() {
        assert_eq!(Operation::CoverageReport.suite(), None);
        assert!(!Operation::CoverageReport.with_coverage());
    }

    #[test]
    fn coverage_variants_keep_their_suite() {
        assert_eq!(Operation::PlainCoverage.suite(), Some(SuiteKind::Plain));
        assert_eq!(Operation::GroupCoverage.suite(), Some(SuiteKind::Group));
        assert!(Operation::GroupCoverage.with_coverage());
        assert!(!Operation::Group.with_coverage());
    }

    #[test]
    fn parses_kebab_and_snake_case() {
        assert_eq!(
            "group-coverage".parse::<Operation>().unwrap(),
            Operation::GroupCoverage
        );
        assert_eq!(
            "Plain_Coverage".parse::<Operation>().unwrap(),
            Operation::PlainCoverage
        );
        assert!("lint".parse::<Operation>().is_err());
    }

    #[test]
    fn serde_matches_display() {
        for op in Operation::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{op}\""));
        }
    }
}
