use std::path::PathBuf;

/// What one rank left behind after the launch.
///
/// For combined-output launchers `stdout_path` is the single per-rank file and the stderr fields stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankOutput {
    /// Rank within the launched group.
    pub rank: u32,
    /// Captured stdout (or combined) file, if the rank produced one.
    pub stdout_path: Option<PathBuf>,
    /// Last non-empty line of `stdout_path`.
    pub tail_line: Option<String>,
    /// Captured stderr file, for launchers that split streams.
    pub stderr_path: Option<PathBuf>,
    /// Last non-empty line of `stderr_path`.
    pub stderr_tail: Option<String>,
}

impl RankOutput {
    /// Entry for a rank that produced no output file at all.
    pub fn missing(rank: u32) -> Self {
        Self {
            rank,
            ..Default::default()
        }
    }

    /// Returns `true` if no output file was found for this rank.
    pub fn is_missing(&self) -> bool {
        self.stdout_path.is_none() && self.stderr_path.is_none()
    }
}
