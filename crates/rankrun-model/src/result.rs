use crate::RankOutput;

/// Outcome of one harness run.
///
/// `exit_code` is the group launcher's own exit status; `per_rank` is diagnostic detail only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    pub exit_code: i32,
    /// Ascending by rank.
    pub per_rank: Vec<RankOutput>,
}

impl RunResult {
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }

    /// Ranks for which no output file was found.
    pub fn missing_ranks(&self) -> impl Iterator<Item = u32> + '_ {
        self.per_rank
            .iter()
            .filter(|r| r.is_missing())
            .map(|r| r.rank)
    }
}
