//! Folds the group exit status and per-rank output into one [`RunResult`].
use std::{fmt, path::Path};

use rankrun_model::{RankOutput, RunResult};

/// Combine the launcher's exit code with the collected per-rank output.
///
/// The exit code is taken verbatim: per-rank detail is informational and never overrides the
/// group-level signal. Ranks are ordered ascending.
pub fn aggregate(exit_code: i32, mut per_rank: Vec<RankOutput>) -> RunResult {
    per_rank.sort_by_key(|r| r.rank);
    RunResult {
        exit_code,
        per_rank,
    }
}

/// Human-readable, greppable rendering of a [`RunResult`].
///
/// Each file gets a `==> <path> <==` marker line followed by its tail line; ranks without a
/// file get a `==> rank <r>: no output file <==` marker. The last line is the verdict.
pub struct Summary<'a>(pub &'a RunResult);

impl Summary<'_> {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        for rank in &result.per_rank {
            if rank.is_missing() {
                writeln!(f, "==> rank {}: no output file <==", rank.rank)?;
                continue;
            }
            if let Some(path) = &rank.stdout_path {
                write_block(f, path, rank.tail_line.as_deref())?;
            }
            if let Some(path) = &rank.stderr_path {
                write_block(f, path, rank.stderr_tail.as_deref())?;
            }
        }

        let verdict = if result.passed() { "PASS" } else { "FAIL" };
        write!(
            f,
            "{} rank(s), group exit code {}: {verdict}",
            result.per_rank.len(),
            result.exit_code
        )
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, path: &Path, tail: Option<&str>) -> fmt::Result {
    writeln!(f, "==> {} <==", path.display())?;
    writeln!(f, "{}", tail.unwrap_or("<empty>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ok_rank(rank: u32) -> RankOutput {
        RankOutput {
            rank,
            stdout_path: Some(PathBuf::from(format!("out/py3-group.{rank}"))),
            tail_line: Some("OK".into()),
            ..Default::default()
        }
    }

    #[test]
    fn exit_code_is_never_overridden() {
        let cases: Vec<(i32, Vec<RankOutput>)> = vec![
            (0, vec![]),
            (0, vec![RankOutput::missing(0), RankOutput::missing(1)]),
            (1, vec![ok_rank(0), ok_rank(1)]),
            (137, vec![ok_rank(0)]),
            (-1, vec![RankOutput::missing(5)]),
        ];
        for (code, ranks) in cases {
            assert_eq!(aggregate(code, ranks).exit_code, code);
        }
    }

    #[test]
    fn ranks_are_sorted() {
        let result = aggregate(0, vec![ok_rank(10), ok_rank(2), ok_rank(1)]);
        let ranks: Vec<u32> = result.per_rank.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, [1, 2, 10]);
    }

    #[test]
    fn summary_lists_files_and_missing_ranks() {
        let mut empty = ok_rank(2);
        empty.tail_line = None;
        let result = aggregate(3, vec![ok_rank(0), RankOutput::missing(1), empty]);

        let text = Summary(&result).render();
        let expected = "\
==> out/py3-group.0 <==
OK
==> rank 1: no output file <==
==> out/py3-group.2 <==
<empty>
3 rank(s), group exit code 3: FAIL";
        assert_eq!(text, expected);
    }

    #[test]
    fn summary_shows_both_streams() {
        let rank = RankOutput {
            rank: 0,
            stdout_path: Some(PathBuf::from("out/py3-group.0.stdout")),
            tail_line: Some("hello".into()),
            stderr_path: Some(PathBuf::from("out/py3-group.0.stderr")),
            stderr_tail: Some("OK".into()),
        };
        let result = aggregate(0, vec![rank]);

        let text = Summary(&result).render();
        assert!(text.contains("==> out/py3-group.0.stdout <==\nhello\n"));
        assert!(text.contains("==> out/py3-group.0.stderr <==\nOK\n"));
        assert!(text.ends_with("1 rank(s), group exit code 0: PASS"));
    }
}
