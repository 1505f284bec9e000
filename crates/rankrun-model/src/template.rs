use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::{ModelError, ModelResult};

/// Output stream of a single rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "stdout" => Some(Stream::Stdout),
            "stderr" => Some(Stream::Stderr),
            _ => None,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the ranks of one launch write their output.
///
/// Every per-rank file lives in `output_dir` and starts with `<version_tag>-<base_name>.`:
/// - `<prefix>.<rank>` (combined, Open MPI style; `<prefix>.<jobid>.<rank>` is accepted too);
/// - `<prefix>.<rank>.stdout` / `<prefix>.<rank>.stderr` (Hydra style).
///
/// Two launches that may run at the same time must use templates with different prefixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTemplate {
    output_dir: PathBuf,
    version_tag: String,
    base_name: String,
}

impl OutputTemplate {
    /// Create a template after checking that the name parts are usable as a file name prefix.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        version_tag: impl Into<String>,
        base_name: impl Into<String>,
    ) -> ModelResult<Self> {
        let tpl = Self {
            output_dir: output_dir.into(),
            version_tag: version_tag.into(),
            base_name: base_name.into(),
        };
        tpl.validate()?;
        Ok(tpl)
    }

    fn validate(&self) -> ModelResult<()> {
        for (field, value) in [
            ("version_tag", &self.version_tag),
            ("base_name", &self.base_name),
        ] {
            if value.trim().is_empty() {
                return Err(ModelError::InvalidTemplate(format!("{field} is empty")));
            }
            if value.contains(['/', '\\']) {
                return Err(ModelError::InvalidTemplate(format!(
                    "{field} must not contain path separators: {value:?}"
                )));
            }
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ModelError::InvalidTemplate("output_dir is empty".into()));
        }
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn version_tag(&self) -> &str {
        &self.version_tag
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// File name prefix without the directory: `<version_tag>-<base_name>`.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.version_tag, self.base_name)
    }

    /// Full path prefix: `<output_dir>/<version_tag>-<base_name>`.
    pub fn prefix(&self) -> PathBuf {
        self.output_dir.join(self.file_stem())
    }

    /// Combined output file of one rank.
    pub fn rank_file(&self, rank: u32) -> PathBuf {
        self.output_dir.join(format!("{}.{rank}", self.file_stem()))
    }

    /// Single-stream output file of one rank.
    pub fn stream_file(&self, rank: u32, stream: Stream) -> PathBuf {
        self.output_dir
            .join(format!("{}.{rank}.{stream}", self.file_stem()))
    }

    /// Per-rank file pattern understood by Hydra (`%r` expands to the rank).
    pub fn hydra_pattern(&self, stream: Stream) -> String {
        format!("{}.%r.{stream}", self.prefix().display())
    }

    /// Returns `true` if `file_name` belongs to this template (current or stale run).
    pub fn owns(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(&self.file_stem())
            .is_some_and(|rest| rest.starts_with('.'))
    }

    /// Extract the rank (and stream, for split files) from a file name produced under this template.
    ///
    /// Returns `None` for files that belong to a different template or do not end in a rank.
    pub fn parse_file_name(&self, file_name: &str) -> Option<(u32, Option<Stream>)> {
        let stem = self.file_stem();
        let rest = file_name.strip_prefix(stem.as_str())?.strip_prefix('.')?;

        if let Some((rank, suffix)) = rest.rsplit_once('.') {
            if let Some(stream) = Stream::from_suffix(suffix) {
                return parse_rank(rank).map(|r| (r, Some(stream)));
            }
        }

        // `<rank>` or `<jobid>.<rank>`.
        let mut parts = rest.split('.').rev();
        let rank = parts.next().and_then(parse_rank)?;
        if parts.all(|p| parse_rank(p).is_some()) {
            Some((rank, None))
        } else {
            None
        }
    }
}

impl fmt::Display for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.*", self.prefix().display())
    }
}

fn parse_rank(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tpl() -> OutputTemplate {
        OutputTemplate::new(".mpi_out", "py3", "group").unwrap()
    }

    #[test]
    fn prefix_and_paths() {
        let t = tpl();
        assert_eq!(t.file_stem(), "py3-group");
        assert_eq!(t.prefix(), PathBuf::from(".mpi_out/py3-group"));
        assert_eq!(t.rank_file(3), PathBuf::from(".mpi_out/py3-group.3"));
        assert_eq!(
            t.stream_file(0, Stream::Stderr),
            PathBuf::from(".mpi_out/py3-group.0.stderr")
        );
        assert_eq!(t.hydra_pattern(Stream::Stdout), ".mpi_out/py3-group.%r.stdout");
    }

    #[test]
    fn rejects_bad_name_parts() {
        assert!(OutputTemplate::new("out", "", "group").is_err());
        assert!(OutputTemplate::new("out", "py3", "  ").is_err());
        assert!(OutputTemplate::new("out", "py3", "a/b").is_err());
        assert!(OutputTemplate::new("", "py3", "group").is_err());
    }

    #[test]
    fn parses_combined_and_split_names() {
        let t = tpl();
        assert_eq!(t.parse_file_name("py3-group.7"), Some((7, None)));
        assert_eq!(t.parse_file_name("py3-group.1.12"), Some((12, None)));
        assert_eq!(
            t.parse_file_name("py3-group.10.stdout"),
            Some((10, Some(Stream::Stdout)))
        );
        assert_eq!(
            t.parse_file_name("py3-group.2.stderr"),
            Some((2, Some(Stream::Stderr)))
        );
    }

    #[test]
    fn ignores_foreign_names() {
        let t = tpl();
        for name in [
            "py3-group",
            "py3-group.",
            "py3-group.x",
            "py3-group.1.log",
            "py3-group-coverage.1",
            "py2-group.1",
            "py3-group.-1",
            "py3-group.a.1",
        ] {
            assert_eq!(t.parse_file_name(name), None, "{name} should not match");
        }
    }

    #[test]
    fn owns_matches_only_dotted_suffix() {
        let t = tpl();
        assert!(t.owns("py3-group.0"));
        assert!(t.owns("py3-group.0.stdout"));
        assert!(!t.owns("py3-group-coverage.0"));
        assert!(!t.owns("py3-group"));
    }
}
