//! Per-rank output collection.
//!
//! Runs only after the launcher has confirmed termination of the whole group; the files are
//! written by the peers and only read here.
use std::{
    collections::{BTreeMap, btree_map::Entry},
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use tracing::{debug, trace, warn};

use rankrun_model::{OutputTemplate, RankOutput, Stream};

/// Read window used when scanning a file backwards for its last line.
const TAIL_CHUNK: u64 = 4096;

/// Upper bound on the bytes kept for a single tail line.
const MAX_TAIL_BYTES: usize = 64 * 1024;

/// Locate every rank's output files and read their last lines.
///
/// The result is ascending by rank (numerically) and always has an entry for each rank in
/// `0..worker_count`; ranks without a file are reported with everything absent. Files for ranks
/// beyond `worker_count` are reported too. Unreadable files and a missing output directory
/// degrade to absent entries instead of failing.
pub fn collect(template: &OutputTemplate, worker_count: u32) -> Vec<RankOutput> {
    let mut ranks: BTreeMap<u32, RankOutput> = (0..worker_count)
        .map(|rank| (rank, RankOutput::missing(rank)))
        .collect();

    let dir = template.output_dir();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "output directory does not exist");
            return ranks.into_values().collect();
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot scan output directory");
            return ranks.into_values().collect();
        }
    };

    // One candidate per (rank, stream); among duplicates the highest job id wins.
    let mut found: BTreeMap<(u32, bool), (Vec<u64>, PathBuf)> = BTreeMap::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some((rank, stream)) = template.parse_file_name(name) else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_stderr = stream == Some(Stream::Stderr);
        let candidate = (job_key(template, name), path);
        match found.entry((rank, is_stderr)) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                let ignored = if candidate > *slot.get() {
                    slot.insert(candidate)
                } else {
                    candidate
                };
                warn!(
                    rank,
                    kept = %slot.get().1.display(),
                    ignored = %ignored.1.display(),
                    "several output files for one rank"
                );
            }
        }
    }

    for ((rank, is_stderr), (_, path)) in found {
        let tail = match tail_line(&path) {
            Ok(tail) => tail,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read rank output");
                None
            }
        };
        trace!(rank, path = %path.display(), tail = ?tail, "rank output found");

        let slot = ranks
            .entry(rank)
            .or_insert_with(|| RankOutput::missing(rank));
        if is_stderr {
            slot.stderr_path = Some(path);
            slot.stderr_tail = tail;
        } else {
            slot.stdout_path = Some(path);
            slot.tail_line = tail;
        }
    }

    ranks.into_values().collect()
}

/// Numeric job id components between the template stem and the rank; empty for `<prefix>.<rank>`.
fn job_key(template: &OutputTemplate, name: &str) -> Vec<u64> {
    let rest = name
        .strip_prefix(template.file_stem().as_str())
        .and_then(|r| r.strip_prefix('.'))
        .unwrap_or_default();
    let mut parts: Vec<&str> = rest.split('.').collect();
    if parts.last().is_some_and(|p| p.parse::<u64>().is_err()) {
        parts.pop();
    }
    parts.pop();
    parts
        .iter()
        .map(|p| p.parse().unwrap_or(u64::MAX))
        .collect()
}

/// Last non-empty line of a file, read backwards from the end.
///
/// Trailing line breaks are skipped; `None` means the file holds nothing but line breaks.
/// Lines longer than 64 KiB are cut to their final 64 KiB.
pub fn tail_line(path: &Path) -> io::Result<Option<String>> {
    let mut file = File::open(path)?;
    let mut pos = file.metadata()?.len();
    let mut buf: Vec<u8> = Vec::new();

    while pos > 0 {
        let step = TAIL_CHUNK.min(pos);
        pos -= step;
        file.seek(SeekFrom::Start(pos))?;

        let mut chunk = vec![0u8; step as usize];
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&buf);
        buf = chunk;

        let content_end = buf
            .iter()
            .rposition(|b| !matches!(b, b'\n' | b'\r'))
            .map_or(0, |i| i + 1);
        buf.truncate(content_end);
        if buf.is_empty() {
            continue;
        }

        if let Some(nl) = buf.iter().rposition(|b| *b == b'\n') {
            buf.drain(..=nl);
            return Ok(Some(decode_line(buf)));
        }
        if buf.len() >= MAX_TAIL_BYTES {
            let cut = buf.len() - MAX_TAIL_BYTES;
            buf.drain(..cut);
            return Ok(Some(decode_line(buf)));
        }
    }

    if buf.is_empty() {
        Ok(None)
    } else {
        Ok(Some(decode_line(buf)))
    }
}

fn decode_line(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}
