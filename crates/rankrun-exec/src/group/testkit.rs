//! Shell stand-ins for real group launchers.
//!
//! Each script answers `--version` like its real counterpart and otherwise runs the command
//! once per rank, sequentially, with `RANK` exported and output redirected per the dialect's flags.
use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

pub(crate) const FAKE_OPENRTE: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "mpiexec (OpenRTE) 4.1.2"
  exit 0
fi
n=1
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -n) n="$2"; shift 2 ;;
    --output-filename) out="$2"; shift 2 ;;
    *) break ;;
  esac
done
status=0
r=0
while [ "$r" -lt "$n" ]; do
  RANK=$r "$@" > "$out.$r" 2>&1 || status=$?
  r=$((r + 1))
done
exit $status
"#;

pub(crate) const FAKE_HYDRA: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "HYDRA build details:"
  echo "    Version:                                 4.0.2"
  exit 0
fi
n=1
outp=""
errp=""
while [ $# -gt 0 ]; do
  case "$1" in
    -n) n="$2"; shift 2 ;;
    -outfile-pattern) outp="$2"; shift 2 ;;
    -errfile-pattern) errp="$2"; shift 2 ;;
    *) break ;;
  esac
done
status=0
r=0
while [ "$r" -lt "$n" ]; do
  o=$(printf '%s' "$outp" | sed "s/%r/$r/g")
  e=$(printf '%s' "$errp" | sed "s/%r/$r/g")
  RANK=$r "$@" > "$o" 2> "$e" || status=$?
  r=$((r + 1))
done
exit $status
"#;

/// Peer command: prints "OK", except rank 2 which prints a failure and exits 3.
pub(crate) const PEER_FAILS_ON_RANK_2: &str =
    r#"if [ "$RANK" = 2 ]; then echo "FAIL: assertion x"; exit 3; fi; echo OK"#;

/// Write an executable script and return its path.
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
