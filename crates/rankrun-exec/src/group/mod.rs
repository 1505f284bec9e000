//! Group launcher integration (`mpiexec` and compatible).
//!
//! Provides the OS-facing implementations of the `rankrun_core` seams:
//! [`VersionProbe`] for flavor detection and [`MpiexecLauncher`] for running a plan.
mod launcher;
mod output;
mod probe;

#[cfg(all(test, unix))]
mod testkit;

pub use launcher::MpiexecLauncher;
pub use probe::VersionProbe;
