mod error;
pub use error::ExecError;

mod utils;
pub use utils::{exit_code, resolve_program};

mod process;

pub mod group;
pub use group::{MpiexecLauncher, VersionProbe};

mod report;
pub use report::CoverageReporter;
