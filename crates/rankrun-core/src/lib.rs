pub mod aggregate;
pub mod collect;
pub mod config;
pub mod error;
pub mod harness;
pub mod launcher;
pub mod plan;
pub mod probe;

pub mod prelude {
    pub use crate::aggregate::{Summary, aggregate};
    pub use crate::collect::collect;
    pub use crate::config::{FlavorSetting, HarnessConfig, SuiteConfig};
    pub use crate::error::CoreError;
    pub use crate::harness::{Harness, HarnessState, RunRequest};
    pub use crate::launcher::{GroupLauncher, LaunchError};
    pub use crate::plan::PlanBuilder;
    pub use crate::probe::{FlavorProbe, StaticFlavor};
}
