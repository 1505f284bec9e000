mod error;
pub use error::{ModelError, ModelResult};

mod flavor;
pub use flavor::RuntimeFlavor;

mod template;
pub use template::{OutputTemplate, Stream};

mod plan;
pub use plan::LaunchPlan;

mod rank;
pub use rank::RankOutput;

mod result;
pub use result::RunResult;

mod operation;
pub use operation::{Operation, SuiteKind};
