use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Argument dialect spoken by the group launcher.
///
/// - `Hydra`: MPICH-style launcher; separate per-rank stdout/stderr patterns.
/// - `OpenRte`: Open MPI-style launcher; one combined per-rank output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuntimeFlavor {
    Hydra,
    OpenRte,
}

impl RuntimeFlavor {
    /// Substring in `<launcher> --version` output that identifies a Hydra launcher.
    pub const HYDRA_MARKER: &'static str = "HYDRA";

    /// Classify the text printed by the launcher's version command.
    pub fn from_version_output(text: &str) -> Self {
        if text.contains(Self::HYDRA_MARKER) {
            RuntimeFlavor::Hydra
        } else {
            RuntimeFlavor::OpenRte
        }
    }

    /// Whether this dialect writes stdout and stderr to separate files.
    pub const fn splits_streams(&self) -> bool {
        matches!(self, RuntimeFlavor::Hydra)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeFlavor::Hydra => "hydra",
            RuntimeFlavor::OpenRte => "openrte",
        }
    }
}

impl Default for RuntimeFlavor {
    fn default() -> Self {
        RuntimeFlavor::OpenRte
    }
}

impl FromStr for RuntimeFlavor {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hydra" | "mpich" => Ok(RuntimeFlavor::Hydra),
            "openrte" | "openmpi" | "ompi" => Ok(RuntimeFlavor::OpenRte),
            other => Err(ModelError::UnknownFlavor(other.to_string())),
        }
    }
}

impl fmt::Display for RuntimeFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
