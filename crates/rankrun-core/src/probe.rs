//! Runtime flavor detection strategies.
use async_trait::async_trait;

use rankrun_model::RuntimeFlavor;

/// Classifies the local group launcher into a [`RuntimeFlavor`].
///
/// Detection is best effort and never fails: when the launcher cannot be inspected,
/// implementations answer [`RuntimeFlavor::default`].
#[async_trait]
pub trait FlavorProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn detect(&self) -> RuntimeFlavor;
}

/// Probe that always answers the configured flavor.
#[derive(Debug, Clone, Copy)]
pub struct StaticFlavor(pub RuntimeFlavor);

#[async_trait]
impl FlavorProbe for StaticFlavor {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn detect(&self) -> RuntimeFlavor {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_flavor_answers_configured_value() {
        assert_eq!(StaticFlavor(RuntimeFlavor::Hydra).detect().await, RuntimeFlavor::Hydra);
        assert_eq!(
            StaticFlavor(RuntimeFlavor::OpenRte).detect().await,
            RuntimeFlavor::OpenRte
        );
    }
}
