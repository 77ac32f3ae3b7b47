use serde::{Deserialize, Serialize};

/// Lifecycle of a sampling walk.
///
/// `Idle -> MetadataReady -> Seeking -> Sampling -> (Seeking | Complete)`;
/// `LoadError` is only reachable from `Idle` or `MetadataReady`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SamplerState {
    #[default]
    Idle,
    MetadataReady,
    Seeking,
    Sampling,
    Complete,
    LoadError,
}

impl SamplerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SamplerState::Complete | SamplerState::LoadError)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: SamplerState) -> bool {
        use SamplerState::*;
        matches!(
            (self, next),
            (Idle, MetadataReady)
                | (Idle, LoadError)
                | (MetadataReady, Seeking)
                | (MetadataReady, LoadError)
                | (Seeking, Sampling)
                | (Seeking, Seeking)
                | (Seeking, Complete)
                | (Sampling, Seeking)
        )
    }
}
