pub mod config;
pub mod controller;
pub mod source;
pub mod state;

pub use config::SamplingConfig;
pub use controller::{FrameSampler, SamplingRun};
pub use source::{MediaMetadata, MediaSource};
pub use state::SamplerState;
