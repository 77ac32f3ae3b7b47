//! Live session mode: a cancellable polling loop over a live source.

pub mod config;
pub mod controller;
pub mod history;
mod loop_worker;
pub mod source;
pub mod status;

pub use config::{PollingConfig, UndersizedPolicy};
pub use controller::{PollingHandle, SessionController, SessionReport};
pub use history::{RecentHistory, TrendPoint};
pub use source::LiveSource;
pub use status::{Connectivity, LiveStatus};
