//! rendezvous-services — the community registry and its reaper.

pub mod reaper;
pub mod registry;

pub use reaper::Reaper;
pub use registry::{new_registry, Community, Registry, SharedRegistry};
