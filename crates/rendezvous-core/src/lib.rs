//! rendezvous-core — shared types for the discovery registry.
//! Configuration, onion address rules, the clock abstraction and the error
//! taxonomy. All other Rendezvous crates depend on this one.

pub mod address;
pub mod clock;
pub mod config;
pub mod error;

pub use address::{validate_onion_address, ONION_SUFFIX};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RegistryError;
