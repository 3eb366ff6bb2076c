//! CLI command modules.

pub mod communities;
pub mod http;
pub mod status;
