//! Registry error taxonomy.
//!
//! Two classes: validation failures on Register, and lookups of an address
//! that is not in the registry. Both are final; the registry never retries.

/// Errors returned by registry operations.
///
/// Display strings are the messages clients see in `{"error": ...}` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid onion address")]
    InvalidAddress,
    #[error("Name is required")]
    NameRequired,
    #[error("Community not found. Please register again.")]
    NotFound,
}

impl RegistryError {
    /// True for malformed or missing input on Register.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidAddress | Self::NameRequired)
    }
}
