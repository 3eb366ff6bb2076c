//! Onion address rules.
//!
//! The only check performed is syntactic: the address must end with the
//! `.onion` top-level suffix. Nothing here decodes the v3 key or tries to
//! reach the service.

use crate::error::RegistryError;

/// Reserved top-level suffix for hidden-service addresses.
pub const ONION_SUFFIX: &str = ".onion";

/// Check that `address` looks like an onion hostname.
pub fn validate_onion_address(address: &str) -> Result<(), RegistryError> {
    if address.ends_with(ONION_SUFFIX) {
        Ok(())
    } else {
        Err(RegistryError::InvalidAddress)
    }
}
