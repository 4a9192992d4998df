use std::path::Path;

use rsb_core::errors::RsbError;

/// Freestanding C++ preamble: fixed-width aliases, an `is_same` shim and the
/// non-inlinable `use` transform every generated function calls.
pub const PREAMBLE: &str = include_str!("../assets/preamble.cxx");

/// Reads a replacement preamble, or returns the built-in one.
pub fn load_preamble(path: Option<&Path>) -> Result<String, RsbError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|err| RsbError::io(path, err)),
        None => Ok(PREAMBLE.to_string()),
    }
}
