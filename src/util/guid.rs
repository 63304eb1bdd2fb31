//! GUID generation for build files that need stably addressable entities.
//!
//! Solution and project dialects identify packages by GUID. There is no
//! cryptographic requirement here, only negligible collision probability
//! across the identifiers generated in a single run.

use uuid::Uuid;

/// Generate a canonical 8-4-4-4-12 hyphenated GUID, lowercase.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Generate an uppercase GUID for dialects that print them that way.
pub fn generate_upper() -> String {
    generate().to_uppercase()
}
