//! Index name derivation helpers.

use uuid::Uuid;

/// Generate a collision-resistant concrete index name for a logical name.
///
/// The result is the logical name plus an 8-character random suffix, e.g.
/// `users-a1b2c3d4`.
pub fn unique_index_name(name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", name, &suffix[..8])
}

/// Derive the sentinel lock index name for a logical name.
pub fn lock_index_name(name: &str) -> String {
    format!("{}_migration", name)
}
