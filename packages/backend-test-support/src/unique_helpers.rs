//! Unique fixture values so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `{prefix}-{ulid}@minesafe.test`
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("miner");
/// let b = unique_email("miner");
/// assert_ne!(a, b);
/// assert!(a.ends_with("@minesafe.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@minesafe.test", prefix.to_lowercase(), Ulid::new())
}
