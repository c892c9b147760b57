//! Test helpers for generating unique test data
//!
//! ULID-based values keep tests that share an in-memory store from colliding
//! on emails or filenames.

use ulid::Ulid;

/// Generate a unique string in the format `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("doc");
/// let b = unique_str("doc");
/// assert_ne!(a, b);
/// assert!(a.starts_with("doc-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address in the format `{prefix}-{ulid}@example.test`
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("signup");
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}

/// Generate a unique PDF-looking filename
pub fn unique_filename(prefix: &str) -> String {
    format!("{}.pdf", unique_str(prefix))
}
