//! Syntactic validation for S3 requests.
//!
//! Bucket-name rules follow the
//! [Amazon S3 naming documentation](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html);
//! object-key rules additionally reject path-traversal segments because keys
//! map directly onto filesystem paths.
//!
//! All checks are plain predicates. The dispatcher raises the matching S3
//! error code when one fails.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Validate an S3 bucket name.
///
/// Rules:
/// - 3-63 characters
/// - lowercase letters, digits, dots, and hyphens only
/// - starts and ends with a letter or digit
/// - no `..`, `.-`, or `-.` sequences
/// - not formatted as an IPv4 or IPv6 address
///
/// # Examples
///
/// ```
/// use silo_core::validation::is_valid_bucket_name;
///
/// assert!(is_valid_bucket_name("my-bucket"));
/// assert!(!is_valid_bucket_name("MyBucket"));
/// assert!(!is_valid_bucket_name("192.168.1.1"));
/// ```
#[must_use]
pub fn is_valid_bucket_name(name: &str) -> bool {
    let len = name.len();
    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return false;
    }

    let bytes = name.as_bytes();
    let is_alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();

    if !is_alnum(bytes[0]) || !is_alnum(bytes[len - 1]) {
        return false;
    }
    if !bytes.iter().all(|&b| is_alnum(b) || b == b'.' || b == b'-') {
        return false;
    }
    if name.contains("..") || name.contains(".-") || name.contains("-.") {
        return false;
    }
    if name.parse::<Ipv4Addr>().is_ok() || name.parse::<Ipv6Addr>().is_ok() {
        return false;
    }

    true
}

/// Validate an S3 object key.
///
/// The empty key is valid (bucket-level operations use it). Keys must not
/// contain NUL bytes, and no slash-delimited segment may be `.` or `..`:
/// keys become filesystem paths, so traversal segments are rejected outright.
///
/// # Examples
///
/// ```
/// use silo_core::validation::is_valid_object_key;
///
/// assert!(is_valid_object_key("photos/2024/image.jpg"));
/// assert!(is_valid_object_key(""));
/// assert!(!is_valid_object_key("photos/../secrets"));
/// ```
#[must_use]
pub fn is_valid_object_key(key: &str) -> bool {
    if key.contains('\0') {
        return false;
    }
    !key.split('/').any(|segment| segment == "." || segment == "..")
}

/// Parse a part number: a positive decimal integer with no sign.
///
/// # Examples
///
/// ```
/// use silo_core::validation::parse_part_number;
///
/// assert_eq!(parse_part_number("1"), Some(1));
/// assert_eq!(parse_part_number("0"), None);
/// assert_eq!(parse_part_number("+3"), None);
/// ```
#[must_use]
pub fn parse_part_number(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = value.parse::<u32>().ok()?;
    (number >= 1).then_some(number)
}
