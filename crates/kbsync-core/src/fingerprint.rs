//! Content fingerprints for change detection
//!
//! A 32-bit rolling hash (`h * 31 + c` over UTF-16 code units) rendered as
//! lowercase hex of its absolute value. This is not a cryptographic digest:
//! a collision only costs one missed upload, which the next edit repairs.
//! The exact arithmetic matches ledgers written by earlier releases, so it
//! must not change.

/// Fingerprint recorded for empty content
pub const EMPTY_FINGERPRINT: &str = "0";

/// Compute the change-detection fingerprint of a document's content
pub fn fingerprint(content: &str) -> String {
    if content.is_empty() {
        return EMPTY_FINGERPRINT.to_string();
    }

    let hash = content.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });

    format!("{:x}", hash.unsigned_abs())
}
