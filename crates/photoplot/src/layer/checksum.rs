//! `.MD5` content hashes.
//!
//! The hash covers every byte written before the checksum line, with carriage
//! returns and line feeds removed, so it is independent of line endings.

use md5::{Digest, Md5};

const MARKER: &str = "%TF.MD5,";

/// Lowercase hex MD5 of `content` with CR and LF removed.
pub fn compute(content: &str) -> String {
    let mut hasher = Md5::new();
    for chunk in content.split(['\r', '\n']) {
        hasher.update(chunk.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Splits a rendered file into the part the checksum covers and the embedded value.
///
/// Returns `None` if the file has no checksum line.
pub fn embedded(content: &str) -> Option<(&str, &str)> {
    let start = content.rfind(MARKER)?;
    let rest = &content[start + MARKER.len()..];
    let end = rest.find("*%")?;
    Some((&content[..start], &rest[..end]))
}

/// Returns `true` if the embedded checksum matches the content before it.
pub fn verify(content: &str) -> bool {
    embedded(content).is_some_and(|(covered, value)| compute(covered) == value)
}

/// Project GUID derived from a name and revision, in 8-4-4-4-12 form.
pub fn project_guid(name: &str, revision: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(name.as_bytes());
    hasher.update(revision.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
