//! Folder-name sanitization.

use crate::consts::{CONTROL_CHARS, ILLEGAL_CHARS, WHITESPACE};

/// Maximum length, in characters, of a sanitized folder name under the
/// strict retention policy.
pub const MAX_NAME_LEN: usize = 63;

/// Turns an arbitrary title string into a filesystem-safe folder name.
///
/// Rules, applied in order:
/// 1. each of `\ / : * ? " < > | &` becomes `_`;
/// 2. ASCII control characters (0–31) are removed;
/// 3. characters outside the Basic Multilingual Plane are removed — these
///    round-trip as surrogate pairs on UTF-16 filesystems and some hosts
///    cannot store them at all;
/// 4. every whitespace run is deleted outright, not collapsed to a space;
/// 5. when `max_len` is given, the result is truncated to that many
///    characters.
///
/// Never fails: the output may be empty, which callers must tolerate as a
/// degenerate but valid title. Applying the function twice is a no-op.
///
/// # Examples
///
/// ```
/// use wallshard_library::sanitize_name;
///
/// assert_eq!(sanitize_name("Neon City: Rain?", None), "NeonCity_Rain_");
/// assert_eq!(sanitize_name("ab cd", Some(3)), "abc");
/// ```
pub fn sanitize_name(name: &str, max_len: Option<usize>) -> String {
    let name = ILLEGAL_CHARS.replace_all(name, "_");
    let name = CONTROL_CHARS.replace_all(&name, "");
    let name: String = name.chars().filter(|c| (*c as u32) <= 0xFFFF).collect();
    let name = WHITESPACE.replace_all(&name, "");
    match max_len {
        Some(cap) => name.chars().take(cap).collect(),
        None => name.into_owned(),
    }
}
