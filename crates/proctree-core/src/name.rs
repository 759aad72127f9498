//! Segment naming for mirrored nodes.
//!
//! Display names coming out of the source tree are arbitrary strings and may
//! contain the hierarchy separator. Every name that reaches the namespace
//! goes through [`sanitize`], and mirrored nodes are labeled with
//! [`segment`], which prefixes the source identifier so that two processes
//! sharing a command name still get unique siblings (`"482.worker-pool"`).

/// The hierarchy separator that must never appear inside a single segment.
pub const SEPARATOR: char = '/';

/// Replacement character for separator occurrences.
pub const SEPARATOR_REPLACEMENT: char = '-';

/// Maximum length of a single path segment, in bytes.
///
/// Matches the conventional namespace limit for one entry name.
pub const MAX_SEGMENT_LEN: usize = 255;

/// Turns an arbitrary display string into a safe single path segment.
///
/// Every occurrence of [`SEPARATOR`] is replaced with
/// [`SEPARATOR_REPLACEMENT`] and the result is truncated to
/// [`MAX_SEGMENT_LEN`] bytes on a character boundary. Pure and total:
/// there is no failure mode, and the function is idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| {
            if c == SEPARATOR {
                SEPARATOR_REPLACEMENT
            } else {
                c
            }
        })
        .collect();
    truncate_to_boundary(&mut out, MAX_SEGMENT_LEN);
    out
}

/// Formats the boundary name for a mirrored node: `"{id}.{sanitized-name}"`.
///
/// The identifier prefix keeps sibling names unique even when two source
/// entities share a display name. The whole segment is subject to the same
/// length cap as [`sanitize`].
pub fn segment(id: u32, raw: &str) -> String {
    let mut out = format!("{id}.{}", sanitize(raw));
    truncate_to_boundary(&mut out, MAX_SEGMENT_LEN);
    out
}

/// Truncates `s` to at most `max` bytes without splitting a character.
fn truncate_to_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_separator() {
        assert_eq!(sanitize("a/b"), "a-b");
        assert_eq!(sanitize("/usr/bin/env"), "-usr-bin-env");
        assert!(!sanitize("///").contains(SEPARATOR));
    }

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(sanitize("init"), "init");
        assert_eq!(sanitize("worker pool"), "worker pool");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["a/b", "plain", "x/y/z", "trailing/", "émojis_🎉/x"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_truncates_to_limit() {
        let long = "x".repeat(MAX_SEGMENT_LEN * 2);
        assert_eq!(sanitize(&long).len(), MAX_SEGMENT_LEN);
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // Fill up to just below the limit, then a multi-byte char straddling it.
        let mut raw = "a".repeat(MAX_SEGMENT_LEN - 1);
        raw.push('🎉');
        let out = sanitize(&raw);
        assert!(out.len() <= MAX_SEGMENT_LEN);
        assert!(out.is_char_boundary(out.len()));
        assert_eq!(out, "a".repeat(MAX_SEGMENT_LEN - 1));
    }

    #[test]
    fn test_segment_format() {
        assert_eq!(segment(1, "init"), "1.init");
        assert_eq!(segment(482, "worker-pool"), "482.worker-pool");
    }

    #[test]
    fn test_segment_sanitizes_display_name() {
        assert_eq!(segment(7, "a/b"), "7.a-b");
    }

    #[test]
    fn test_segment_capped() {
        let long = "n".repeat(MAX_SEGMENT_LEN * 2);
        let out = segment(u32::MAX, &long);
        assert!(out.len() <= MAX_SEGMENT_LEN);
        assert!(out.starts_with("4294967295."));
    }
}
