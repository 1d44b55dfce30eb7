//! Minimal version-number readers for the semver rules.
//!
//! These are deliberately looser than [`super::version_format`]: they read a
//! version out of whatever the value starts with and ignore the rest.

/// Major component from a leading `v?\d+`.
pub fn leading_major(text: &str) -> Option<u64> {
    let (major, _) = take_number(strip_v(text.trim()))?;
    Some(major)
}

/// `(major, minor, patch)` from a leading `v?\d+.\d+.\d+`.
pub fn leading_triple(text: &str) -> Option<(u64, u64, u64)> {
    let (major, rest) = take_number(strip_v(text.trim()))?;
    let (minor, rest) = take_number(rest.strip_prefix('.')?)?;
    let (patch, _) = take_number(rest.strip_prefix('.')?)?;
    Some((major, minor, patch))
}

fn strip_v(text: &str) -> &str {
    text.strip_prefix('v').unwrap_or(text)
}

fn take_number(text: &str) -> Option<(u64, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let n = text[..end].parse().ok()?;
    Some((n, &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_reads_leading_digits() {
        assert_eq!(leading_major("1.2.3"), Some(1));
        assert_eq!(leading_major("v12"), Some(12));
        assert_eq!(leading_major("3.1-alpine"), Some(3));
        assert_eq!(leading_major("latest"), None);
        assert_eq!(leading_major(""), None);
    }

    #[test]
    fn triple_requires_three_parts() {
        assert_eq!(leading_triple("v1.9.0"), Some((1, 9, 0)));
        assert_eq!(leading_triple("2.0.0-rc.1"), Some((2, 0, 0)));
        assert_eq!(leading_triple("2.0"), None);
        assert_eq!(leading_triple("a.b.c"), None);
    }
}
