//! Small text helpers shared by the finalizer and the export path.

/// Lowercases `text` and joins its alphanumeric runs with `separator`.
///
/// Leading and trailing separators are never produced. Returns an empty
/// string when `text` has no alphanumeric characters.
#[must_use]
pub fn slugify(text: &str, separator: char) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(separator);
            }
            pending_separator = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Truncates to at most `max_chars` characters, on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Remote Work Productivity", '_'), "remote_work_productivity");
        assert_eq!(slugify("  AI: What's Next?! ", '-'), "ai-what-s-next");
        assert_eq!(slugify("Café Überblick", '-'), "café-überblick");
        assert_eq!(slugify("???", '_'), "");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
