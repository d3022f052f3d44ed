//! Line-level markdown handling for the finalizer.
//!
//! Only ATX headings (`#` .. `######`) are recognised. Lines inside fenced
//! code blocks are never treated as headings, placeholders or front matter.

use regex::Regex;
use std::sync::LazyLock;

/// Canonical table-of-contents placeholder.
pub const TOC_PLACEHOLDER: &str = "[TOC]";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").expect("valid heading regex"));

static TOC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^(?:
            \[\[?\s*toc\s*\]\]?
          | <!--\s*(?:toc|table\ of\ contents)(?:\ placeholder)?\s*-->
          | \{:\s*\.?toc\s*\}
          | [\[(*_]*\s*(?:table\ of\ contents|toc)\s*(?:placeholder)?\s*[\])*_]*:?
        )$",
    )
    .expect("valid toc regex")
});

/// Returns true for an opening or closing code fence line.
pub fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Removes a code fence that wraps the whole text.
///
/// Only a bare, `markdown` or `md` fence is unwrapped, and only when the
/// fences inside it are balanced and the wrapped text has a heading, so a
/// document that merely starts and ends with code blocks is left alone.
pub fn unwrap_outer_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some((open, rest)) = trimmed.split_once('\n') else {
        return text;
    };
    let open = open.trim_end();
    let Some(marker) = open.chars().next().filter(|c| *c == '`' || *c == '~') else {
        return text;
    };
    let ticks = open.chars().take_while(|c| *c == marker).count();
    let info = open[ticks..].trim();
    if ticks < 3 || !(info.is_empty() || info.eq_ignore_ascii_case("markdown") || info.eq_ignore_ascii_case("md")) {
        return text;
    }

    let Some((inner, close)) = rest.rsplit_once('\n') else {
        return text;
    };
    let close = close.trim();
    let closes = close.len() >= ticks && close.chars().all(|c| c == marker);
    let balanced = inner.lines().filter(|line| is_fence(line)).count() % 2 == 0;
    if closes && balanced && !headings(inner).is_empty() {
        inner
    } else {
        text
    }
}

/// Parses an ATX heading into its level and text.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING.captures(line.trim_end())?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str();
    (!text.is_empty()).then_some((level, text))
}

/// Returns true for a table-of-contents placeholder line. Headings never
/// count as placeholders.
pub fn is_toc_placeholder(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.starts_with('#') && TOC_LINE.is_match(trimmed)
}

/// Pairs each line with whether it sits inside a fenced code block.
///
/// Fence lines themselves are reported as outside.
pub fn classify_lines(text: &str) -> Vec<(&str, bool)> {
    let mut in_fence = false;
    text.lines()
        .map(|line| {
            if is_fence(line) {
                in_fence = !in_fence;
                (line, false)
            } else {
                (line, in_fence)
            }
        })
        .collect()
}

/// Collects every heading outside code fences, as `(level, text)`.
pub fn headings(text: &str) -> Vec<(usize, String)> {
    classify_lines(text)
        .into_iter()
        .filter(|(_, fenced)| !fenced)
        .filter_map(|(line, _)| heading(line))
        .map(|(level, text)| (level, text.trim().to_string()))
        .collect()
}

/// Removes a leading YAML front matter block.
///
/// The block is only removed when its body parses as a non-empty YAML
/// mapping, so a leading horizontal rule is left alone.
pub fn strip_front_matter(text: &str) -> &str {
    let body = text.trim_start_matches(['\n', '\r', ' ', '\t']);
    let Some(rest) = body.strip_prefix("---") else {
        return text;
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return text;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let bare = line.trim_end();
        if bare == "---" || bare == "..." {
            let yaml = &rest[..offset];
            let is_mapping = serde_yaml::from_str::<serde_yaml::Mapping>(yaml)
                .map(|m| !m.is_empty())
                .unwrap_or(false);
            return if is_mapping {
                &rest[offset + line.len()..]
            } else {
                text
            };
        }
        offset += line.len();
    }
    text
}

/// Normalises whitespace outside code fences.
///
/// Trailing whitespace is trimmed, runs of blank lines collapse to one,
/// leading and trailing blank lines are dropped and the result ends with a
/// single newline. Fenced code is kept as written.
pub fn normalize(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
            out.push(line.trim_end());
            continue;
        }
        if in_fence {
            out.push(line);
            continue;
        }
        let line = line.trim_end();
        if line.is_empty() && out.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    if out.is_empty() {
        return String::new();
    }
    let mut joined = out.join("\n");
    joined.push('\n');
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        assert_eq!(heading("# Title"), Some((1, "Title")));
        assert_eq!(heading("### Deep dive ##"), Some((3, "Deep dive")));
        assert_eq!(heading("# Learn C#"), Some((1, "Learn C#")));
        assert_eq!(heading("#hashtag"), None);
        assert_eq!(heading("####### seven"), None);
        assert_eq!(heading("#   "), None);
    }

    #[test]
    fn test_toc_placeholders() {
        for line in [
            "[TOC]",
            "[[TOC]]",
            "<!-- TOC -->",
            "{:toc}",
            "[Table of Contents]",
            "(Table of contents placeholder)",
            "*Table of Contents placeholder*",
            "  [toc]  ",
        ] {
            assert!(is_toc_placeholder(line), "{line}");
        }
        assert!(!is_toc_placeholder("## Table of Contents"));
        assert!(!is_toc_placeholder("See the table of contents below."));
    }

    #[test]
    fn test_headings_skip_code() {
        let text = "# Title\n\n```bash\n# not a heading\n```\n\n## Section\n";
        assert_eq!(
            headings(text),
            vec![(1, "Title".to_string()), (2, "Section".to_string())]
        );
    }

    #[test]
    fn test_strip_front_matter() {
        let text = "---\ntitle: Hello\nslug: hello\n---\n# Hello\n";
        assert_eq!(strip_front_matter(text), "# Hello\n");

        let rule = "---\nJust a rule\n---\n# Hello\n";
        assert_eq!(strip_front_matter(rule), rule);

        let plain = "# Hello\n---\n";
        assert_eq!(strip_front_matter(plain), plain);
    }

    #[test]
    fn test_unwrap_outer_fence() {
        let wrapped = "```markdown\n# Title\n\n```bash\nls\n```\n\nBody\n```\n";
        assert_eq!(unwrap_outer_fence(wrapped), "# Title\n\n```bash\nls\n```\n\nBody");
        assert_eq!(unwrap_outer_fence("\n~~~md\n# Title\n~~~\n"), "# Title");
        assert_eq!(unwrap_outer_fence("```\n# Title\n```"), "# Title");

        for untouched in [
            "```python\nprint(1)\n```\n",
            "```bash\nls\n```\n\nText\n\n```bash\npwd\n```\n",
            "```\nls\n```\n\nText\n\n```\npwd\n```\n",
            "# Title\n\nBody\n",
            "```markdown\n# Unclosed\n",
        ] {
            assert_eq!(unwrap_outer_fence(untouched), untouched);
        }
    }

    #[test]
    fn test_normalize() {
        let text = "\n\n# Title   \n\n\n\nBody\t\n\n```\ncode  \n\n\nmore\n```\n\n\n";
        assert_eq!(normalize(text), "# Title\n\nBody\n\n```\ncode  \n\n\nmore\n```\n");
        assert_eq!(normalize(&normalize(text)), normalize(text));
        assert_eq!(normalize("  \n\n"), "");
    }
}
