//! Text capabilities consumed by the match strategies
//!
//! Every length and offset here is counted in Unicode scalar values, never
//! bytes, so multi-byte text measures the same as ASCII.
//!
//! - [`MarkupStripper`] removes tags from a fragment ([`TagStripper`] by default)
//! - [`AffixFinder`] measures common prefix/suffix runs ([`CharAffixFinder`] by default)

use std::borrow::Cow;

/// Characters removed by [`trim_fragment`]: space, tab, newline, carriage
/// return, NUL and vertical tab. Other Unicode whitespace is content.
const TRIM_CHARS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Codepoint length of `text`.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Trim leading and trailing whitespace from a fragment.
#[inline]
pub fn trim_fragment(text: &str) -> &str {
    text.trim_matches(|c: char| TRIM_CHARS.contains(&c))
}

/// Codepoint length of the longest common prefix of `a` and `b`.
#[inline]
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Codepoint length of the longest common suffix of `a` and `b`.
///
/// Computed independently of the prefix: for near-identical strings the two
/// runs may overlap.
#[inline]
pub fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Removes markup tags from a fragment, leaving plain text content.
///
/// Implementations must be deterministic and side-effect free.
pub trait MarkupStripper: Send + Sync {
    /// Strip all tags from `text`. Borrows the input when nothing was removed.
    fn strip<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Default HTML tag stripper.
///
/// - `<` followed by a non-whitespace character opens a tag, which runs to the
///   next `>` outside single or double quotes
/// - `<!-- ... -->` comments are removed whole
/// - an unterminated tag or comment swallows the rest of the input
/// - `<` followed by whitespace is literal text (`a < b` survives)
#[derive(Debug, Clone, Copy, Default)]
pub struct TagStripper;

impl MarkupStripper for TagStripper {
    fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains('<') {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find('<') {
            out.push_str(&rest[..open]);
            let tail = &rest[open + 1..];

            match tail.chars().next() {
                Some(c) if c.is_ascii_whitespace() => {
                    out.push('<');
                    rest = tail;
                }
                _ if tail.starts_with("!--") => {
                    rest = match tail[3..].find("-->") {
                        Some(end) => &tail[3 + end + 3..],
                        None => "",
                    };
                }
                _ => {
                    rest = match tag_end(tail) {
                        Some(end) => &tail[end + 1..],
                        None => "",
                    };
                }
            }
        }

        out.push_str(rest);
        Cow::Owned(out)
    }
}

/// Byte offset of the `>` closing a tag body, skipping quoted attribute values.
fn tag_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in body.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(idx),
            None => {}
        }
    }
    None
}

/// Finds the common prefix and suffix shared by two fragments.
pub trait AffixFinder: Send + Sync {
    /// Codepoint length of the longest shared prefix.
    fn common_prefix_len(&self, a: &str, b: &str) -> usize;

    /// Codepoint length of the longest shared suffix, independent of the prefix.
    fn common_suffix_len(&self, a: &str, b: &str) -> usize;
}

/// Codepoint-by-codepoint affix comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharAffixFinder;

impl AffixFinder for CharAffixFinder {
    fn common_prefix_len(&self, a: &str, b: &str) -> usize {
        common_prefix_len(a, b)
    }

    fn common_suffix_len(&self, a: &str, b: &str) -> usize {
        common_suffix_len(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip(text: &str) -> String {
        TagStripper.strip(text).into_owned()
    }

    #[test]
    fn test_char_len_counts_codepoints() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len("日本語"), 3);
    }

    #[test]
    fn test_trim_fragment() {
        assert_eq!(trim_fragment("  \t hello\r\n"), "hello");
        assert_eq!(trim_fragment("\x0Bhello\0"), "hello");
        assert_eq!(trim_fragment("   "), "");
        // Non-breaking space is content
        assert_eq!(trim_fragment("\u{a0}x"), "\u{a0}x");
    }

    #[test]
    fn test_strip_simple_tags() {
        assert_eq!(strip("<b>hello</b>"), "hello");
        assert_eq!(strip("<p class=\"x\">one <em>two</em></p>"), "one two");
        assert_eq!(strip("<br/>line"), "line");
    }

    #[test]
    fn test_strip_borrows_plain_text() {
        assert!(matches!(TagStripper.strip("no markup"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_quoted_angle_bracket() {
        assert_eq!(strip("<a title=\"a > b\">link</a>"), "link");
        assert_eq!(strip("<a title='x>y'>link</a>"), "link");
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip("a<!-- <b>hidden</b> -->b"), "ab");
        assert_eq!(strip("a<!-- never closed"), "a");
    }

    #[test]
    fn test_strip_literal_less_than() {
        assert_eq!(strip("1 < 2"), "1 < 2");
        assert_eq!(strip("<b>1 < 2</b>"), "1 < 2");
    }

    #[test]
    fn test_strip_unterminated_tag() {
        assert_eq!(strip("text<span"), "text");
        assert_eq!(strip("text<"), "text");
    }

    #[test]
    fn test_strip_multibyte() {
        assert_eq!(strip("<li>日本語</li>"), "日本語");
    }

    #[test]
    fn test_common_prefix_and_suffix() {
        assert_eq!(common_prefix_len("Item: Apple", "Item: Apple (fresh)"), 11);
        assert_eq!(common_suffix_len("Item: Apple", "Item: Apple (fresh)"), 0);
        assert_eq!(common_suffix_len("Apples", "Bicycles"), 3);
        assert_eq!(common_prefix_len("", "abc"), 0);
    }

    #[test]
    fn test_affixes_may_overlap() {
        let finder = CharAffixFinder;
        assert_eq!(finder.common_prefix_len("aa", "aaa"), 2);
        assert_eq!(finder.common_suffix_len("aa", "aaa"), 2);
    }

    #[test]
    fn test_affixes_count_codepoints() {
        assert_eq!(common_prefix_len("日本語です", "日本語だ"), 3);
        assert_eq!(common_suffix_len("über", "aber"), 3);
    }
}
