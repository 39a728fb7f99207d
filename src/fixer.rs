use regex::Regex;
use tracing::debug;

use crate::error::{FixerError, Result};

/// A single issue-key occurrence located in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueKeyMatch {
    /// The full matched substring, e.g. `"fOo-1234"`.
    pub text: String,
    /// The prefix as it appeared in the text, e.g. `"fOo"`.
    pub prefix: String,
    /// The digit run, e.g. `"1234"`.
    pub number: String,
    /// Byte offset of the match start in the scanned text.
    pub offset: usize,
}

impl IssueKeyMatch {
    /// The canonical rendering of this key: `UPPERCASE(prefix)-number`.
    pub fn canonical(&self) -> String {
        format!("{}-{}", self.prefix.to_uppercase(), self.number)
    }
}

/// Locates and corrects improperly formatted issue keys in a single string.
///
/// Given a set of known prefixes, a candidate key is a prefix (matched
/// case-insensitively) followed by exactly one separator character that is
/// not an ASCII letter or digit, followed by one or more digits. A candidate
/// is rejected when the prefix is immediately preceded by a lowercase letter
/// (it is then part of a larger word) or when the digit run is immediately
/// followed by an uppercase letter (it is then part of a larger token).
///
/// One `Fixer` instance is tied to one input text. [`Fixer::next_match`]
/// scans forward call-by-call; [`Fixer::fix`] rewrites the whole text in one
/// pass regardless of where the scan cursor sits.
pub struct Fixer {
    raw: String,
    re: Option<Regex>,
    cursor: usize,
}

impl Fixer {
    pub fn new<S: AsRef<str>>(prefixes: &[S], raw: &str) -> Self {
        let alternation = prefixes
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        // Escaped literals always compile; an empty prefix set matches nothing.
        let re = if alternation.is_empty() {
            None
        } else {
            Regex::new(&format!("((?i:{}))[^A-Za-z0-9]([0-9]+)", alternation)).ok()
        };

        Self {
            raw: raw.to_string(),
            re,
            cursor: 0,
        }
    }

    /// Return the next issue key at or after the internal scan cursor, or
    /// `None` when the rest of the text contains no key.
    ///
    /// Repeated invocations advance through the text, yielding each key once.
    pub fn next_match(&mut self) -> Option<IssueKeyMatch> {
        let found = self.find_from(self.cursor)?;
        self.cursor = found.offset + found.text.len();
        Some(found)
    }

    /// Rewrite every issue key in the text into canonical form.
    ///
    /// Text outside the matched keys is copied through byte-for-byte, and
    /// already-canonical keys rewrite to themselves. Always scans the whole
    /// text from the start, independent of the [`Fixer::next_match`] cursor.
    pub fn fix(&self) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut copied = 0;
        let mut pos = 0;
        while let Some(m) = self.find_from(pos) {
            out.push_str(&self.raw[copied..m.offset]);
            out.push_str(&m.canonical());
            copied = m.offset + m.text.len();
            pos = copied;
        }
        out.push_str(&self.raw[copied..]);
        out
    }

    /// Leftmost candidate at or after `start` that passes both neighbor
    /// guards. The regex engine has no look-around, so the guards are checked
    /// against the characters adjacent to each raw match; a rejected match
    /// resumes the scan one character further on.
    fn find_from(&self, start: usize) -> Option<IssueKeyMatch> {
        let re = self.re.as_ref()?;
        let mut at = start;
        while at <= self.raw.len() {
            let caps = re.captures_at(&self.raw, at)?;
            let whole = caps.get(0)?;

            let preceded_by_lowercase = self.raw[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_lowercase());
            let followed_by_uppercase = self.raw[whole.end()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase());

            if preceded_by_lowercase || followed_by_uppercase {
                debug!(
                    candidate = whole.as_str(),
                    offset = whole.start(),
                    "candidate rejected by boundary guard"
                );
                let first = self.raw[whole.start()..].chars().next()?;
                at = whole.start() + first.len_utf8();
                continue;
            }

            return Some(IssueKeyMatch {
                text: whole.as_str().to_string(),
                prefix: caps[1].to_string(),
                number: caps[2].to_string(),
                offset: whole.start(),
            });
        }
        None
    }
}

/// Fix the issue keys in the given title.
///
/// Fails with [`FixerError::NoIssueKeysFound`] when the title contains no
/// key at all for the given prefixes. Async only so callers can compose it
/// with their other async setup; no I/O happens here.
pub async fn fix_or_fail<S: AsRef<str>>(prefixes: &[S], title: &str) -> Result<String> {
    let mut fixer = Fixer::new(prefixes, title);
    if fixer.next_match().is_none() {
        return Err(FixerError::NoIssueKeysFound(title.to_string()));
    }
    Ok(fixer.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIXES: &[&str] = &["FOO", "BAR", "BAZ"];

    #[test]
    fn empty_prefix_set_matches_nothing() {
        let prefixes: &[&str] = &[];
        let mut fixer = Fixer::new(prefixes, "FOO-1234: Fix a thing");
        assert!(fixer.next_match().is_none());
        assert_eq!(fixer.fix(), "FOO-1234: Fix a thing");
    }

    #[test]
    fn blank_prefixes_are_ignored() {
        let mut fixer = Fixer::new(&["", "FOO", ""], "-123 FOO-456");
        let m = fixer.next_match().unwrap();
        assert_eq!(m.text, "FOO-456");
    }

    #[test]
    fn canonical_key_still_produces_a_match() {
        let mut fixer = Fixer::new(PREFIXES, "FOO-1234: Fix a thing");
        let m = fixer.next_match().unwrap();
        assert_eq!(m.text, "FOO-1234");
        assert_eq!(m.prefix, "FOO");
        assert_eq!(m.number, "1234");
        assert_eq!(m.offset, 0);
    }

    #[test]
    fn match_reports_byte_offset() {
        let mut fixer = Fixer::new(PREFIXES, "See baz:42 for details");
        let m = fixer.next_match().unwrap();
        assert_eq!(m.text, "baz:42");
        assert_eq!(m.offset, 4);
    }

    #[test]
    fn digits_followed_by_uppercase_are_not_a_key() {
        let mut fixer = Fixer::new(PREFIXES, "build FOO-12A45 first");
        assert!(fixer.next_match().is_none());
    }

    #[test]
    fn prefix_inside_lowercase_word_is_invisible() {
        let mut fixer = Fixer::new(PREFIXES, "lumbar 739: Fix a thing");
        assert!(fixer.next_match().is_none());
        assert_eq!(fixer.fix(), "lumbar 739: Fix a thing");
    }

    #[test]
    fn punctuation_before_prefix_is_a_valid_boundary() {
        let mut fixer = Fixer::new(PREFIXES, "(foo 12)");
        let m = fixer.next_match().unwrap();
        assert_eq!(m.text, "foo 12");
        assert_eq!(m.prefix, "foo");
    }

    #[test]
    fn alphanumeric_separator_does_not_qualify() {
        let mut fixer = Fixer::new(PREFIXES, "FOOX123 BARb456");
        assert!(fixer.next_match().is_none());
    }

    #[test]
    fn fix_ignores_the_scan_cursor() {
        let mut fixer = Fixer::new(PREFIXES, "foo 1 and bar 2");
        fixer.next_match().unwrap();
        fixer.next_match().unwrap();
        assert!(fixer.next_match().is_none());
        assert_eq!(fixer.fix(), "FOO-1 and BAR-2");
    }

    #[test]
    fn multibyte_neighbors_do_not_panic_or_block() {
        let mut fixer = Fixer::new(PREFIXES, "é foo 12 é");
        let m = fixer.next_match().unwrap();
        assert_eq!(m.text, "foo 12");
    }
}
