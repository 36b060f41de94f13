//! Splitting one line of text into typed terms.

/// The kind of term produced by [`Scanner::next_term`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// `{` — opens a nested structure.
    OpenStruct,
    /// `}` — closes the current nested structure.
    CloseStruct,
    /// `=` — separates an attribute name from its value.
    Equals,
    /// `#` — the rest of the line is a comment.
    Comment,
    /// The line is exhausted (empty or whitespace only).
    EndOfLine,
    /// A bare word, legal as an attribute name or as a value.
    AttribOrValue,
    /// A word containing a quote, backslash, or dot; legal only as a value.
    ValueOnly,
}

/// One scanned term: its kind and the raw text it covers.
///
/// For word terms the text is the un-translated source span, quotes and
/// escapes included; pass it through [`crate::unquote`] to get the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term<'a> {
    pub kind: TermKind,
    pub text: &'a str,
}

/// Scans a single line into a sequence of [`Term`]s.
///
/// The scanner itself tolerates an unterminated quote at end of line (the
/// word term simply runs to the end); it is [`crate::unquote`] that rejects
/// it.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    /// Start scanning the given line.
    pub fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    /// The portion of the line not yet consumed.
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    /// Skip leading whitespace and return the next term.
    ///
    /// Returns [`TermKind::EndOfLine`] forever once the line is exhausted.
    pub fn next_term(&mut self) -> Term<'a> {
        self.rest = self.rest.trim_start();

        let mut chars = self.rest.char_indices();
        let Some((_, first)) = chars.next() else {
            return Term {
                kind: TermKind::EndOfLine,
                text: "",
            };
        };

        let (kind, end) = match first {
            '{' => (TermKind::OpenStruct, first.len_utf8()),
            '}' => (TermKind::CloseStruct, first.len_utf8()),
            '=' => (TermKind::Equals, first.len_utf8()),
            // A comment uses everything left; there is no close-comment marker.
            '#' => (TermKind::Comment, self.rest.len()),
            _ => self.scan_word(),
        };

        let term = Term {
            kind,
            text: &self.rest[..end],
        };
        self.rest = &self.rest[end..];
        term
    }

    /// Scan a word term starting at the current position.
    ///
    /// Outside quotes the word ends at whitespace or at `{` `}` `=` `#`.
    /// A `"` opens a quoted span in which those stops are ordinary
    /// characters and `\` escapes the next character (so an escaped `"`
    /// does not close the span). Quotes, backslashes, and dots each force
    /// the `ValueOnly` classification.
    fn scan_word(&self) -> (TermKind, usize) {
        let mut in_quotes = false;
        let mut value_only = false;
        let mut skip_next = false;
        let mut end = self.rest.len();

        for (idx, ch) in self.rest.char_indices() {
            if skip_next {
                skip_next = false;
                continue;
            }

            if in_quotes {
                match ch {
                    '"' => in_quotes = false,
                    '\\' => {
                        value_only = true;
                        skip_next = true;
                    }
                    _ => {}
                }
            } else {
                match ch {
                    '#' | '{' | '}' | '=' => {
                        end = idx;
                        break;
                    }
                    c if c.is_whitespace() => {
                        end = idx;
                        break;
                    }
                    '"' => {
                        value_only = true;
                        in_quotes = true;
                    }
                    // Attribute names cannot carry escapes, and dots are
                    // reserved for journal paths.
                    '\\' | '.' => value_only = true,
                    _ => {}
                }
            }
        }

        let kind = if value_only {
            TermKind::ValueOnly
        } else {
            TermKind::AttribOrValue
        };
        (kind, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(line: &str) -> Vec<(TermKind, String)> {
        let mut scanner = Scanner::new(line);
        let mut out = Vec::new();
        loop {
            let term = scanner.next_term();
            if term.kind == TermKind::EndOfLine {
                break;
            }
            out.push((term.kind, term.text.to_string()));
        }
        out
    }

    #[test]
    fn empty_line_is_end_of_line() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.next_term().kind, TermKind::EndOfLine);
        // Repeated calls stay at end of line.
        assert_eq!(scanner.next_term().kind, TermKind::EndOfLine);
    }

    #[test]
    fn whitespace_only_is_end_of_line() {
        let mut scanner = Scanner::new("   \t  ");
        assert_eq!(scanner.next_term().kind, TermKind::EndOfLine);
    }

    #[test]
    fn single_character_terms() {
        assert_eq!(
            terms("{ } ="),
            vec![
                (TermKind::OpenStruct, "{".into()),
                (TermKind::CloseStruct, "}".into()),
                (TermKind::Equals, "=".into()),
            ]
        );
    }

    #[test]
    fn comment_consumes_rest_of_line() {
        let mut scanner = Scanner::new("# anything = { goes } here");
        let term = scanner.next_term();
        assert_eq!(term.kind, TermKind::Comment);
        assert_eq!(term.text, "# anything = { goes } here");
        assert_eq!(scanner.next_term().kind, TermKind::EndOfLine);
    }

    #[test]
    fn bare_word_is_attrib_or_value() {
        let mut scanner = Scanner::new("score");
        let term = scanner.next_term();
        assert_eq!(term.kind, TermKind::AttribOrValue);
        assert_eq!(term.text, "score");
    }

    #[test]
    fn word_stops_at_structural_characters() {
        assert_eq!(
            terms("abc{def"),
            vec![
                (TermKind::AttribOrValue, "abc".into()),
                (TermKind::OpenStruct, "{".into()),
                (TermKind::AttribOrValue, "def".into()),
            ]
        );
    }

    #[test]
    fn word_stops_at_whitespace() {
        assert_eq!(
            terms("one two"),
            vec![
                (TermKind::AttribOrValue, "one".into()),
                (TermKind::AttribOrValue, "two".into()),
            ]
        );
    }

    #[test]
    fn dotted_word_is_value_only() {
        let mut scanner = Scanner::new("players.score");
        let term = scanner.next_term();
        assert_eq!(term.kind, TermKind::ValueOnly);
        assert_eq!(term.text, "players.score");
    }

    #[test]
    fn backslash_forces_value_only() {
        let mut scanner = Scanner::new(r"a\b");
        assert_eq!(scanner.next_term().kind, TermKind::ValueOnly);
    }

    #[test]
    fn quoted_span_suppresses_stops() {
        let mut scanner = Scanner::new(r#""a b = { } #" tail"#);
        let term = scanner.next_term();
        assert_eq!(term.kind, TermKind::ValueOnly);
        assert_eq!(term.text, r#""a b = { } #""#);
        let tail = scanner.next_term();
        assert_eq!(tail.kind, TermKind::AttribOrValue);
        assert_eq!(tail.text, "tail");
    }

    #[test]
    fn escaped_quote_does_not_close_span() {
        let mut scanner = Scanner::new(r#""a \" b" next"#);
        let term = scanner.next_term();
        assert_eq!(term.kind, TermKind::ValueOnly);
        assert_eq!(term.text, r#""a \" b""#);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        let mut scanner = Scanner::new(r#""never closed"#);
        let term = scanner.next_term();
        assert_eq!(term.kind, TermKind::ValueOnly);
        assert_eq!(term.text, r#""never closed"#);
        assert_eq!(scanner.next_term().kind, TermKind::EndOfLine);
    }

    #[test]
    fn attribute_line_tokenizes_in_order() {
        assert_eq!(
            terms("name = value # trailing"),
            vec![
                (TermKind::AttribOrValue, "name".into()),
                (TermKind::Equals, "=".into()),
                (TermKind::AttribOrValue, "value".into()),
                (TermKind::Comment, "# trailing".into()),
            ]
        );
    }

    #[test]
    fn quoted_value_line_matches_contract() {
        // The worked example from the format documentation.
        assert_eq!(
            terms(r#"name = "a \"quoted\" value""#),
            vec![
                (TermKind::AttribOrValue, "name".into()),
                (TermKind::Equals, "=".into()),
                (TermKind::ValueOnly, r#""a \"quoted\" value""#.into()),
            ]
        );
    }

    #[test]
    fn equals_without_spacing() {
        assert_eq!(
            terms("layer=1000"),
            vec![
                (TermKind::AttribOrValue, "layer".into()),
                (TermKind::Equals, "=".into()),
                (TermKind::AttribOrValue, "1000".into()),
            ]
        );
    }
}
