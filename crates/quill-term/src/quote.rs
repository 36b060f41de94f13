//! Translation between scanned terms and in-memory value text.

use std::borrow::Cow;

use crate::error::{Result, ValueError};

/// Characters that force a term to be written in quoted form.
///
/// Whitespace and the structural characters would split or terminate the
/// term on re-scan; quotes, backslashes, and dots would change its
/// classification. An empty term must be quoted or it would vanish
/// entirely on re-scan.
fn must_quote(term: &str) -> bool {
    term.is_empty()
        || term
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\\' | '.' | '{' | '}' | '=' | '#'))
}

/// Unquote a scanned term into its value text.
///
/// Walks the term copying characters, switching into and out of quoted mode
/// on unescaped `"`, and translating `\X` to the literal `X` while inside
/// quotes. The value ends at the first unescaped, unquoted whitespace, so a
/// value term must be the last term parsed on its line.
///
/// Errors: [`ValueError::MissingQuote`] if the term ends inside a quoted
/// span, [`ValueError::UnfinishedEscape`] for a trailing `\`, and
/// [`ValueError::UnquotedEscape`] for a `\` outside quotes.
pub fn unquote(term: &str) -> Result<String> {
    let mut out = String::with_capacity(term.len());
    let mut in_quotes = false;
    let mut chars = term.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => in_quotes = false,
                '\\' => match chars.next() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(ValueError::UnfinishedEscape),
                },
                _ => out.push(ch),
            }
        } else {
            match ch {
                c if c.is_whitespace() => break,
                '"' => in_quotes = true,
                '\\' => return Err(ValueError::UnquotedEscape),
                _ => out.push(ch),
            }
        }
    }

    if in_quotes {
        return Err(ValueError::MissingQuote);
    }
    Ok(out)
}

/// Quote a value for writing, the inverse of [`unquote`].
///
/// Wraps the term in quotes and escapes `"` and `\` if `always` is set or
/// the term contains a character that would not survive a re-scan. A term
/// with no special characters is returned unchanged, so plain values like
/// `1000` don't pick up quotes on every rewrite.
pub fn quote(term: &str, always: bool) -> Cow<'_, str> {
    if !always && !must_quote(term) {
        return Cow::Borrowed(term);
    }

    let mut out = String::with_capacity(term.len() + 2);
    out.push('"');
    for ch in term.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    Cow::Owned(out)
}
