//! Reading journals and applying their transactions.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quill_doc::DocumentSet;
use quill_term::{unquote, Scanner, TermKind};
use quill_tree::{DocumentTree, Interner, Value};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::checksum::{format_checksum, line_checksum, split_line, FIX_SENTINEL};
use crate::error::{JournalError, Result};

/// Longest journal line the engine will accept, in bytes.
pub const MAX_LINE_LEN: usize = 50_000;

/// Counters from one journal run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JournalSummary {
    /// Every line seen, including blanks and comments.
    pub lines_read: u64,
    /// Lines whose whole batch of transactions was applied.
    pub lines_applied: u64,
    /// Lines rejected by checksum, parse, or validation failure.
    pub lines_rejected: u64,
    /// Individual transactions applied across all lines.
    pub transactions_applied: u64,
    /// Lines that repeated a canonical path (last value won).
    pub duplicate_lines: u64,
    /// `****` checksums recomputed in fix mode.
    pub checksums_fixed: u64,
}

/// What happened to one accepted line.
struct LineOutcome {
    transactions: u64,
    duplicates: bool,
    fixed_checksum: bool,
}

/// Applies a journal file to a set of loaded documents.
///
/// Each line is handled all-or-nothing: verify the checksum, parse every
/// `path = value` pair, validate every path against the current document
/// state, and only then mutate trees. Per-line failures are logged and
/// counted; only failing to open the journal aborts the run. The engine can
/// be re-run — per-run state resets on each [`JournalEngine::process`] call.
#[derive(Debug)]
pub struct JournalEngine {
    fix_checksums: bool,
    lines_read: u64,
}

impl JournalEngine {
    /// Engine in normal (verifying) mode.
    pub fn new() -> Self {
        Self {
            fix_checksums: false,
            lines_read: 0,
        }
    }

    /// Engine that recomputes and reports `****` checksums instead of
    /// failing on them.
    pub fn with_fix_checksums() -> Self {
        Self {
            fix_checksums: true,
            ..Self::new()
        }
    }

    /// Lines read by the most recent [`JournalEngine::process`] call.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Read the whole journal and apply every valid line's transactions.
    pub fn process(
        &mut self,
        path: &Path,
        set: &mut DocumentSet,
        interner: &mut Interner,
    ) -> Result<JournalSummary> {
        let file = File::open(path)?;
        self.lines_read = 0;
        let mut summary = JournalSummary::default();

        for line in BufReader::new(file).lines() {
            let line = line?;
            self.lines_read += 1;
            summary.lines_read = self.lines_read;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match self.apply_line(self.lines_read, trimmed, set, interner) {
                Ok(outcome) => {
                    summary.lines_applied += 1;
                    summary.transactions_applied += outcome.transactions;
                    if outcome.duplicates {
                        summary.duplicate_lines += 1;
                    }
                    if outcome.fixed_checksum {
                        summary.checksums_fixed += 1;
                    }
                }
                Err(err) => {
                    warn!(line = self.lines_read, error = %err, "journal line rejected");
                    summary.lines_rejected += 1;
                }
            }
        }

        debug!(
            path = %path.display(),
            applied = summary.lines_applied,
            rejected = summary.lines_rejected,
            "journal processed"
        );
        Ok(summary)
    }

    /// Handle one non-blank, non-comment line.
    fn apply_line(
        &self,
        line_no: u64,
        line: &str,
        set: &mut DocumentSet,
        interner: &mut Interner,
    ) -> Result<LineOutcome> {
        if line.len() > MAX_LINE_LEN {
            return Err(JournalError::LineTooLong {
                line: line_no,
                len: line.len(),
            });
        }

        let (text, fixed_checksum) = self.verify_checksum(line_no, line)?;
        let (updates, duplicates) = extract_updates(line_no, text)?;

        for path in updates.keys() {
            validate_path(line_no, path, set, interner)?;
        }

        let transactions = updates.len() as u64;
        for (path, value) in &updates {
            apply_update(path, value, set, interner);
        }
        if duplicates {
            warn!(line = line_no, "line contains duplicate attribute paths");
        }

        Ok(LineOutcome {
            transactions,
            duplicates,
            fixed_checksum,
        })
    }

    /// Verify and strip the line's checksum, returning the remaining text.
    fn verify_checksum<'a>(&self, line_no: u64, line: &'a str) -> Result<(&'a str, bool)> {
        let Some((text, stored)) = split_line(line) else {
            return Err(JournalError::MissingChecksum { line: line_no });
        };

        let computed = line_checksum(text);

        if self.fix_checksums && stored == FIX_SENTINEL {
            info!(
                line = line_no,
                checksum = %format_checksum(computed),
                "fix checksums: computed value for this line"
            );
            return Ok((text, true));
        }

        match u16::from_str_radix(stored, 16) {
            Ok(value) if value == computed => Ok((text, false)),
            _ => Err(JournalError::BadChecksum {
                line: line_no,
                stored: stored.to_string(),
                computed,
            }),
        }
    }
}

impl Default for JournalEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the checksum-stripped text as repeated `path = value` pairs.
///
/// Paths are trimmed and lowercased into canonical form. A repeated
/// canonical path keeps the last value and flags the line as containing
/// duplicates.
fn extract_updates(line_no: u64, text: &str) -> Result<(BTreeMap<String, String>, bool)> {
    let mut scanner = Scanner::new(text);
    let mut updates = BTreeMap::new();
    let mut duplicates = false;

    loop {
        let term = scanner.next_term();
        let path = match term.kind {
            TermKind::EndOfLine => break,
            // Dots in the path make it lex as a value-only word.
            TermKind::AttribOrValue | TermKind::ValueOnly => term.text,
            _ => return Err(JournalError::MissingAttribute { line: line_no }),
        };

        if scanner.next_term().kind != TermKind::Equals {
            return Err(JournalError::NoEquals { line: line_no });
        }

        let value_term = scanner.next_term();
        let value = match value_term.kind {
            TermKind::AttribOrValue | TermKind::ValueOnly => unquote(value_term.text)
                .map_err(|source| JournalError::UnfinishedValue {
                    line: line_no,
                    source,
                })?,
            _ => return Err(JournalError::MissingValue { line: line_no }),
        };

        let canonical = path.trim().to_lowercase();
        if updates.insert(canonical, value).is_some() {
            duplicates = true;
        }
    }

    Ok((updates, duplicates))
}

/// Check one canonical path against the current document state.
fn validate_path(
    line_no: u64,
    path: &str,
    set: &DocumentSet,
    interner: &Interner,
) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();

    if segments.len() < 2
        || segments.iter().any(|s| s.is_empty())
        || path.contains('"')
        || path.contains('\\')
    {
        return Err(JournalError::MalformedAttribute {
            line: line_no,
            path: path.to_string(),
        });
    }

    let entry = set
        .lookup(segments[0])
        .ok_or_else(|| JournalError::FileIdNotFound {
            line: line_no,
            id: segments[0].to_string(),
        })?;

    // Walk down the existing tree. A missing attribute anywhere is fine —
    // structures are created on apply — but crossing an existing scalar or
    // landing a scalar on an existing structure is a type clash.
    let mut node = Some(&entry.tree);
    let attribs = &segments[1..];
    for (idx, segment) in attribs.iter().enumerate() {
        let Some(tree) = node else { break };
        let is_last = idx == attribs.len() - 1;
        let existing = interner.find(segment).and_then(|sym| tree.get(sym));

        match existing {
            Some(Value::Nested(_)) if is_last => {
                return Err(JournalError::StructRedefinition {
                    line: line_no,
                    path: path.to_string(),
                });
            }
            Some(Value::Scalar(_)) if !is_last => {
                return Err(JournalError::StructRedefinition {
                    line: line_no,
                    path: path.to_string(),
                });
            }
            Some(Value::Nested(inner)) => node = Some(inner),
            Some(Value::Scalar(_)) | None => node = None,
        }
    }

    Ok(())
}

/// Apply one validated update, creating intermediate structures as needed.
fn apply_update(path: &str, value: &str, set: &mut DocumentSet, interner: &mut Interner) {
    let segments: Vec<&str> = path.split('.').collect();
    let id = segments[0];

    set.mark_dirty(id);
    let mut node = set.tree_mut(id).expect("path validated against registry");

    for segment in &segments[1..segments.len() - 1] {
        let sym = interner.intern(segment);
        if !matches!(node.get(sym), Some(Value::Nested(_))) {
            node.set(sym, Value::Nested(DocumentTree::new()));
        }
        node = match node.get_mut(sym) {
            Some(Value::Nested(tree)) => tree,
            _ => unreachable!("nested value inserted above"),
        };
    }

    let leaf = interner.intern(segments[segments.len() - 1]);
    node.set_scalar(interner, leaf, value);
    debug!(path, value, "transaction applied");
}
