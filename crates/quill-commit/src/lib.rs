//! Publishing updated documents atomically.
//!
//! After the journal engine has mutated document trees in memory, the
//! [`CommitCoordinator`] makes the update durable:
//!
//! 1. Every dirty document is serialized to `<original>.new`. A write
//!    failure here aborts the commit with all originals untouched.
//! 2. The journal is renamed to `<journal>.processed`, then each document
//!    is replaced: `<original>` → `<original>.old`,
//!    `<original>.new` → `<original>`. A failure stops the sequence; the
//!    surviving `.old` files identify exactly which originals were already
//!    replaced.
//! 3. On success the `.old` files and the `.processed` marker are removed.
//!
//! There is no cross-document atomicity — each document is replaced
//! atomically on its own, and a partial failure is reported precisely
//! rather than prevented.

pub mod error;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use quill_doc::{DocumentSet, DocumentWriter};
use quill_tree::Interner;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use error::{CommitError, Result};

/// What a successful commit did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    /// Documents replaced with their updated serialization, in commit order.
    pub committed: Vec<PathBuf>,
    /// Whether the journal file was consumed (renamed and removed).
    pub journal_consumed: bool,
}

/// Runs the write-new / rename / cleanup sequence for a set of documents.
#[derive(Clone, Debug, Default)]
pub struct CommitCoordinator;

impl CommitCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Commit every dirty document in `set` and consume the journal.
    ///
    /// A run with no dirty documents still consumes the journal — it was
    /// fully processed, it just changed nothing.
    pub fn commit(
        &self,
        set: &DocumentSet,
        writer: &DocumentWriter,
        interner: &Interner,
        journal: &Path,
    ) -> Result<CommitReport> {
        let targets: Vec<_> = set.dirty_entries().collect();

        // Phase 1: write every .new file before touching any original.
        let mut written: Vec<PathBuf> = Vec::new();
        for entry in &targets {
            let new_path = with_suffix(&entry.path, ".new");
            if let Err(source) = writer.write_file(&entry.tree, interner, &new_path, entry.loaded)
            {
                remove_all(&written);
                return Err(CommitError::WriteFailed {
                    path: entry.path.clone(),
                    source,
                });
            }
            debug!(path = %new_path.display(), "new version written");
            written.push(new_path);
        }

        // Phase 2: mark the journal consumed, then replace the originals.
        let processed = with_suffix(journal, ".processed");
        if let Err(source) = fs::rename(journal, &processed) {
            remove_all(&written);
            return Err(CommitError::JournalMark {
                path: journal.to_path_buf(),
                source,
            });
        }

        let mut committed: Vec<PathBuf> = Vec::new();
        for (idx, entry) in targets.iter().enumerate() {
            let old_path = with_suffix(&entry.path, ".old");
            let new_path = with_suffix(&entry.path, ".new");

            let replaced = fs::rename(&entry.path, &old_path)
                .and_then(|()| fs::rename(&new_path, &entry.path));
            if let Err(source) = replaced {
                // Stop here: .old files for everything in `committed` are
                // still on disk and pinpoint what was already replaced.
                let pending = targets[idx + 1..]
                    .iter()
                    .map(|entry| entry.path.clone())
                    .collect();
                return Err(CommitError::PartialCommit {
                    failed: entry.path.clone(),
                    committed,
                    pending,
                    source,
                });
            }
            info!(path = %entry.path.display(), "document committed");
            committed.push(entry.path.clone());
        }

        // Phase 3: cleanup. Leftovers are untidy, not unsafe.
        for path in &committed {
            let old_path = with_suffix(path, ".old");
            if let Err(err) = fs::remove_file(&old_path) {
                warn!(path = %old_path.display(), error = %err, "could not remove old version");
            }
        }
        if let Err(err) = fs::remove_file(&processed) {
            warn!(path = %processed.display(), error = %err, "could not remove processed journal");
        }

        Ok(CommitReport {
            committed,
            journal_consumed: true,
        })
    }
}

/// `players.data` + `.new` → `players.data.new`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Best-effort removal of partially written files.
fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %err, "could not remove partial file");
        }
    }
}
