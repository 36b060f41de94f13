//! Registry of loaded documents, keyed by declared id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use quill_tree::{DocumentTree, Interner};
use tracing::debug;

use crate::error::{DocError, Result};
use crate::reader::read_file;

/// One loaded document: its declared id, where it came from, its tree, and
/// when it was read.
#[derive(Debug)]
pub struct DocumentEntry {
    /// The document's declared id, lowercased.
    pub id: String,
    /// The file the document was read from.
    pub path: PathBuf,
    /// The parsed tree. Replaced wholesale by journal application.
    pub tree: DocumentTree,
    /// When the source file was read.
    pub loaded: DateTime<Local>,
    /// Set when journal transactions have modified the tree and the
    /// document needs to be committed back to disk.
    pub dirty: bool,
}

/// Tracks every loaded document by its declared id.
///
/// A document must carry a root-level scalar `id` attribute to be
/// registered. Ids are matched case-insensitively: journal paths are
/// canonicalized to lowercase, so the registry stores lowercased keys.
#[derive(Debug, Default)]
pub struct DocumentSet {
    entries: BTreeMap<String, DocumentEntry>,
}

impl DocumentSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a document file and register it under its declared id.
    ///
    /// Fails with [`DocError::MissingId`] if the document has no root-level
    /// scalar `id`, and [`DocError::DuplicateId`] if another document
    /// already claimed the id.
    pub fn load(&mut self, interner: &mut Interner, path: &Path) -> Result<&DocumentEntry> {
        let tree = read_file(interner, path)?;

        let id = tree
            .scalar_text(interner, "id")
            .ok_or_else(|| DocError::MissingId {
                path: path.to_path_buf(),
            })?
            .to_lowercase();

        if self.entries.contains_key(&id) {
            return Err(DocError::DuplicateId { id });
        }

        debug!(id = %id, path = %path.display(), "document registered");
        let entry = DocumentEntry {
            id: id.clone(),
            path: path.to_path_buf(),
            tree,
            loaded: Local::now(),
            dirty: false,
        };
        Ok(self.entries.entry(id).or_insert(entry))
    }

    /// Look up a document by id.
    pub fn lookup(&self, id: &str) -> Option<&DocumentEntry> {
        self.entries.get(id)
    }

    /// Look up a document's tree mutably. Does not mark the entry dirty.
    pub fn tree_mut(&mut self, id: &str) -> Option<&mut DocumentTree> {
        self.entries.get_mut(id).map(|entry| &mut entry.tree)
    }

    /// Mark a document as modified since load.
    pub fn mark_dirty(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.dirty = true;
        }
    }

    /// All loaded documents, in id order.
    pub fn entries(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries.values()
    }

    /// The documents modified since load, in id order.
    pub fn dirty_entries(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries.values().filter(|entry| entry.dirty)
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no documents are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_doc(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_registers_by_declared_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "players.data", "id = players\nscore = 10\n");

        let mut interner = Interner::new();
        let mut set = DocumentSet::new();
        let entry = set.load(&mut interner, &path).unwrap();

        assert_eq!(entry.id, "players");
        assert_eq!(entry.path, path);
        assert!(!entry.dirty);
        assert!(set.lookup("players").is_some());
    }

    #[test]
    fn declared_id_is_matched_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "mixed.data", "id = Players\nscore = 1\n");

        let mut interner = Interner::new();
        let mut set = DocumentSet::new();
        set.load(&mut interner, &path).unwrap();

        // Journal paths arrive lowercased.
        assert!(set.lookup("players").is_some());
        assert!(set.lookup("Players").is_none());
    }

    #[test]
    fn missing_id_attribute_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "anon.data", "score = 10\n");

        let mut interner = Interner::new();
        let mut set = DocumentSet::new();
        let err = set.load(&mut interner, &path).unwrap_err();
        assert!(matches!(err, DocError::MissingId { .. }));
    }

    #[test]
    fn nested_id_does_not_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "nested.data", "meta = {\n    id = inner\n}\n");

        let mut interner = Interner::new();
        let mut set = DocumentSet::new();
        let err = set.load(&mut interner, &path).unwrap_err();
        assert!(matches!(err, DocError::MissingId { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_doc(&dir, "a.data", "id = shared\nx = 1\n");
        let second = write_doc(&dir, "b.data", "id = shared\ny = 2\n");

        let mut interner = Interner::new();
        let mut set = DocumentSet::new();
        set.load(&mut interner, &first).unwrap();
        let err = set.load(&mut interner, &second).unwrap_err();
        assert!(matches!(err, DocError::DuplicateId { .. }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn dirty_tracking() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "players.data", "id = players\nscore = 10\n");

        let mut interner = Interner::new();
        let mut set = DocumentSet::new();
        set.load(&mut interner, &path).unwrap();

        assert_eq!(set.dirty_entries().count(), 0);
        set.mark_dirty("players");
        assert_eq!(set.dirty_entries().count(), 1);
    }

    #[test]
    fn tree_mut_allows_modification() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "players.data", "id = players\nscore = 10\n");

        let mut interner = Interner::new();
        let mut set = DocumentSet::new();
        set.load(&mut interner, &path).unwrap();

        let score = interner.intern("score");
        set.tree_mut("players")
            .unwrap()
            .set_scalar(&mut interner, score, "42");

        let entry = set.lookup("players").unwrap();
        assert_eq!(entry.tree.scalar_text(&interner, "score"), Some("42"));
    }

    #[test]
    fn unknown_id_lookup_is_none() {
        let set = DocumentSet::new();
        assert!(set.lookup("ghost").is_none());
        assert!(set.is_empty());
    }
}
