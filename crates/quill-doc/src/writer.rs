//! Serializing trees back to the canonical text form.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use quill_term::quote;
use quill_tree::{DocumentTree, Interner, Value};
use tracing::debug;

use crate::error::Result;

/// Spaces per nesting level.
const DEFAULT_INDENT: usize = 4;

/// Timestamp format used in the provenance comments.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serializes a [`DocumentTree`] as formatted text.
///
/// Output is depth-first in stored attribute order: scalars as
/// `name = value`, nested trees as `name = {` ... `}` blocks indented one
/// level deeper. A leading comment records when the previous version was
/// read and a trailing comment records when this version was written; both
/// are informational only and are skipped on re-parse.
#[derive(Clone, Debug)]
pub struct DocumentWriter {
    indent: usize,
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl DocumentWriter {
    /// Writer with the default indent width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with a custom indent width.
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    /// Render a tree to text, including the provenance comments.
    pub fn render(
        &self,
        tree: &DocumentTree,
        interner: &Interner,
        loaded: DateTime<Local>,
    ) -> String {
        let mut out = String::new();
        out.push_str("# Processed by quill:\n");
        out.push_str(&format!(
            "# Previous version read at {}\n\n",
            loaded.format(TIMESTAMP_FORMAT)
        ));

        self.render_tree(&mut out, tree, interner, 0);

        out.push_str(&format!(
            "\n# New version written at {}\n",
            Local::now().format(TIMESTAMP_FORMAT)
        ));
        out
    }

    /// Serialize a tree to the given destination path.
    ///
    /// The destination should be a temporary name (the commit coordinator
    /// renames it into place); this never writes a document's final name
    /// directly. The file is flushed and synced so a following rename
    /// publishes complete contents.
    pub fn write_file(
        &self,
        tree: &DocumentTree,
        interner: &Interner,
        path: &Path,
        loaded: DateTime<Local>,
    ) -> Result<()> {
        let text = self.render(tree, interner, loaded);
        let mut file = File::create(path)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        debug!(path = %path.display(), bytes = text.len(), "document written");
        Ok(())
    }

    fn render_tree(
        &self,
        out: &mut String,
        tree: &DocumentTree,
        interner: &Interner,
        depth: usize,
    ) {
        let pad = " ".repeat(depth * self.indent);

        for (attrib, value) in tree {
            let name = interner.resolve(*attrib);
            match value {
                Value::Scalar(sym) => {
                    let text = quote(interner.resolve(*sym), false);
                    out.push_str(&format!("{pad}{name} = {text}\n"));
                }
                Value::Nested(nested) => {
                    out.push_str(&format!("{pad}{name} = {{\n"));
                    self.render_tree(out, nested, interner, depth + 1);
                    out.push_str(&format!("{pad}}}\n"));
                }
            }
        }
    }
}
