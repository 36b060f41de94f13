//! Parsing document files into trees.
//!
//! The reader drives the term scanner with a three-state machine and an
//! explicit stack of open structures. Each line is fully drained of terms
//! before the next is read; the first error on any line abandons the whole
//! document. The stack holds owned trees, so error paths release every
//! partially built structure when the parser is dropped, and nesting depth
//! is bounded by memory rather than by the call stack.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quill_term::{unquote, Scanner, TermKind};
use quill_tree::{DocumentTree, Interner, Symbol, Value};
use tracing::debug;

use crate::error::{DocError, Result};

/// Longest line the reader will accept, in bytes.
pub const MAX_LINE_LEN: usize = 50_000;

/// Parser state between terms on one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Expecting `}`, an attribute name, a comment, or end of line.
    CloseOrAttrib,
    /// An attribute name was captured; only `=` is legal.
    ExpectEquals,
    /// After `=`: a value term or `{` opening a nested structure.
    ValueOrOpen,
}

struct Parser<'i> {
    interner: &'i mut Interner,
    /// Open structures, root at the bottom. A nested tree is inserted into
    /// its parent when its `}` arrives.
    stack: Vec<DocumentTree>,
    /// Attribute name in the parent for each open structure above the root.
    names: Vec<Symbol>,
    line: u64,
}

impl<'i> Parser<'i> {
    fn new(interner: &'i mut Interner) -> Self {
        Self {
            interner,
            stack: vec![DocumentTree::new()],
            names: Vec::new(),
            line: 0,
        }
    }

    fn parse_line(&mut self, text: &str) -> Result<()> {
        self.line += 1;
        let line = self.line;

        if text.len() > MAX_LINE_LEN {
            return Err(DocError::LineTooLong {
                line,
                len: text.len(),
            });
        }

        let mut scanner = Scanner::new(text);
        let mut state = State::CloseOrAttrib;
        let mut attrib: Option<Symbol> = None;

        loop {
            let term = scanner.next_term();

            match state {
                State::CloseOrAttrib => match term.kind {
                    TermKind::CloseStruct => self.close_struct(line)?,
                    TermKind::AttribOrValue => {
                        attrib = Some(self.interner.intern(term.text));
                        state = State::ExpectEquals;
                    }
                    // Not partway through an attribute/value pair.
                    TermKind::Comment | TermKind::EndOfLine => return Ok(()),
                    TermKind::OpenStruct | TermKind::Equals => {
                        return Err(DocError::MissingAttribute { line });
                    }
                    TermKind::ValueOnly => {
                        return Err(DocError::MalformedAttribute { line });
                    }
                },

                State::ExpectEquals => match term.kind {
                    TermKind::Equals => state = State::ValueOrOpen,
                    // Anything else leaves a dangling attribute.
                    _ => return Err(DocError::NoEquals { line }),
                },

                State::ValueOrOpen => match term.kind {
                    TermKind::AttribOrValue | TermKind::ValueOnly => {
                        let value = unquote(term.text)
                            .map_err(|source| DocError::UnfinishedValue { line, source })?;
                        let name = attrib.take().ok_or(DocError::MissingAttribute { line })?;
                        let top = self.stack.last_mut().expect("context stack never empties");
                        top.set_scalar(self.interner, name, &value);
                        state = State::CloseOrAttrib;
                    }
                    TermKind::OpenStruct => {
                        // The new structure joins its parent when it closes;
                        // until then the stack owns it.
                        let name = attrib.take().ok_or(DocError::MissingAttribute { line })?;
                        self.stack.push(DocumentTree::new());
                        self.names.push(name);
                        state = State::CloseOrAttrib;
                    }
                    _ => return Err(DocError::MissingValue { line }),
                },
            }
        }
    }

    fn current(&mut self) -> &mut DocumentTree {
        self.stack.last_mut().expect("context stack never empties")
    }

    fn close_struct(&mut self, line: u64) -> Result<()> {
        // The bottom of the stack is the document root; it has no brace.
        if self.stack.len() <= 1 {
            return Err(DocError::ContextUnderflow { line });
        }
        let tree = self.stack.pop().expect("stack length checked");
        let name = self.names.pop().expect("one name per open structure");
        self.current().set(name, Value::Nested(tree));
        Ok(())
    }

    fn finish(mut self) -> Result<DocumentTree> {
        if self.stack.len() != 1 {
            return Err(DocError::UnclosedStruct {
                open: self.stack.len() - 1,
            });
        }
        let root = self.stack.pop().expect("stack length checked");
        if root.is_empty() {
            return Err(DocError::EmptyDocument);
        }
        Ok(root)
    }
}

/// Parse a whole document from in-memory text.
pub fn parse_str(interner: &mut Interner, text: &str) -> Result<DocumentTree> {
    let mut parser = Parser::new(interner);
    for line in text.lines() {
        parser.parse_line(line)?;
    }
    parser.finish()
}

/// Read and parse a document file.
///
/// Any per-line error aborts the whole read; no partial tree is returned.
pub fn read_file(interner: &mut Interner, path: &Path) -> Result<DocumentTree> {
    let file = File::open(path)?;
    let mut parser = Parser::new(interner);

    for line in BufReader::new(file).lines() {
        parser.parse_line(&line?)?;
    }

    let tree = parser.finish()?;
    debug!(path = %path.display(), attributes = tree.len(), "document read");
    Ok(tree)
}
