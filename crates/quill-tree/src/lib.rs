//! In-memory document trees for quill.
//!
//! A document is a tree of `attribute = value` pairs where every value is
//! either a scalar string or a nested tree with its own attributes. Attribute
//! names and scalar values are interned: the [`Interner`] keeps one copy of
//! each distinct string and hands out cheap [`Symbol`] handles, so a value
//! repeated across thousands of attributes is stored once.
//!
//! The interner is an explicit service owned by the top-level run and passed
//! to whatever needs it; there is no process-global state.

pub mod intern;
pub mod tree;

pub use intern::{Interner, Symbol};
pub use tree::{DocumentTree, Value};
