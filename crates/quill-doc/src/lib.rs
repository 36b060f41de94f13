//! Reading, writing, and tracking quill documents.
//!
//! A document is a text file of hierarchical `attribute = value` pairs,
//! identified by a root-level `id` attribute:
//!
//! ```text
//! id = players
//! score = 10
//! profile = {
//!     name = "Grace H."
//! }
//! # comment to end of line
//! ```
//!
//! [`reader`] parses files into [`quill_tree::DocumentTree`]s with a
//! context-stack state machine; [`writer`] serializes trees back to the
//! canonical text form with provenance comments; [`registry`] indexes loaded
//! documents by their declared id so journal transactions can address them.

pub mod error;
pub mod reader;
pub mod registry;
pub mod writer;

pub use error::{DocError, Result};
pub use reader::{parse_str, read_file};
pub use registry::{DocumentEntry, DocumentSet};
pub use writer::DocumentWriter;
