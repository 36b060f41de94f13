//! The journal engine: checksummed, path-addressed update transactions.
//!
//! A journal is a text file of update lines. Each line carries one or more
//! `document-id.dotted.path = value` pairs followed by a space and a
//! four-hex-digit checksum of the preceding text:
//!
//! ```text
//! players.score = 42 3f2a
//! master.config.depth = 5 master.config.mode = fast 91c0
//! ```
//!
//! Lines are applied all-or-nothing: the checksum must verify, every pair
//! must parse, and every path must validate against the loaded documents
//! before any update from that line touches a tree. A failing line is
//! logged and skipped; the run continues with the next line.

pub mod checksum;
pub mod engine;
pub mod error;

pub use checksum::{format_checksum, line_checksum, FIX_SENTINEL};
pub use engine::{JournalEngine, JournalSummary};
pub use error::{JournalError, Result};
