//! Line tokenizer for the quill document and journal formats.
//!
//! Both formats are line-oriented sequences of *terms*: structural
//! single-character terms (`{`, `}`, `=`, `#`), and words that are legal as
//! attribute names, as values, or only as values. The [`Scanner`] splits one
//! line into terms, honoring quoted spans and escapes; [`unquote`] translates
//! a scanned term into its in-memory value text, and [`quote`] is the
//! writer-side inverse.
//!
//! # Term classes
//!
//! - [`TermKind::AttribOrValue`] — a bare word with no quotes, escapes, or
//!   dots; usable as an attribute name or as a value.
//! - [`TermKind::ValueOnly`] — a word containing a quote, backslash, or dot;
//!   legal only as a value. Attribute names must stay free of those
//!   characters so they can appear unambiguously inside dotted journal paths.

pub mod error;
pub mod quote;
pub mod scan;

pub use error::ValueError;
pub use quote::{quote, unquote};
pub use scan::{Scanner, Term, TermKind};
