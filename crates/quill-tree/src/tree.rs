//! The document tree: attribute keys mapped to scalar or nested values.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::intern::{Interner, Symbol};

/// A single attribute value: a scalar string or a nested tree.
///
/// The nested arm owns its tree exclusively; moving the value moves the
/// whole subtree, and dropping it drops every descendant. No node is ever
/// referenced from two places.
#[derive(Debug, PartialEq, Eq)]
pub enum Value {
    /// An interned scalar string.
    Scalar(Symbol),
    /// A nested document tree, owned by this value.
    Nested(DocumentTree),
}

impl Value {
    /// Returns `true` for the scalar arm.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns `true` for the nested arm.
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// The scalar symbol, if this is a scalar.
    pub fn as_scalar(&self) -> Option<Symbol> {
        match self {
            Self::Scalar(sym) => Some(*sym),
            Self::Nested(_) => None,
        }
    }

    /// The nested tree, if this is a nested value.
    pub fn as_nested(&self) -> Option<&DocumentTree> {
        match self {
            Self::Scalar(_) => None,
            Self::Nested(tree) => Some(tree),
        }
    }
}

/// A mapping from attribute name to [`Value`].
///
/// Keys are case-sensitive interned names; each key holds exactly one value
/// at a time, and setting an existing key replaces its value (last write
/// wins). Iteration order is by symbol, which makes serialization
/// deterministic for a given interner; the format itself attaches no meaning
/// to attribute order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DocumentTree {
    children: BTreeMap<Symbol, Value>,
}

impl DocumentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes at this level.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this level has no attributes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if the attribute exists at this level.
    pub fn contains(&self, attrib: Symbol) -> bool {
        self.children.contains_key(&attrib)
    }

    /// Look up an attribute's value.
    pub fn get(&self, attrib: Symbol) -> Option<&Value> {
        self.children.get(&attrib)
    }

    /// Look up an attribute's value mutably.
    pub fn get_mut(&mut self, attrib: Symbol) -> Option<&mut Value> {
        self.children.get_mut(&attrib)
    }

    /// Set an attribute to a value, replacing any existing value.
    ///
    /// Returns `true` if the attribute was newly added, `false` if an
    /// existing value was replaced.
    pub fn set(&mut self, attrib: Symbol, value: Value) -> bool {
        self.children.insert(attrib, value).is_none()
    }

    /// Set an attribute to a scalar, interning the value text.
    pub fn set_scalar(&mut self, interner: &mut Interner, attrib: Symbol, value: &str) -> bool {
        let sym = interner.intern(value);
        self.set(attrib, Value::Scalar(sym))
    }

    /// Convenience lookup of a scalar attribute by name, resolved to text.
    pub fn scalar_text<'a>(&self, interner: &'a Interner, name: &str) -> Option<&'a str> {
        let sym = interner.find(name)?;
        match self.get(sym)? {
            Value::Scalar(value) => Some(interner.resolve(*value)),
            Value::Nested(_) => None,
        }
    }

    /// Iterate over attributes in symbol order.
    pub fn iter(&self) -> btree_map::Iter<'_, Symbol, Value> {
        self.children.iter()
    }
}

impl<'a> IntoIterator for &'a DocumentTree {
    type Item = (&'a Symbol, &'a Value);
    type IntoIter = btree_map::Iter<'a, Symbol, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
