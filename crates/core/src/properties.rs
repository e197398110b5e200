//! Uninterpreted property annotations on nodes and arcs.
//!
//! Properties are the integration surface for external I/O codecs: a
//! string-keyed table per entity whose values the core never interprets.
//! Views resolve property lookups through their underlying graph.
use core::hash::Hash;

use alloc::{boxed::Box, string::String};

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::{Arc, Graph, Node};

/// A property value attached to a node or arc.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Read access to property annotations, chained through views.
pub trait PropertyGraph: Graph {
    fn node_property(&self, node: Node, name: &str) -> Option<&PropertyValue>;

    fn arc_property(&self, arc: Arc, name: &str) -> Option<&PropertyValue>;

    /// Every `(node, name, value)` annotation, in insertion order.
    fn node_properties(&self) -> PropertyIter<'_, Node>;

    /// Every `(arc, name, value)` annotation, in insertion order.
    fn arc_properties(&self) -> PropertyIter<'_, Arc>;
}

pub type PropertyIter<'a, K> = Box<dyn Iterator<Item = (K, &'a str, &'a PropertyValue)> + 'a>;

impl<G> PropertyGraph for &G
where
    G: PropertyGraph + ?Sized,
{
    fn node_property(&self, node: Node, name: &str) -> Option<&PropertyValue> {
        (**self).node_property(node, name)
    }

    fn arc_property(&self, arc: Arc, name: &str) -> Option<&PropertyValue> {
        (**self).arc_property(arc, name)
    }

    fn node_properties(&self) -> PropertyIter<'_, Node> {
        (**self).node_properties()
    }

    fn arc_properties(&self) -> PropertyIter<'_, Arc> {
        (**self).arc_properties()
    }
}

/// Insertion-ordered storage behind the [`PropertyGraph`] impls of the
/// concrete graph types.
#[derive(Debug, Clone)]
pub(crate) struct PropertyStore<K> {
    entries: IndexMap<K, IndexMap<String, PropertyValue, FxBuildHasher>, FxBuildHasher>,
}

impl<K> Default for PropertyStore<K> {
    fn default() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }
}

impl<K> PropertyStore<K>
where
    K: Copy + Eq + Hash,
{
    pub(crate) fn set(&mut self, key: K, name: String, value: PropertyValue) {
        self.entries.entry(key).or_default().insert(name, value);
    }

    pub(crate) fn get(&self, key: K, name: &str) -> Option<&PropertyValue> {
        self.entries.get(&key)?.get(name)
    }

    pub(crate) fn remove_all(&mut self, key: K) {
        self.entries.swap_remove(&key);
    }

    pub(crate) fn iter(&self) -> PropertyIter<'_, K>
    where
        K: 'static,
    {
        Box::new(self.entries.iter().flat_map(|(&key, names)| {
            names
                .iter()
                .map(move |(name, value)| (key, name.as_str(), value))
        }))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
