//! Byte trie backing the autocomplete index.
//!
//! Keys are stored lower-cased by the caller, so the trie itself is
//! case-sensitive and works byte by byte.

use std::collections::HashMap;

/// A prefix tree mapping names to values.
///
/// `get` and `insert` are O(k) in the key length; `prefix_iter` is O(k + m)
/// where m is the number of nodes below the prefix. Iteration order is
/// unspecified.
///
/// # Examples
///
/// ```
/// use bevy_command_terminal::core::Trie;
///
/// let mut names = Trie::new();
/// names.insert("clear", 1);
/// names.insert("close", 1);
/// names.insert("help", 1);
///
/// assert_eq!(names.prefix_iter("cl").count(), 2);
/// assert!(names.contains("help"));
/// ```
#[derive(Debug, Clone)]
pub struct Trie<V> {
    root: Node<V>,
    len: usize,
}

#[derive(Debug, Clone)]
struct Node<V> {
    children: HashMap<u8, Node<V>>,
    entry: Option<(Box<str>, V)>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            entry: None,
        }
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no key has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let node = self.node_entry(key);
        let old = node.entry.replace((key.into(), value)).map(|(_, v)| v);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.node(key)?.entry.as_ref().map(|(_, v)| v)
    }

    /// Get the value stored under `key` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut node = &mut self.root;
        for byte in key.bytes() {
            node = node.children.get_mut(&byte)?;
        }
        node.entry.as_mut().map(|(_, v)| v)
    }

    /// Check if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over every entry whose key starts with `prefix`.
    ///
    /// The prefix does not have to be a key itself.
    pub fn prefix_iter(&self, prefix: &str) -> PrefixIter<'_, V> {
        PrefixIter {
            stack: self.node(prefix).into_iter().collect(),
        }
    }

    fn node(&self, key: &str) -> Option<&Node<V>> {
        let mut node = &self.root;
        for byte in key.bytes() {
            node = node.children.get(&byte)?;
        }
        Some(node)
    }

    fn node_entry(&mut self, key: &str) -> &mut Node<V> {
        let mut node = &mut self.root;
        for byte in key.bytes() {
            node = node.children.entry(byte).or_default();
        }
        node
    }
}

/// Depth-first iterator over the entries below a prefix.
pub struct PrefixIter<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> Iterator for PrefixIter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children.values());
            if let Some((key, value)) = &node.entry {
                return Some((key, value));
            }
        }
        None
    }
}
