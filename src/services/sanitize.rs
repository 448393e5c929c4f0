// SPDX-License-Identifier: MIT

//! Structural sanitization of documents before persistence.
//!
//! Firestore accepts only plain, finitely nested documents: no shared or
//! self-referential subtrees, nothing deeper than its hard nesting limit.
//! Everything headed for storage passes through [`sanitize`], which copies
//! a document graph into a plain JSON tree, breaking reference cycles and
//! bounding depth along the way.
//!
//! The input is a graph of reference-counted nodes rather than a
//! `serde_json::Value`, because cycle breaking is an identity question:
//! the same node reached again *on the current path* is a cycle and
//! becomes [`CIRCULAR_MARKER`]; an equal-looking but distinct node is just
//! data and is copied normally.

use serde_json::Value;
use std::sync::{Arc, RwLock};

/// Nesting ceiling for sanitized documents. Matches Firestore's own
/// maximum map nesting depth, so nothing truncated here would have
/// survived the write anyway.
pub const MAX_DEPTH: usize = 20;

/// Replaces a node already present on the current path.
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// Replaces a composite nested beyond [`MAX_DEPTH`]. Keeping this bounded
/// also bounds the sanitizer's own recursion.
pub const MAX_DEPTH_MARKER: &str = "[MaxDepth]";

/// A node in a document graph. Cloning a `Node` clones the handle, not
/// the subtree, so one node can appear in several places, including
/// beneath itself.
#[derive(Debug, Clone)]
pub struct Node(Arc<RwLock<NodeValue>>);

#[derive(Debug, Clone)]
enum NodeValue {
    /// Null, bool, number or string. Passes through unchanged.
    Scalar(Value),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

impl Node {
    pub fn scalar(value: Value) -> Node {
        Node(Arc::new(RwLock::new(NodeValue::Scalar(value))))
    }

    pub fn array(items: Vec<Node>) -> Node {
        Node(Arc::new(RwLock::new(NodeValue::Array(items))))
    }

    pub fn object(entries: Vec<(String, Node)>) -> Node {
        Node(Arc::new(RwLock::new(NodeValue::Object(entries))))
    }

    /// Build an (acyclic) graph from plain JSON.
    pub fn from_json(value: &Value) -> Node {
        match value {
            Value::Array(items) => Node::array(items.iter().map(Node::from_json).collect()),
            Value::Object(map) => Node::object(
                map.iter()
                    .map(|(key, child)| (key.clone(), Node::from_json(child)))
                    .collect(),
            ),
            scalar => Node::scalar(scalar.clone()),
        }
    }

    /// Append an entry to an object node. No-op on other node kinds.
    pub fn insert(&self, key: impl Into<String>, child: Node) {
        if let NodeValue::Object(entries) = &mut *write(&self.0) {
            entries.push((key.into(), child));
        }
    }

    /// Append an element to an array node. No-op on other node kinds.
    pub fn push(&self, child: Node) {
        if let NodeValue::Array(items) = &mut *write(&self.0) {
            items.push(child);
        }
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

// The sanitizer must never panic, so a poisoned lock (only possible if a
// producer panicked mid-mutation) is read through rather than unwrapped.
fn read(lock: &RwLock<NodeValue>) -> std::sync::RwLockReadGuard<'_, NodeValue> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write(lock: &RwLock<NodeValue>) -> std::sync::RwLockWriteGuard<'_, NodeValue> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Copy a document graph into a plain JSON tree safe for storage.
///
/// Terminates on any input: cycles collapse to [`CIRCULAR_MARKER`] and
/// composites deeper than [`MAX_DEPTH`] collapse to [`MAX_DEPTH_MARKER`].
/// Acyclic input within the ceiling round-trips structurally unchanged.
pub fn sanitize(node: &Node) -> Value {
    sanitize_at(node, 0, &mut Vec::new())
}

/// Convenience for callers holding plain JSON (already acyclic; only the
/// depth bound applies).
pub fn sanitize_json(value: &Value) -> Value {
    sanitize(&Node::from_json(value))
}

fn sanitize_at(node: &Node, depth: usize, path: &mut Vec<usize>) -> Value {
    // Snapshot the node (child handles only, not subtrees) so no lock is
    // held while recursing; a cycle would otherwise re-acquire a lock
    // already held further up the stack.
    let snapshot = read(&node.0).clone();

    match snapshot {
        NodeValue::Scalar(value) => value,
        NodeValue::Array(items) => composite(node, depth, path, |path| {
            Value::Array(
                items
                    .iter()
                    .map(|child| sanitize_at(child, depth + 1, path))
                    .collect(),
            )
        }),
        NodeValue::Object(entries) => composite(node, depth, path, |path| {
            let mut map = serde_json::Map::with_capacity(entries.len());
            for (key, child) in &entries {
                map.insert(key.clone(), sanitize_at(child, depth + 1, path));
            }
            Value::Object(map)
        }),
    }
}

/// Shared guard logic for arrays and objects: cycle check, depth check,
/// then rebuild with this node on the path.
fn composite(
    node: &Node,
    depth: usize,
    path: &mut Vec<usize>,
    rebuild: impl FnOnce(&mut Vec<usize>) -> Value,
) -> Value {
    if depth > MAX_DEPTH {
        return Value::String(MAX_DEPTH_MARKER.to_string());
    }

    let id = node.id();
    if path.contains(&id) {
        return Value::String(CIRCULAR_MARKER.to_string());
    }

    path.push(id);
    let rebuilt = rebuild(path);
    path.pop();
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(sanitize_json(&json!(null)), json!(null));
        assert_eq!(sanitize_json(&json!(42)), json!(42));
        assert_eq!(sanitize_json(&json!("hi")), json!("hi"));
        assert_eq!(sanitize_json(&json!(true)), json!(true));
    }

    #[test]
    fn test_shared_subtree_is_not_a_cycle() {
        // The same node under two sibling keys is aliasing, not a cycle:
        // both occurrences are copied out in full.
        let shared = Node::object(vec![("x".into(), Node::scalar(json!(1)))]);
        let root = Node::object(vec![("a".into(), shared.clone()), ("b".into(), shared)]);

        let out = sanitize(&root);
        assert_eq!(out, json!({ "a": { "x": 1 }, "b": { "x": 1 } }));
    }
}
