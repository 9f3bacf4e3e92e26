//! The sorted container: a plain (unbalanced) binary search tree of [`Record`]s.
//!
//! Every node is exclusively owned through an `Option<Box<Node>>` link, either
//! by its parent or by the tree's root slot. Mutating walks carry a cursor to
//! the slot that owns the current node instead of parent pointers, so the
//! structure never contains a cycle or a back-reference.

use crate::record::Record;
use std::cmp::Ordering;
use std::io::{self, Write};

type Link = Option<Box<Node>>;

/// A tree vertex owning one record and up to two children.
#[derive(Debug)]
pub struct Node {
    record: Record,
    left: Link,
    right: Link,
}

impl Node {
    fn new(record: Record) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }
}

/// Result of [`Tree::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record now lives in a new node.
    Inserted,
    /// An equivalent record was already present; the new one was dropped.
    Duplicate,
    /// The tree refused to allocate another node; the record was dropped.
    AllocationFailed,
}

/// Ordered container of unique records.
#[derive(Debug, Default)]
pub struct Tree {
    root: Link,
    len: usize,
    node_limit: Option<usize>,
}

impl Tree {
    /// Create an empty tree without a node limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree that refuses to hold more than `limit` nodes.
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            root: None,
            len: 0,
            node_limit: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Insert `record`, taking ownership of it.
    ///
    /// Walks down from the root until an empty slot is found and links a new
    /// node there. If an equivalent record is met on the way, `record` is
    /// dropped and the tree stays as it was.
    pub fn insert(&mut self, record: Record) -> InsertOutcome {
        let mut slot = &mut self.root;
        loop {
            let ordering = match slot.as_deref() {
                Some(node) => record.cmp(&node.record),
                None => break,
            };
            slot = match (ordering, slot) {
                (Ordering::Equal, _) => return InsertOutcome::Duplicate,
                (Ordering::Less, Some(node)) => &mut node.left,
                (Ordering::Greater, Some(node)) => &mut node.right,
                (_, vacant) => vacant,
            };
        }

        if self.node_limit.is_some_and(|limit| self.len >= limit) {
            log::warn!("node limit reached, dropping {record}");
            return InsertOutcome::AllocationFailed;
        }

        *slot = Some(Box::new(Node::new(record)));
        self.len += 1;
        InsertOutcome::Inserted
    }

    /// Check whether a record equivalent to `record` is stored.
    pub fn contains(&self, record: &Record) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match record.cmp(&node.record) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Remove the record equivalent to `record`, if any.
    ///
    /// `record` is only used as a lookup key and stays with the caller.
    /// Returns `true` iff a node was removed.
    pub fn erase(&mut self, record: &Record) -> bool {
        let mut slot = &mut self.root;
        loop {
            let ordering = match slot.as_deref() {
                Some(node) => record.cmp(&node.record),
                None => return false,
            };
            slot = match (ordering, slot) {
                (Ordering::Equal, found) => {
                    Self::unlink(found);
                    self.len -= 1;
                    return true;
                }
                (Ordering::Less, Some(node)) => &mut node.left,
                (Ordering::Greater, Some(node)) => &mut node.right,
                (_, None) => return false,
            };
        }
    }

    /// Remove the node owned by `slot`, keeping the BST property.
    fn unlink(slot: &mut Link) {
        let Some(mut node) = slot.take() else {
            return;
        };
        match (node.left.take(), node.right.take()) {
            (None, right) => *slot = right,
            (left, None) => *slot = left,
            (Some(left), Some(mut right)) => {
                node.left = Some(left);
                if right.left.is_none() {
                    // Successor is the direct right child: its right subtree
                    // takes over the right slot of the removed node.
                    let Node {
                        record, right: rest, ..
                    } = *right;
                    node.record = record;
                    node.right = rest;
                } else {
                    // Successor sits deeper; its parent's left slot is rewired.
                    if let Some(successor) = Self::take_leftmost(&mut right.left) {
                        node.record = successor.record;
                    }
                    node.right = Some(right);
                }
                *slot = Some(node);
            }
        }
    }

    /// Detach the leftmost node of the subtree owned by `slot`, replacing it
    /// with its right child.
    fn take_leftmost(mut slot: &mut Link) -> Option<Box<Node>> {
        while slot.as_ref()?.left.is_some() {
            slot = &mut slot.as_mut()?.left;
        }
        let mut node = slot.take()?;
        *slot = node.right.take();
        Some(node)
    }

    /// Release every node and record, leaving an empty tree.
    pub fn clear(&mut self) {
        let mut pending: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.len = 0;
    }

    /// Records in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Write the indented pre-order dump of the tree.
    ///
    /// Each line is `depth` spaces, one more space, then either the record or
    /// `(nil)` for an absent child.
    pub fn print(&self, out: &mut dyn Write) -> io::Result<()> {
        let mut pending = vec![(self.root.as_deref(), 0usize)];
        while let Some((node, depth)) = pending.pop() {
            write!(out, "{:depth$} ", "")?;
            match node {
                Some(node) => {
                    writeln!(out, "{}", node.record)?;
                    pending.push((node.right.as_deref(), depth + 1));
                    pending.push((node.left.as_deref(), depth + 1));
                }
                None => writeln!(out, "(nil)")?,
            }
        }
        Ok(())
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the records of a [`Tree`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.record)
    }
}
