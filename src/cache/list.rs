//! Recency List Module
//!
//! Arena-backed doubly linked list used to order cache entries by recency.

// == Node Handle ==
/// Position of a node inside a [`RecencyList`].
///
/// A handle does not own the node. It stays valid until the node is removed,
/// after which the slot may be reused for a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

#[derive(Debug)]
struct Node<T> {
    /// None while the slot sits on the free list
    value: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Doubly linked list with O(1) push, relocate and remove.
///
/// Nodes live in a `Vec` and link to each other by index:
/// - Front (head) = Most recently used
/// - Back (tail) = Least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    nodes: Vec<Node<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Slots freed by removals, reused before the arena grows
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value as the most recently used node.
    pub fn push_front(&mut self, value: T) -> NodeHandle {
        let node = Node {
            value: Some(value),
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        NodeHandle(idx)
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Does nothing if the handle no longer points at a live node.
    pub fn move_to_front(&mut self, handle: NodeHandle) {
        if !self.is_live(handle) || self.head == Some(handle.0) {
            return;
        }
        self.unlink(handle.0);
        self.link_front(handle.0);
    }

    // == Remove ==
    /// Removes a node and returns its value.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<T> {
        if !self.is_live(handle) {
            return None;
        }
        self.unlink(handle.0);
        self.len -= 1;
        self.free.push(handle.0);
        self.nodes[handle.0].value.take()
    }

    // == Pop Back ==
    /// Removes and returns the least recently used value.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(NodeHandle(tail))
    }

    // == Back ==
    /// Returns the least recently used value without removing it.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.nodes[idx].value.as_ref())
    }

    /// Returns the most recently used value.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|idx| self.nodes[idx].value.as_ref())
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.nodes.get(handle.0).and_then(|node| node.value.as_ref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node and releases the free list.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates values from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn is_live(&self, handle: NodeHandle) -> bool {
        self.nodes
            .get(handle.0)
            .is_some_and(|node| node.value.is_some())
    }

    fn link_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        match self.head {
            Some(old) => self.nodes[old].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }
}

/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = &self.list.nodes[idx];
        self.cursor = node.next;
        node.value.as_ref()
    }
}
