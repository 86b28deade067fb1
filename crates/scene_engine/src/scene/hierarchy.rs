//! Intrusive parent / child links over the pool's index space
//!
//! Each index owns one [`Node`] holding its parent, its first child and its
//! two siblings. Child lists are doubly linked through the sibling fields so
//! attach and detach are O(1) and need no per-node allocation. The
//! hierarchy never owns object lifetime; it only records relationships and
//! must be resized alongside the pool.

use crate::foundation::object_pool::INVALID_INDEX;

/// Link record for one index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    parent: u32,
    first_child: u32,
    prev_sibling: u32,
    next_sibling: u32,
}

impl Node {
    /// A node with no relationships
    pub const DETACHED: Self = Self {
        parent: INVALID_INDEX,
        first_child: INVALID_INDEX,
        prev_sibling: INVALID_INDEX,
        next_sibling: INVALID_INDEX,
    };

    /// Parent index, if any
    pub fn parent(&self) -> Option<u32> {
        link(self.parent)
    }

    /// Most recently attached child, if any
    pub fn first_child(&self) -> Option<u32> {
        link(self.first_child)
    }

    /// Previous sibling in the parent's child list
    pub fn prev_sibling(&self) -> Option<u32> {
        link(self.prev_sibling)
    }

    /// Next sibling in the parent's child list
    pub fn next_sibling(&self) -> Option<u32> {
        link(self.next_sibling)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::DETACHED
    }
}

fn link(index: u32) -> Option<u32> {
    (index != INVALID_INDEX).then_some(index)
}

/// Parallel array of [`Node`]s indexed like the object pool
#[derive(Debug, Clone, Default)]
pub struct SceneHierarchy {
    nodes: Vec<Node>,
}

impl SceneHierarchy {
    /// Create an empty hierarchy
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create a hierarchy covering `len` detached nodes
    pub fn with_len(len: usize) -> Self {
        Self {
            nodes: vec![Node::DETACHED; len],
        }
    }

    /// Grow to at least `len` nodes; new nodes start detached
    pub fn resize(&mut self, len: usize) {
        if self.nodes.len() < len {
            self.nodes.resize(len, Node::DETACHED);
        }
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node is covered
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Link record for `index`
    pub fn node(&self, index: u32) -> Option<&Node> {
        self.nodes.get(index as usize)
    }

    /// Parent of `index`
    pub fn parent(&self, index: u32) -> Option<u32> {
        self.node(index).and_then(Node::parent)
    }

    /// True when `index` has no parent
    pub fn is_root(&self, index: u32) -> bool {
        self.parent(index).is_none()
    }

    /// Attach `child` under `parent`, detaching it from any previous parent
    ///
    /// The child becomes the head of the parent's child list. Passing `None`
    /// leaves the child as a root. Cycles are not checked here; see
    /// [`SceneHierarchy::is_ancestor`].
    pub fn attach(&mut self, child: u32, parent: Option<u32>) {
        self.detach(child);

        let Some(parent) = parent else { return };
        if parent as usize >= self.nodes.len() || child as usize >= self.nodes.len() {
            return;
        }

        let old_head = self.nodes[parent as usize].first_child;
        if old_head != INVALID_INDEX {
            self.nodes[old_head as usize].prev_sibling = child;
        }

        let node = &mut self.nodes[child as usize];
        node.parent = parent;
        node.prev_sibling = INVALID_INDEX;
        node.next_sibling = old_head;

        self.nodes[parent as usize].first_child = child;
    }

    /// Unlink `child` from its parent's child list
    ///
    /// The child keeps its own children. No-op for roots.
    pub fn detach(&mut self, child: u32) {
        let Some(&Node {
            parent,
            prev_sibling,
            next_sibling,
            ..
        }) = self.nodes.get(child as usize)
        else {
            return;
        };

        if prev_sibling != INVALID_INDEX {
            self.nodes[prev_sibling as usize].next_sibling = next_sibling;
        } else if parent != INVALID_INDEX && self.nodes[parent as usize].first_child == child {
            self.nodes[parent as usize].first_child = next_sibling;
        }

        if next_sibling != INVALID_INDEX {
            self.nodes[next_sibling as usize].prev_sibling = prev_sibling;
        }

        let node = &mut self.nodes[child as usize];
        node.parent = INVALID_INDEX;
        node.prev_sibling = INVALID_INDEX;
        node.next_sibling = INVALID_INDEX;
    }

    /// Detach `index` and orphan its direct children
    ///
    /// Each direct child becomes a root; grandchildren stay attached to
    /// their own parents.
    pub fn on_destroy(&mut self, index: u32) {
        self.detach(index);

        let Some(node) = self.nodes.get_mut(index as usize) else {
            return;
        };
        let mut child = node.first_child;
        node.first_child = INVALID_INDEX;

        while child != INVALID_INDEX {
            let next = self.nodes[child as usize].next_sibling;
            let orphan = &mut self.nodes[child as usize];
            orphan.parent = INVALID_INDEX;
            orphan.prev_sibling = INVALID_INDEX;
            orphan.next_sibling = INVALID_INDEX;
            child = next;
        }
    }

    /// Reset every node to the detached state
    pub fn clear(&mut self) {
        self.nodes.fill(Node::DETACHED);
    }

    /// Iterate the direct children of `parent`, most recently attached first
    pub fn children(&self, parent: u32) -> Children<'_> {
        Children {
            nodes: &self.nodes,
            next: self
                .node(parent)
                .map_or(INVALID_INDEX, |node| node.first_child),
        }
    }

    /// True when `ancestor` is `index` itself or lies on its parent chain
    ///
    /// Walks at most `len()` steps so an already-corrupt (cyclic) chain
    /// cannot spin forever.
    pub fn is_ancestor(&self, ancestor: u32, index: u32) -> bool {
        let mut current = index;
        for _ in 0..=self.nodes.len() {
            if current == ancestor {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }
}

/// Iterator over a node's direct children
#[derive(Debug, Clone)]
pub struct Children<'a> {
    nodes: &'a [Node],
    next: u32,
}

impl Iterator for Children<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let current = link(self.next)?;
        self.next = self
            .nodes
            .get(current as usize)
            .map_or(INVALID_INDEX, |node| node.next_sibling);
        Some(current)
    }
}
