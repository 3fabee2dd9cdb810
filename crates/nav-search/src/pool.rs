//! Pooled search-tree arena.
//!
//! Search-tree nodes live in a dense `Vec` addressed by `u32` index; parent
//! and child links are indices, so the tree has no pointers and no cycles and
//! can be discarded in O(1) by [`NodePool::reset`].  Slots beyond `len` keep
//! their allocations (including each node's `children` vector), so a worker
//! that runs thousands of searches stops allocating once it has seen its
//! largest one.

/// One node of the search tree.
#[derive(Clone, Debug)]
pub struct SearchNode<N> {
    /// The graph node this tree node stands for.
    pub node: N,
    /// Index of the parent tree node; `None` for the root.
    pub parent: Option<u32>,
    /// Indices of tree nodes whose `parent` is this node.
    pub children: Vec<u32>,
    /// Ordering cost the node was queued with.
    pub cost: f32,
    /// Path length accumulated from the root.
    pub path_len: f32,
}

/// Reusable slab of [`SearchNode`]s owned by a single search engine.
#[derive(Clone, Debug)]
pub struct NodePool<N> {
    nodes: Vec<SearchNode<N>>,
    len:   usize,
}

impl<N: Copy> NodePool<N> {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), len: 0 }
    }

    /// Forget every node.  Storage is kept for the next search.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Nodes handed out since the last reset.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots ever allocated (live + recyclable).
    #[inline]
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    /// Hand out a node, recycling a previously allocated slot when possible,
    /// and link it under `parent`.
    pub fn alloc(&mut self, node: N, parent: Option<u32>, cost: f32, path_len: f32) -> u32 {
        let idx = self.len as u32;
        if self.len < self.nodes.len() {
            let slot = &mut self.nodes[self.len];
            slot.node = node;
            slot.parent = parent;
            slot.children.clear();
            slot.cost = cost;
            slot.path_len = path_len;
        } else {
            self.nodes.push(SearchNode {
                node,
                parent,
                children: Vec::new(),
                cost,
                path_len,
            });
        }
        self.len += 1;

        if let Some(p) = parent {
            self.nodes[p as usize].children.push(idx);
        }
        idx
    }

    /// Move `idx` under `new_parent` with updated cost and path length.
    pub fn reparent(&mut self, idx: u32, new_parent: u32, cost: f32, path_len: f32) {
        if let Some(old) = self.nodes[idx as usize].parent {
            let siblings = &mut self.nodes[old as usize].children;
            if let Some(pos) = siblings.iter().position(|&c| c == idx) {
                siblings.swap_remove(pos);
            }
        }
        self.nodes[new_parent as usize].children.push(idx);

        let node = &mut self.nodes[idx as usize];
        node.parent = Some(new_parent);
        node.cost = cost;
        node.path_len = path_len;
    }

    /// The live node at `idx`.
    ///
    /// # Panics
    /// Panics if `idx` was not handed out since the last reset.
    #[inline]
    pub fn get(&self, idx: u32) -> &SearchNode<N> {
        assert!((idx as usize) < self.len, "search node {idx} is not live");
        &self.nodes[idx as usize]
    }

    #[inline]
    pub fn children(&self, idx: u32) -> &[u32] {
        &self.get(idx).children
    }

    /// Number of nodes on the path from the root to `idx`, inclusive.
    pub fn depth(&self, idx: u32) -> usize {
        self.ancestors(idx).count()
    }

    /// `idx`, its parent, its grandparent, … up to and including the root.
    pub fn ancestors(&self, idx: u32) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors(Some(idx), move |&i| self.get(i).parent)
    }

    /// Live nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode<N>> + '_ {
        self.nodes[..self.len].iter()
    }
}

impl<N: Copy> Default for NodePool<N> {
    fn default() -> Self {
        Self::new()
    }
}
