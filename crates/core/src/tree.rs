//! Binary hash tree over an ordered leaf sequence
//!
//! Nodes live in a flat arena and refer to their children by index, so
//! construction and traversal never recurse. Levels are reduced pairwise
//! left-to-right; when a level has odd length its last node is carried to
//! the next level as-is (same node, same digest).

use crate::error::{Error, Result};
use crate::hash::{Digest, HashAlgorithm, DIGEST_LEN};
use tracing::debug;

/// Index of a node inside a [`HashTree`]
pub type NodeId = usize;

/// One node of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    digest: Digest,
    /// (left, right); both present or both absent
    children: Option<(NodeId, NodeId)>,
}

impl TreeNode {
    fn leaf(digest: Digest) -> Self {
        Self {
            digest,
            children: None,
        }
    }

    fn internal(digest: Digest, left: NodeId, right: NodeId) -> Self {
        Self {
            digest,
            children: Some((left, right)),
        }
    }

    /// Digest committed by this node
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Left child id, `None` for leaf nodes
    pub fn left(&self) -> Option<NodeId> {
        self.children.map(|(left, _)| left)
    }

    /// Right child id, `None` for leaf nodes
    pub fn right(&self) -> Option<NodeId> {
        self.children.map(|(_, right)| right)
    }

    /// True when the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// An immutable hash tree built in one pass
#[derive(Debug, Clone)]
pub struct HashTree {
    algorithm: HashAlgorithm,
    nodes: Vec<TreeNode>,
    /// Node ids per level; level 0 holds the leaves, the last level the root
    levels: Vec<Vec<NodeId>>,
    root: NodeId,
}

impl HashTree {
    /// The root node
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root]
    }

    /// The commitment value
    pub fn root_digest(&self) -> Digest {
        self.nodes[self.root].digest
    }

    /// Id of the root node
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Left child of a node
    pub fn left(&self, id: NodeId) -> Option<&TreeNode> {
        self.node(id)?.left().and_then(|child| self.node(child))
    }

    /// Right child of a node
    pub fn right(&self, id: NodeId) -> Option<&TreeNode> {
        self.node(id)?.right().and_then(|child| self.node(child))
    }

    /// Number of leaves the tree was built from
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Digest of the leaf at `index` in input order
    pub fn leaf_digest(&self, index: usize) -> Option<Digest> {
        self.levels[0].get(index).map(|&id| self.nodes[id].digest)
    }

    /// Leaf digests in input order
    pub fn leaf_digests(&self) -> impl Iterator<Item = Digest> + '_ {
        self.levels[0].iter().map(move |&id| self.nodes[id].digest)
    }

    /// Node ids level by level, leaves first
    pub fn levels(&self) -> &[Vec<NodeId>] {
        &self.levels
    }

    /// Number of levels, counting the leaf level and the root level
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Total number of distinct nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Algorithm the tree was built with
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

/// Builds hash trees with a fixed digest algorithm
///
/// The builder holds no mutable state and may be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder {
    algorithm: HashAlgorithm,
}

impl TreeBuilder {
    /// Create a builder for the given algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Algorithm used for every node
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Build a tree from an ordered, non-empty leaf sequence
    ///
    /// # Errors
    /// * `Error::EmptyInput` - `leaves` yielded nothing
    pub fn build<I, L>(&self, leaves: I) -> Result<HashTree>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut nodes = Vec::new();
        let mut leaf_ids = Vec::new();

        for leaf in leaves {
            leaf_ids.push(nodes.len());
            nodes.push(TreeNode::leaf(self.algorithm.digest(leaf.as_ref())));
        }

        if leaf_ids.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut levels = vec![leaf_ids];

        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);

            for pair in level.chunks(2) {
                if let [left, right] = *pair {
                    let digest = self.hash_children(&nodes[left].digest, &nodes[right].digest);
                    next.push(nodes.len());
                    nodes.push(TreeNode::internal(digest, left, right));
                } else {
                    // Odd node out: promote without re-hashing
                    next.push(pair[0]);
                }
            }

            levels.push(next);
        }

        // Loop exits on a single-node level
        let root = levels[levels.len() - 1][0];
        let tree = HashTree {
            algorithm: self.algorithm,
            nodes,
            levels,
            root,
        };

        debug!(
            leaves = tree.leaf_count(),
            height = tree.height(),
            algorithm = %self.algorithm,
            root = %tree.root_digest(),
            "built hash tree"
        );

        Ok(tree)
    }

    /// Rebuild from `leaves` and compare against an expected root
    pub fn verify<I, L>(&self, leaves: I, expected_root: &Digest) -> Result<bool>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let tree = self.build(leaves)?;
        Ok(tree.root_digest() == *expected_root)
    }

    /// H(left ‖ right) over the two fixed-length digests
    fn hash_children(&self, left: &Digest, right: &Digest) -> Digest {
        let mut buf = [0u8; DIGEST_LEN * 2];
        buf[..DIGEST_LEN].copy_from_slice(left.as_bytes());
        buf[DIGEST_LEN..].copy_from_slice(right.as_bytes());
        self.algorithm.digest(&buf)
    }
}

/// Build a tree with the default algorithm (SHA-256)
pub fn build<I, L>(leaves: I) -> Result<HashTree>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    TreeBuilder::default().build(leaves)
}

/// Rebuild with the default algorithm and compare against `expected_root`
pub fn verify<I, L>(leaves: I, expected_root: &Digest) -> Result<bool>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    TreeBuilder::default().verify(leaves, expected_root)
}
