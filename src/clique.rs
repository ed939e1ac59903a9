//! Clique values and the validated extension that grows them.
//!
//! A [`Clique`] can only be created empty, as a singleton, or by
//! [`Clique::extend`], which checks the new node against every member. That
//! keeps "all members pairwise adjacent" true by construction.

use crate::bitset::Bitset;
use crate::graph::{Graph, GraphError};

/// Indexing convention of a caller-supplied node list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexBase {
    /// Nodes are numbered `0..n`.
    #[default]
    Zero,
    /// Nodes are numbered `1..=n`, as in graph files.
    One,
}

impl IndexBase {
    #[inline]
    const fn offset(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

// ============================================================================
// Clique
// ============================================================================

/// A set of pairwise adjacent nodes together with its cardinality.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Clique {
    members: Bitset,
    len: usize,
}

impl Clique {
    /// The empty clique over a graph with `node_count` nodes.
    pub fn empty(node_count: usize) -> Self {
        Self {
            members: Bitset::new(node_count),
            len: 0,
        }
    }

    /// The clique `{node}`.
    pub fn singleton(node_count: usize, node: usize) -> Self {
        let mut members = Bitset::new(node_count);
        members.insert(node);
        Self { members, len: 1 }
    }

    /// Returns a new clique with `node` added, or `None` if `node` is already a
    /// member or is not adjacent to every member.
    ///
    /// `self` is left untouched.
    #[inline]
    pub fn extend(&self, graph: &Graph, node: usize) -> Option<Clique> {
        if self.members.contains(node) {
            return None;
        }
        if !self.members.is_subset(graph.neighbors(node)) {
            return None;
        }
        let mut members = self.members.clone();
        members.insert(node);
        Some(Self {
            members,
            len: self.len + 1,
        })
    }

    /// Cardinality.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for the empty clique.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether `node` is a member.
    #[inline(always)]
    pub fn contains(&self, node: usize) -> bool {
        self.members.contains(node)
    }

    /// Member bitset.
    #[inline(always)]
    pub fn members(&self) -> &Bitset {
        &self.members
    }

    /// Members as a sorted, 0-based list.
    pub fn nodes(&self) -> Vec<usize> {
        self.members.to_vec()
    }
}

// ============================================================================
// Graph-side checks
// ============================================================================

impl Graph {
    /// Returns whether the nodes in `nodes` are pairwise adjacent.
    ///
    /// Indices are interpreted according to `base`. A repeated node makes the
    /// list fail, since no node is adjacent to itself.
    ///
    /// # Errors
    /// Returns [`GraphError::NodeOutOfRange`] (with `line == 0`) if an index is
    /// outside the graph after base adjustment.
    pub fn is_clique(&self, nodes: &[usize], base: IndexBase) -> Result<bool, GraphError> {
        let offset = base.offset();
        let n = self.node_count();
        let mut resolved = Vec::with_capacity(nodes.len());
        for &node in nodes {
            match node.checked_sub(offset) {
                Some(v) if v < n => resolved.push(v),
                _ => {
                    return Err(GraphError::NodeOutOfRange {
                        line: 0,
                        node,
                        node_count: n,
                    })
                }
            }
        }
        for (i, &u) in resolved.iter().enumerate() {
            for &v in &resolved[i + 1..] {
                if !self.has_edge(u, v) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Returns whether every pair of members of `set` is adjacent.
    pub fn is_clique_set(&self, set: &Bitset) -> bool {
        set.iter().all(|v| {
            let mut others = set.clone();
            others.remove(v);
            others.is_subset(self.neighbors(v))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        // Triangles {0,1,2} and {1,2,3} sharing edge 1-2; 0-3 missing.
        Graph::from_edges(4, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)])
    }

    #[test]
    fn extend_accepts_common_neighbor() {
        let g = diamond();
        let c = Clique::singleton(4, 1);
        let c = c.extend(&g, 2).unwrap();
        let c = c.extend(&g, 3).unwrap();
        assert_eq!(c.len(), 3);
        assert_eq!(c.nodes(), vec![1, 2, 3]);
        assert!(g.is_clique_set(c.members()));
    }

    #[test]
    fn extend_rejects_non_adjacent_node() {
        let g = diamond();
        let c = Clique::singleton(4, 0).extend(&g, 1).unwrap();
        assert!(c.extend(&g, 3).is_none());
    }

    #[test]
    fn extend_rejects_existing_member() {
        let g = diamond();
        let c = Clique::singleton(4, 0).extend(&g, 1).unwrap();
        assert!(c.extend(&g, 1).is_none());
        assert!(c.extend(&g, 0).is_none());
    }

    #[test]
    fn extend_does_not_mutate_input() {
        let g = diamond();
        let base = Clique::singleton(4, 1);
        let grown = base.extend(&g, 3).unwrap();
        assert_eq!(base.len(), 1);
        assert!(!base.contains(3));
        assert!(grown.contains(3));
    }

    #[test]
    fn empty_clique_accepts_any_node() {
        let g = Graph::with_nodes(3);
        let c = Clique::empty(3);
        assert!(c.is_empty());
        let c = c.extend(&g, 2).unwrap();
        assert_eq!(c.nodes(), vec![2]);
        assert!(c.extend(&g, 0).is_none());
    }

    #[test]
    fn is_clique_zero_based() {
        let g = diamond();
        assert!(g.is_clique(&[0, 1, 2], IndexBase::Zero).unwrap());
        assert!(g.is_clique(&[3, 2, 1], IndexBase::Zero).unwrap());
        assert!(!g.is_clique(&[0, 1, 2, 3], IndexBase::Zero).unwrap());
        assert!(g.is_clique(&[], IndexBase::Zero).unwrap());
        assert!(g.is_clique(&[3], IndexBase::Zero).unwrap());
    }

    #[test]
    fn is_clique_one_based() {
        let g = diamond();
        assert!(g.is_clique(&[2, 3, 4], IndexBase::One).unwrap());
        assert!(!g.is_clique(&[1, 4], IndexBase::One).unwrap());
    }

    #[test]
    fn is_clique_rejects_duplicates() {
        let g = diamond();
        assert!(!g.is_clique(&[1, 1], IndexBase::Zero).unwrap());
    }

    #[test]
    fn is_clique_reports_out_of_range() {
        let g = diamond();
        assert!(matches!(
            g.is_clique(&[0, 4], IndexBase::Zero),
            Err(GraphError::NodeOutOfRange { node: 4, node_count: 4, .. })
        ));
        assert!(matches!(
            g.is_clique(&[0, 1], IndexBase::One),
            Err(GraphError::NodeOutOfRange { node: 0, .. })
        ));
    }

    #[test]
    fn is_clique_set_detects_missing_edge() {
        let g = diamond();
        assert!(g.is_clique_set(&Bitset::from_indices(4, [1, 2, 3])));
        assert!(!g.is_clique_set(&Bitset::from_indices(4, [0, 3])));
        assert!(g.is_clique_set(&Bitset::new(4)));
    }
}
