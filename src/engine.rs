//! Branch-and-bound depth-first search rooted at a single clique.
//!
//! Each subtree is explored with an explicit stack of [`SearchFrame`]s rather
//! than recursion, so depth is bounded by heap memory only. Candidates for a
//! frame are the forward neighbors of the node that created it (not the
//! intersection over all ancestors); [`Clique::extend`] rejects the ones that
//! do not fit, which keeps per-frame bookkeeping constant.
//!
//! A frame keeps expanding while
//!
//! ```text
//! remaining_candidates + clique_size > global_bound
//! ```
//!
//! holds. Once it fails, even taking every remaining candidate could not beat
//! the best size known anywhere, so the frame is popped.

use crate::bitset::Bitset;
use crate::bound::GlobalBound;
use crate::clique::Clique;
use crate::graph::Graph;

// ============================================================================
// Frames
// ============================================================================

/// One level of the current search path.
#[derive(Clone, Debug)]
struct SearchFrame {
    clique: Clique,
    candidates: Bitset,
    /// Next untried candidate.
    cursor: Option<usize>,
    /// Candidates left from `cursor` onward.
    remaining: usize,
}

impl SearchFrame {
    fn new(graph: &Graph, clique: Clique, last: usize) -> Self {
        let candidates = graph.forward_neighbors(last);
        let cursor = candidates.next_set_bit(last + 1);
        let remaining = candidates.count_ones();
        Self {
            clique,
            candidates,
            cursor,
            remaining,
        }
    }

    #[inline]
    fn advance(&mut self, consumed: usize) {
        self.cursor = self.candidates.next_set_bit(consumed + 1);
        self.remaining -= 1;
    }
}

// ============================================================================
// SearchEngine
// ============================================================================

/// Best clique of one subtree plus how much work it took.
#[derive(Clone, Debug)]
pub struct SubtreeResult {
    /// Largest clique found in the subtree (at least the starting clique).
    pub best: Clique,
    /// Number of accepted extensions (frames pushed).
    pub expansions: u64,
}

/// Sequential searcher over one subtree, sharing a [`GlobalBound`] with its
/// siblings.
#[derive(Clone, Copy, Debug)]
pub struct SearchEngine<'a> {
    graph: &'a Graph,
    bound: &'a GlobalBound,
}

impl<'a> SearchEngine<'a> {
    /// Creates an engine over `graph` publishing to `bound`.
    pub fn new(graph: &'a Graph, bound: &'a GlobalBound) -> Self {
        Self { graph, bound }
    }

    /// Explores every clique whose lowest member is `root`.
    pub fn search_root(&self, root: usize) -> SubtreeResult {
        let start = Clique::singleton(self.graph.node_count(), root);
        self.search_from(start, root)
    }

    /// Explores every clique that extends `start` using nodes above `last`.
    ///
    /// `last` must be the highest member of `start`.
    pub fn search_from(&self, start: Clique, last: usize) -> SubtreeResult {
        debug_assert!(start.contains(last));
        debug_assert!(start.members().next_set_bit(last + 1).is_none());

        let mut best = start.clone();
        self.bound.offer(best.len());
        let mut expansions = 0u64;
        let mut stack = vec![SearchFrame::new(self.graph, start, last)];

        while let Some(top) = stack.last_mut() {
            let bound = self.bound.read();
            let candidate = match top.cursor {
                Some(c) if top.remaining + top.clique.len() > bound => c,
                _ => {
                    stack.pop();
                    continue;
                }
            };
            top.advance(candidate);

            let Some(grown) = top.clique.extend(self.graph, candidate) else {
                continue;
            };
            expansions += 1;
            if grown.len() > best.len() {
                best = grown.clone();
                self.bound.offer(best.len());
            }
            stack.push(SearchFrame::new(self.graph, grown, candidate));
        }

        SubtreeResult { best, expansions }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{brute_force_clique_number, complete_graph};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn search_all_roots(graph: &Graph) -> Clique {
        let bound = GlobalBound::default();
        let engine = SearchEngine::new(graph, &bound);
        let mut best = Clique::empty(graph.node_count());
        for root in (0..graph.node_count()).rev() {
            let result = engine.search_root(root);
            assert!(graph.is_clique_set(result.best.members()));
            if result.best.len() > best.len() {
                best = result.best;
            }
        }
        best
    }

    #[test]
    fn frame_counts_forward_candidates() {
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (1, 4), (0, 3)]);
        let frame = SearchFrame::new(&g, Clique::singleton(5, 1), 1);
        assert_eq!(frame.cursor, Some(2));
        assert_eq!(frame.remaining, 2);
    }

    #[test]
    fn isolated_root_returns_itself() {
        let g = Graph::with_nodes(3);
        let bound = GlobalBound::default();
        let result = SearchEngine::new(&g, &bound).search_root(1);
        assert_eq!(result.best.nodes(), vec![1]);
        assert_eq!(result.expansions, 0);
        assert_eq!(bound.read(), 1);
    }

    #[test]
    fn complete_graph_is_found_from_lowest_root() {
        let g = complete_graph(9);
        let bound = GlobalBound::default();
        let result = SearchEngine::new(&g, &bound).search_root(0);
        assert_eq!(result.best.len(), 9);
        assert_eq!(bound.read(), 9);
    }

    #[test]
    fn roots_only_see_higher_indices() {
        let g = complete_graph(6);
        let bound = GlobalBound::default();
        let result = SearchEngine::new(&g, &bound).search_root(3);
        assert_eq!(result.best.nodes(), vec![3, 4, 5]);
    }

    #[test]
    fn shared_edge_triangles_give_three() {
        let g = Graph::from_edges(
            5,
            &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (2, 4), (3, 4)],
        );
        let best = search_all_roots(&g);
        assert_eq!(best.len(), 3);
    }

    #[test]
    fn search_from_continues_a_partial_clique() {
        let g = complete_graph(5);
        let bound = GlobalBound::default();
        let start = Clique::singleton(5, 0).extend(&g, 2).unwrap();
        let result = SearchEngine::new(&g, &bound).search_from(start, 2);
        assert_eq!(result.best.nodes(), vec![0, 2, 3, 4]);
    }

    #[test]
    fn high_bound_prunes_everything() {
        let g = complete_graph(6);
        let bound = GlobalBound::new(10);
        let result = SearchEngine::new(&g, &bound).search_root(0);
        assert_eq!(result.best.len(), 1);
        assert_eq!(result.expansions, 0);
        assert_eq!(bound.read(), 10);
    }

    #[test]
    fn star_prunes_last_leaf() {
        // Star: center 0, leaves 1..=4.
        let g = Graph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let bound = GlobalBound::default();
        let engine = SearchEngine::new(&g, &bound);
        let result = engine.search_root(0);
        assert_eq!(result.best.len(), 2);
        // Leaves 1, 2, 3 are expanded; with one candidate left, 1 + 1 > 2
        // fails and leaf 4 is pruned.
        assert_eq!(result.expansions, 3);
        assert_eq!(engine.search_root(1).best.nodes(), vec![1]);
    }

    #[test]
    fn matches_brute_force_on_random_graphs() {
        let mut rng = XorShiftRng::seed_from_u64(0xB0B);
        for case in 0..60 {
            let n = 4 + case % 15;
            let p = [0.2, 0.5, 0.8][case % 3];
            let g = Graph::random(&mut rng, n, p);
            let best = search_all_roots(&g);
            assert_eq!(
                best.len(),
                brute_force_clique_number(&g),
                "case {case} n={n} p={p}"
            );
        }
    }
}
