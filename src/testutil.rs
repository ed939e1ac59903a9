//! Shared helpers for unit tests.

use crate::graph::Graph;

/// The complete graph on `n` nodes.
pub(crate) fn complete_graph(n: usize) -> Graph {
    let mut g = Graph::with_nodes(n);
    for i in 0..n {
        for j in (i + 1)..n {
            g.add_edge(i, j);
        }
    }
    g
}

/// A star: center `0` joined to leaves `1..=leaves`.
pub(crate) fn star_graph(leaves: usize) -> Graph {
    let mut g = Graph::with_nodes(leaves + 1);
    for leaf in 1..=leaves {
        g.add_edge(0, leaf);
    }
    g
}

/// Clique number by enumerating every subset. Only for `n <= 20`.
pub(crate) fn brute_force_clique_number(graph: &Graph) -> usize {
    let n = graph.node_count();
    assert!(n <= 20, "brute force is limited to 20 nodes");
    let adj: Vec<u32> = (0..n)
        .map(|v| graph.neighbors(v).iter().fold(0u32, |m, u| m | (1 << u)))
        .collect();

    let mut best = 0usize;
    for subset in 0u32..(1u32 << n) {
        let size = subset.count_ones() as usize;
        if size <= best {
            continue;
        }
        let mut t = subset;
        let mut ok = true;
        while t != 0 {
            let v = t.trailing_zeros() as usize;
            t &= t - 1;
            if adj[v] & subset != subset & !(1 << v) {
                ok = false;
                break;
            }
        }
        if ok {
            best = size;
        }
    }
    best
}
