//! # Maximum Clique Search Engine
//!
//! An exact, parallel branch-and-bound solver for the maximum-clique problem on
//! undirected graphs.
//!
//! This crate provides:
//! - A bitset adjacency [`Graph`](graph::Graph) built from the line-oriented
//!   `p`/`e` edge-list format used by DIMACS clique benchmarks.
//! - A validated [`Clique`](clique::Clique) value that only grows through
//!   adjacency-checked extension.
//! - An explicit-stack depth-first [`SearchEngine`](engine::SearchEngine) with
//!   size-based pruning against a shared [`GlobalBound`](bound::GlobalBound).
//! - A rayon-backed scheduler that runs one task per root, optionally fanning
//!   low-index roots out into sub-tasks.
//!
//! ## Quick Start
//!
//! ```
//! use maxclique::graph::Graph;
//! use maxclique::scheduler::{search, SearchConfig};
//!
//! let text = "p edge 5 7\ne 1 2\ne 1 3\ne 2 3\ne 2 4\ne 3 4\ne 3 5\ne 4 5\n";
//! let graph = Graph::parse(text).unwrap();
//!
//! let cfg = SearchConfig {
//!     workers: 2,
//!     ..Default::default()
//! };
//! let outcome = search(&graph, &cfg).unwrap();
//! assert_eq!(outcome.size, 3);
//! ```
//!
//! ## Working with Graphs Directly
//!
//! ```
//! use maxclique::clique::{Clique, IndexBase};
//! use maxclique::graph::Graph;
//!
//! let mut graph = Graph::with_nodes(4);
//! graph.add_edge(0, 1);
//! graph.add_edge(1, 2);
//! graph.add_edge(0, 2);
//! assert!(!graph.add_edge(2, 0)); // already present
//!
//! assert_eq!(graph.edge_count(), 3);
//! assert!(graph.is_clique(&[1, 2, 3], IndexBase::One).unwrap());
//!
//! let triangle = Clique::singleton(4, 0)
//!     .extend(&graph, 1)
//!     .and_then(|c| c.extend(&graph, 2))
//!     .unwrap();
//! assert_eq!(triangle.nodes(), vec![0, 1, 2]);
//! assert!(triangle.extend(&graph, 3).is_none());
//! ```
//!
//! ## Modules
//!
//! - [`bitset`]: fixed-width `u64`-word bit vectors.
//! - [`graph`]: adjacency storage, parsing and degree queries.
//! - [`clique`]: clique values and validity checks.
//! - [`bound`]: the shared pruning register.
//! - [`engine`]: branch-and-bound over one rooted subtree.
//! - [`scheduler`]: parallel task distribution and reduction.
//! - [`validate`]: result verification and bundled fixture checks.
//!
//! ## Performance Notes
//!
//! - Each clique is discovered once, from its lowest-index member.
//! - The pruning bound is read without synchronization; stale reads only delay
//!   pruning.
//! - For maximum performance, compile with: `RUSTFLAGS="-C target-cpu=native" cargo build --release`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::doc_markdown)] // LaTeX-style notation in docs
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod bitset;
pub mod bound;
pub mod clique;
pub mod engine;
pub mod graph;
pub mod scheduler;
pub mod validate;

#[cfg(test)]
mod testutil;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::clique::{Clique, IndexBase};
    pub use crate::graph::{Graph, GraphError};
    pub use crate::scheduler::{
        max_clique, search, search_sequential, SearchConfig, SearchError, SearchOutcome,
    };
    pub use crate::validate::validate_known_graphs;
}
