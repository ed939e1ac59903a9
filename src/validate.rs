//! Deterministic checks of search results and bundled fixture graphs.

use crate::clique::IndexBase;
use crate::graph::{Graph, GraphError};
use crate::scheduler::{search, SearchConfig, SearchError, SearchOutcome};
use thiserror::Error;

/// Bundled fixtures: `(file name, contents, known clique number)`.
pub const FIXTURES: &[(&str, &str, usize)] = &[
    ("petersen.clq", include_str!("../fixtures/petersen.clq"), 2),
    ("k6.clq", include_str!("../fixtures/k6.clq"), 6),
    ("shared_triangles.clq", include_str!("../fixtures/shared_triangles.clq"), 3),
    ("wheel7.clq", include_str!("../fixtures/wheel7.clq"), 3),
    ("johnson8-2-4.clq", include_str!("../fixtures/johnson8-2-4.clq"), 4),
    ("hamming6-4.clq", include_str!("../fixtures/hamming6-4.clq"), 4),
];

/// Reasons a result or fixture fails validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The fixture text did not parse.
    #[error("{name}: {source}")]
    Parse {
        /// Fixture name.
        name: String,
        /// Underlying parse error.
        #[source]
        source: GraphError,
    },
    /// The search itself failed.
    #[error("{name}: {source}")]
    Search {
        /// Fixture name.
        name: String,
        /// Underlying search error.
        #[source]
        source: SearchError,
    },
    /// The reported nodes are not pairwise adjacent (or out of range).
    #[error("{name}: reported nodes {nodes:?} are not a clique")]
    NotAClique {
        /// Fixture name.
        name: String,
        /// Reported members (0-based).
        nodes: Vec<usize>,
    },
    /// The reported size does not match the node list.
    #[error("{name}: reported size {size} but {len} nodes")]
    SizeMismatch {
        /// Fixture name.
        name: String,
        /// Reported size.
        size: usize,
        /// Length of the node list.
        len: usize,
    },
    /// The search found a different clique number than expected.
    #[error("{name}: expected clique number {expected}, found {found}")]
    WrongCliqueNumber {
        /// Fixture name.
        name: String,
        /// Known clique number.
        expected: usize,
        /// Reported size.
        found: usize,
    },
}

// ============================================================================
// Public API
// ============================================================================

/// Runs the search on every bundled fixture and checks the clique numbers.
///
/// # Errors
/// Returns the first fixture that fails.
pub fn validate_known_graphs(config: &SearchConfig) -> Result<(), ValidationError> {
    for &(name, text, expected) in FIXTURES {
        validate_fixture(name, text, expected, config)?;
    }
    Ok(())
}

/// Parses `text`, searches it and checks the result against `expected`.
///
/// # Errors
/// Returns a [`ValidationError`] describing the first failed check.
pub fn validate_fixture(
    name: &str,
    text: &str,
    expected: usize,
    config: &SearchConfig,
) -> Result<(), ValidationError> {
    let graph = Graph::parse(text).map_err(|source| ValidationError::Parse {
        name: name.to_string(),
        source,
    })?;
    let outcome = search(&graph, config).map_err(|source| ValidationError::Search {
        name: name.to_string(),
        source,
    })?;
    verify_outcome(&graph, &outcome, name)?;
    if outcome.size != expected {
        return Err(ValidationError::WrongCliqueNumber {
            name: name.to_string(),
            expected,
            found: outcome.size,
        });
    }
    Ok(())
}

/// Checks that a reported outcome is an actual clique of `graph`.
///
/// # Errors
/// Returns [`ValidationError::SizeMismatch`] or [`ValidationError::NotAClique`].
pub fn verify_outcome(
    graph: &Graph,
    outcome: &SearchOutcome,
    name: &str,
) -> Result<(), ValidationError> {
    if outcome.size != outcome.nodes.len() {
        return Err(ValidationError::SizeMismatch {
            name: name.to_string(),
            size: outcome.size,
            len: outcome.nodes.len(),
        });
    }
    match graph.is_clique(&outcome.nodes, IndexBase::Zero) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(ValidationError::NotAClique {
            name: name.to_string(),
            nodes: outcome.nodes.clone(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SearchStats;

    fn outcome(nodes: Vec<usize>) -> SearchOutcome {
        SearchOutcome {
            size: nodes.len(),
            nodes,
            stats: SearchStats::default(),
        }
    }

    #[test]
    fn bundled_graphs_have_known_clique_numbers() {
        validate_known_graphs(&SearchConfig::default()).unwrap();
    }

    #[test]
    fn bundled_graphs_validate_single_threaded_without_prebranching() {
        let cfg = SearchConfig {
            workers: 1,
            inline_roots: 0,
            fan_out_depth: 0,
        };
        validate_known_graphs(&cfg).unwrap();
    }

    #[test]
    fn fixture_headers_match_edge_counts() {
        let g = Graph::parse(FIXTURES[4].1).unwrap();
        assert_eq!((g.node_count(), g.edge_count()), (28, 210));
        let g = Graph::parse(FIXTURES[5].1).unwrap();
        assert_eq!((g.node_count(), g.edge_count()), (64, 704));
    }

    #[test]
    fn wrong_expectation_is_reported() {
        let err = validate_fixture("k6", FIXTURES[1].1, 5, &SearchConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongCliqueNumber { expected: 5, found: 6, .. }
        ));
        assert_eq!(err.to_string(), "k6: expected clique number 5, found 6");
    }

    #[test]
    fn malformed_fixture_is_reported() {
        let err = validate_fixture("bad", "e 1 2\n", 1, &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, ValidationError::Parse { .. }));
        assert!(err.to_string().starts_with("bad: line 1"));
    }

    #[test]
    fn verify_rejects_non_clique() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]);
        assert!(verify_outcome(&g, &outcome(vec![0, 1]), "path").is_ok());
        assert!(matches!(
            verify_outcome(&g, &outcome(vec![0, 1, 2]), "path"),
            Err(ValidationError::NotAClique { .. })
        ));
        assert!(matches!(
            verify_outcome(&g, &outcome(vec![0, 7]), "path"),
            Err(ValidationError::NotAClique { .. })
        ));
    }

    #[test]
    fn verify_rejects_size_mismatch() {
        let g = Graph::from_edges(2, &[(0, 1)]);
        let mut bad = outcome(vec![0, 1]);
        bad.size = 3;
        assert!(matches!(
            verify_outcome(&g, &bad, "edge"),
            Err(ValidationError::SizeMismatch { size: 3, len: 2, .. })
        ));
    }
}
