//! Immutable bitset adjacency storage, DIMACS-style parsing and simple queries.

use crate::bitset::Bitset;
use rand::Rng;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building or querying a [`Graph`].
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A second `p` line was found.
    #[error("line {line}: problem size declared more than once")]
    DuplicateSize {
        /// Offending line.
        line: usize,
    },
    /// An `e` line appeared before the `p` line.
    #[error("line {line}: edge declared before the problem size")]
    EdgeBeforeSize {
        /// Offending line.
        line: usize,
    },
    /// The input never declared a problem size.
    #[error("no problem size (`p`) line found")]
    MissingSize,
    /// A required whitespace-separated field is absent.
    #[error("line {line}: missing field {field}")]
    MissingField {
        /// Offending line.
        line: usize,
        /// 1-based field position.
        field: usize,
    },
    /// A field that must be a non-negative integer is not one.
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber {
        /// Offending line.
        line: usize,
        /// The raw field text.
        value: String,
    },
    /// A node index outside the declared range.
    ///
    /// `line` is `0` when the index came from a query rather than a file.
    #[error("line {line}: node {node} out of range for a graph with {node_count} nodes")]
    NodeOutOfRange {
        /// Offending line (0 for queries).
        line: usize,
        /// The index as written (before base adjustment).
        node: usize,
        /// Declared node count.
        node_count: usize,
    },
    /// An edge from a node to itself.
    #[error("line {line}: self-loop on node {node}")]
    SelfLoop {
        /// Offending line.
        line: usize,
        /// The node as written.
        node: usize,
    },
    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Graph
// ============================================================================

/// An undirected simple graph stored as one neighbor [`Bitset`] per node.
///
/// Invariants:
/// - `adj[i].contains(j) == adj[j].contains(i)` for all `i, j`.
/// - `!adj[i].contains(i)`.
/// - `degrees[i] == adj[i].count_ones()`.
/// - `edge_count` counts each unordered pair once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    adj: Vec<Bitset>,
    degrees: Vec<usize>,
    edge_count: usize,
}

impl Graph {
    /// Creates an edgeless graph on `n` nodes.
    pub fn with_nodes(n: usize) -> Self {
        Self {
            adj: vec![Bitset::new(n); n],
            degrees: vec![0; n],
            edge_count: 0,
        }
    }

    /// Builds a graph from 0-based edge pairs.
    ///
    /// # Panics
    /// Panics if an endpoint is out of range or an edge is a self-loop.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::with_nodes(n);
        for &(u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Samples an Erdős–Rényi graph \(G(n, p)\).
    pub fn random<R: Rng>(rng: &mut R, n: usize, p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "p must be in [0, 1]");
        let mut graph = Self::with_nodes(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_bool(p) {
                    graph.add_edge(i, j);
                }
            }
        }
        graph
    }

    /// Inserts the undirected edge `{u, v}`.
    ///
    /// Returns `false` (and changes nothing) if the edge was already present in
    /// either direction.
    ///
    /// # Panics
    /// Panics if `u == v` or either index is out of range.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        assert_ne!(u, v, "self-loop on node {u}");
        if !self.adj[u].insert(v) {
            return false;
        }
        self.adj[v].insert(u);
        self.degrees[u] += 1;
        self.degrees[v] += 1;
        self.edge_count += 1;
        true
    }

    /// Parses the line-oriented `p`/`e` edge-list format.
    ///
    /// Rules:
    /// - A line whose first token is `p` declares the node count in its third
    ///   field. It must appear exactly once, before any edge.
    /// - A line whose first token is `e` declares an edge between the 1-based
    ///   nodes in its second and third fields.
    /// - Every other line is ignored.
    ///
    /// # Errors
    /// Returns a [`GraphError`] naming the offending line. No partial graph is
    /// returned.
    pub fn parse(text: &str) -> Result<Self, GraphError> {
        let mut builder = Parser::default();
        for (idx, line) in text.lines().enumerate() {
            builder.feed(idx + 1, line)?;
        }
        builder.finish()
    }

    /// Parses a graph from a buffered reader.
    ///
    /// # Errors
    /// Returns [`GraphError::Io`] on read failure or any parse error.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, GraphError> {
        let mut builder = Parser::default();
        for (idx, line) in reader.lines().enumerate() {
            builder.feed(idx + 1, &line?)?;
        }
        builder.finish()
    }

    /// Loads and parses a graph file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Writes the graph in the `p`/`e` format (1-based, each edge once).
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "p edge {} {}", self.node_count(), self.edge_count)?;
        for (u, row) in self.adj.iter().enumerate() {
            for v in row.iter().filter(|&v| v > u) {
                writeln!(w, "e {} {}", u + 1, v + 1)?;
            }
        }
        Ok(())
    }

    /// Saves the graph to a file in the `p`/`e` format.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut w = io::BufWriter::new(File::create(path)?);
        self.write_to(&mut w)?;
        w.flush()
    }

    /// Number of nodes.
    #[inline(always)]
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of distinct undirected edges.
    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns whether `{u, v}` is an edge.
    #[inline(always)]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        debug_assert!(u < self.node_count() && v < self.node_count());
        self.adj[u].contains(v)
    }

    /// Neighbor set of `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: usize) -> &Bitset {
        &self.adj[v]
    }

    /// Neighbors of `v` with index strictly greater than `v`.
    #[inline]
    pub fn forward_neighbors(&self, v: usize) -> Bitset {
        let mut out = self.adj[v].clone();
        out.clear_through(v);
        out
    }

    /// Degree of `v`.
    #[inline(always)]
    pub fn degree(&self, v: usize) -> usize {
        self.degrees[v]
    }

    /// Edge density: `edges / (n choose 2)`, or `0.0` below two nodes.
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        self.edge_count as f64 / ((n * (n - 1)) / 2) as f64
    }

    /// Node indices sorted by ascending degree (ties by index).
    pub fn nodes_by_degree(&self) -> Vec<usize> {
        let mut nodes: Vec<usize> = (0..self.node_count()).collect();
        nodes.sort_by_key(|&v| self.degrees[v]);
        nodes
    }

    /// Degree-based upper estimate of the clique number.
    ///
    /// Diagnostic only; the search never uses it for pruning.
    pub fn clique_upper_bound(&self) -> usize {
        degree_upper_bound(&self.degrees)
    }
}

impl FromStr for Graph {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Upper estimate of the clique number from a degree sequence.
///
/// Scanning ascending degrees, a degree `d` raises the bound when `d` exceeds it
/// and more than the current bound nodes remain after it. Returns `0` for an
/// empty sequence.
pub fn degree_upper_bound(degrees: &[usize]) -> usize {
    if degrees.is_empty() {
        return 0;
    }
    let mut sorted = degrees.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let mut bound = 1;
    for (i, &d) in sorted.iter().enumerate() {
        if n - 1 - i > bound && d > bound {
            bound = d;
        }
    }
    bound
}

// ============================================================================
// Parsing
// ============================================================================

/// Incremental line parser; holds the graph once the size is known.
#[derive(Default)]
struct Parser {
    graph: Option<Graph>,
}

impl Parser {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), GraphError> {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("p") => {
                if self.graph.is_some() {
                    return Err(GraphError::DuplicateSize { line: line_no });
                }
                let _format = fields.next();
                let n = parse_field(line_no, fields.next(), 3)?;
                self.graph = Some(Graph::with_nodes(n));
            }
            Some("e") => {
                let graph = self
                    .graph
                    .as_mut()
                    .ok_or(GraphError::EdgeBeforeSize { line: line_no })?;
                let from = parse_field(line_no, fields.next(), 2)?;
                let to = parse_field(line_no, fields.next(), 3)?;
                let n = graph.node_count();
                for node in [from, to] {
                    if node == 0 || node > n {
                        return Err(GraphError::NodeOutOfRange {
                            line: line_no,
                            node,
                            node_count: n,
                        });
                    }
                }
                if from == to {
                    return Err(GraphError::SelfLoop {
                        line: line_no,
                        node: from,
                    });
                }
                graph.add_edge(from - 1, to - 1);
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Graph, GraphError> {
        self.graph.ok_or(GraphError::MissingSize)
    }
}

fn parse_field(line: usize, field: Option<&str>, position: usize) -> Result<usize, GraphError> {
    let raw = field.ok_or(GraphError::MissingField {
        line,
        field: position,
    })?;
    raw.parse().map_err(|_| GraphError::InvalidNumber {
        line,
        value: raw.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
