//! Parallel driver: one task per root, optional fan-out, max-reduction.
//!
//! Roots are submitted in descending index order. High-index roots have few
//! forward candidates and finish quickly, which fills idle workers early while
//! the large low-index subtrees run.
//!
//! Low-index roots (all but the `inline_roots` highest) are *prebranched*:
//! instead of one sequential task, each accepted direct extension becomes its
//! own task. The same rule applies recursively up to `fan_out_depth` levels, so
//! "run inline" vs. "fan out" is a single decision per task.

use crate::bound::GlobalBound;
use crate::clique::Clique;
use crate::engine::SearchEngine;
use crate::graph::Graph;
use crossbeam::channel::{self, Sender};
use rayon::{ScopeFifo, ThreadPoolBuildError, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Configuration
// ============================================================================

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Worker threads in the pool. `0` lets rayon pick (one per logical core).
    pub workers: usize,
    /// Number of highest-index roots that always run as a single task.
    pub inline_roots: usize,
    /// Levels below a prebranched root that are split into sub-tasks.
    /// `0` disables prebranching.
    pub fan_out_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(1);

        Self {
            workers,
            inline_roots: 10,
            fan_out_depth: 1,
        }
    }
}

/// Errors that abort a search run.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] ThreadPoolBuildError),
    /// A search task panicked; its subtree result is missing.
    #[error("search worker panicked: {0}")]
    WorkerPanicked(String),
}

// ============================================================================
// Results
// ============================================================================

/// Counters gathered over one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Tasks executed (sequential subtrees plus fan-out parents).
    pub tasks: usize,
    /// Accepted extensions summed over all tasks.
    pub expansions: u64,
    /// Degree-based upper estimate of the clique number (diagnostic).
    pub upper_bound: usize,
    /// Wall time of the search.
    pub elapsed: Duration,
}

/// A maximum clique and how it was found.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Members, 0-based and ascending.
    pub nodes: Vec<usize>,
    /// Cardinality of `nodes`.
    pub size: usize,
    /// Run counters.
    pub stats: SearchStats,
}

impl SearchOutcome {
    fn new(best: &Clique, stats: SearchStats) -> Self {
        Self {
            nodes: best.nodes(),
            size: best.len(),
            stats,
        }
    }

    /// Members renumbered from 1, matching the graph file format.
    pub fn nodes_one_based(&self) -> Vec<usize> {
        self.nodes.iter().map(|v| v + 1).collect()
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Finds a maximum clique with the default configuration.
///
/// # Errors
/// See [`search`].
pub fn max_clique(graph: &Graph) -> Result<SearchOutcome, SearchError> {
    search(graph, &SearchConfig::default())
}

/// Finds a maximum clique on a dedicated worker pool.
///
/// Only the size is reproducible across runs; when several maximum cliques
/// exist, which one is returned depends on task timing.
///
/// # Errors
/// Returns [`SearchError::PoolBuild`] if the pool cannot be created and
/// [`SearchError::WorkerPanicked`] if any task panicked.
pub fn search(graph: &Graph, config: &SearchConfig) -> Result<SearchOutcome, SearchError> {
    let n = graph.node_count();
    let upper_bound = graph.clique_upper_bound();
    info!(
        nodes = n,
        edges = graph.edge_count(),
        upper_bound,
        workers = config.workers,
        inline_roots = config.inline_roots,
        fan_out_depth = config.fan_out_depth,
        "starting clique search"
    );

    let start = Instant::now();
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("clique-worker-{i}"))
        .build()?;

    let bound = GlobalBound::default();
    let (tx, rx) = channel::unbounded();
    let scheduler = Scheduler {
        graph,
        bound: &bound,
        results: tx,
        fan_out_depth: config.fan_out_depth,
        prebranch_below: n.saturating_sub(config.inline_roots),
    };

    let run = panic::catch_unwind(AssertUnwindSafe(|| {
        pool.scope_fifo(|s| {
            for root in (0..n).rev() {
                let task = Task::root(n, root);
                let scheduler = &scheduler;
                s.spawn_fifo(move |s| scheduler.dispatch(s, task));
            }
        });
    }));
    drop(scheduler);
    if let Err(payload) = run {
        return Err(SearchError::WorkerPanicked(describe_panic(payload.as_ref())));
    }

    let mut best = Clique::empty(n);
    let mut stats = SearchStats {
        upper_bound,
        ..SearchStats::default()
    };
    for report in rx.iter() {
        stats.tasks += 1;
        stats.expansions += report.expansions;
        if report.best.len() > best.len() {
            best = report.best;
        }
    }
    stats.elapsed = start.elapsed();

    debug_assert!(graph.is_clique_set(best.members()));
    info!(
        size = best.len(),
        tasks = stats.tasks,
        expansions = stats.expansions,
        elapsed_secs = stats.elapsed.as_secs_f64(),
        "clique search finished"
    );
    Ok(SearchOutcome::new(&best, stats))
}

/// Finds a maximum clique on the calling thread.
///
/// Roots run one after another in descending order against one bound; no
/// prebranching happens.
pub fn search_sequential(graph: &Graph) -> SearchOutcome {
    let n = graph.node_count();
    let start = Instant::now();
    let bound = GlobalBound::default();
    let engine = SearchEngine::new(graph, &bound);

    let mut best = Clique::empty(n);
    let mut stats = SearchStats {
        upper_bound: graph.clique_upper_bound(),
        ..SearchStats::default()
    };
    for root in (0..n).rev() {
        let result = engine.search_root(root);
        debug!(root, best = result.best.len(), "root finished");
        stats.tasks += 1;
        stats.expansions += result.expansions;
        if result.best.len() > best.len() {
            best = result.best;
        }
    }
    stats.elapsed = start.elapsed();
    SearchOutcome::new(&best, stats)
}

// ============================================================================
// Internal
// ============================================================================

/// A subtree to explore: every extension of `start` using nodes above `last`.
struct Task {
    root: usize,
    start: Clique,
    last: usize,
    depth: usize,
}

impl Task {
    fn root(node_count: usize, root: usize) -> Self {
        Self {
            root,
            start: Clique::singleton(node_count, root),
            last: root,
            depth: 0,
        }
    }
}

struct TaskReport {
    best: Clique,
    expansions: u64,
}

/// Shared, read-only state of one run.
struct Scheduler<'a> {
    graph: &'a Graph,
    bound: &'a GlobalBound,
    results: Sender<TaskReport>,
    fan_out_depth: usize,
    /// Roots below this index are prebranched.
    prebranch_below: usize,
}

impl Scheduler<'_> {
    #[inline]
    fn fans_out(&self, task: &Task) -> bool {
        task.root < self.prebranch_below && task.depth < self.fan_out_depth
    }

    fn dispatch<'s>(&'s self, scope: &ScopeFifo<'s>, task: Task) {
        if !self.fans_out(&task) {
            let result = SearchEngine::new(self.graph, self.bound).search_from(task.start, task.last);
            debug!(
                root = task.root,
                depth = task.depth,
                best = result.best.len(),
                expansions = result.expansions,
                "subtree finished"
            );
            self.report(result.best, result.expansions);
            return;
        }

        // The parent still counts as a candidate answer, e.g. a root with no
        // forward neighbors.
        self.bound.offer(task.start.len());
        let mut spawned = 0u64;
        for c in &self.graph.forward_neighbors(task.last) {
            let Some(child) = task.start.extend(self.graph, c) else {
                continue;
            };
            let child = Task {
                root: task.root,
                start: child,
                last: c,
                depth: task.depth + 1,
            };
            spawned += 1;
            scope.spawn_fifo(move |s| self.dispatch(s, child));
        }
        debug!(root = task.root, depth = task.depth, spawned, "task fanned out");
        self.report(task.start, spawned);
    }

    fn report(&self, best: Clique, expansions: u64) {
        // The receiver outlives every task of the run.
        let _ = self.results.send(TaskReport { best, expansions });
    }
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
