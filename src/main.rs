use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use maxclique::graph::Graph;
use maxclique::scheduler::{search, search_sequential, SearchConfig};
use maxclique::validate::{validate_known_graphs, verify_outcome};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maxclique")]
#[command(about = "Exact parallel maximum clique search", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Graph file in `p`/`e` edge-list format
    #[arg(required_unless_present_any = ["random", "validate"], conflicts_with = "random")]
    graph: Option<PathBuf>,

    /// Generate a random G(n, p) graph with this many nodes instead of loading one
    #[arg(long, value_name = "N")]
    random: Option<usize>,

    /// Edge probability for --random
    #[arg(long, default_value = "0.5")]
    p: f64,

    /// Seed for --random (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the generated graph to this path
    #[arg(long, value_name = "PATH", requires = "random")]
    save: Option<PathBuf>,

    /// Worker threads (default: one per logical core)
    #[arg(long)]
    workers: Option<usize>,

    /// Highest-index roots that always run as a single task
    #[arg(long)]
    inline_roots: Option<usize>,

    /// Levels below a low-index root split into sub-tasks (0 disables)
    #[arg(long)]
    fan_out_depth: Option<usize>,

    /// Search on the calling thread only
    #[arg(long, conflicts_with_all = ["workers", "inline_roots", "fan_out_depth"])]
    sequential: bool,

    /// Check the bundled fixture graphs and exit
    #[arg(long)]
    validate: bool,
}

impl Cli {
    fn config(&self) -> SearchConfig {
        let mut cfg = SearchConfig::default();
        if let Some(workers) = self.workers {
            cfg.workers = workers;
        }
        if let Some(inline_roots) = self.inline_roots {
            cfg.inline_roots = inline_roots;
        }
        if let Some(depth) = self.fan_out_depth {
            cfg.fan_out_depth = depth;
        }
        cfg
    }

    fn load_graph(&self) -> Result<(String, Graph)> {
        if let Some(n) = self.random {
            ensure!((0.0..=1.0).contains(&self.p), "--p must be in [0, 1], got {}", self.p);
            let seed = self.seed.unwrap_or_else(rand::random);
            let mut rng = SmallRng::seed_from_u64(seed);
            let graph = Graph::random(&mut rng, n, self.p);
            if let Some(path) = &self.save {
                graph
                    .save_to_file(path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "saved generated graph");
            }
            return Ok((format!("G({n}, {}) seed={seed}", self.p), graph));
        }
        let Some(path) = &self.graph else {
            bail!("no graph file given");
        };
        let graph =
            Graph::load(path).with_context(|| format!("failed to load {}", path.display()))?;
        Ok((path.display().to_string(), graph))
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("MAXCLIQUE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if cli.validate {
        validate_known_graphs(&cli.config()).context("validation failed")?;
        println!("Validation OK: bundled fixture graphs have their known clique numbers.");
        return Ok(());
    }

    let (name, graph) = cli.load_graph()?;
    println!(
        "{name}: {} nodes, {} edges, density {:.3}, upper bound {}",
        graph.node_count(),
        graph.edge_count(),
        graph.density(),
        graph.clique_upper_bound()
    );

    let outcome = if cli.sequential {
        search_sequential(&graph)
    } else {
        search(&graph, &cli.config())?
    };

    let members: Vec<String> = outcome
        .nodes_one_based()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "Clique size: {} {:.3} seconds",
        outcome.size,
        outcome.stats.elapsed.as_secs_f64()
    );
    println!("Members: {}", members.join(" "));
    println!(
        "Tasks: {}  Expansions: {}",
        outcome.stats.tasks, outcome.stats.expansions
    );

    verify_outcome(&graph, &outcome, &name)?;
    println!("It's a clique!");
    Ok(())
}
