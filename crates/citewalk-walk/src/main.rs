//! CLI entry point for citewalk.
//!
//! Reads a graph file, samples a biased walk corpus, and writes it to stdout
//! or a file. Logs go to stderr so the corpus can be piped.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::Rng;
use tracing_subscriber::{fmt, EnvFilter};

use citewalk_core::{CitewalkConfig, CorpusFormat, NodeId};
use citewalk_graph::load_graph;
use citewalk_manifest::store::{FileManifestStore, ManifestStore};
use citewalk_manifest::{CorpusManifest, ManifestId};
use citewalk_walk::{read_corpus, write_corpus, BiasedWalkSampler};

#[derive(Parser)]
#[command(name = "citewalk")]
#[command(about = "Biased second-order random walks over citation graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: citewalk).
    #[arg(short, long, default_value = "citewalk", global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Sample a walk corpus from a graph file.
    Sample(SampleArgs),
    /// Print graph statistics as JSON.
    Stats {
        /// Graph file (.json subgraph document or edge list).
        #[arg(long)]
        graph: PathBuf,
    },
    /// List recorded runs, newest first, one JSON object per line.
    Manifests {
        /// Manifest store directory (default: output.manifest_dir from config).
        #[arg(long)]
        manifest_dir: Option<PathBuf>,
    },
    /// Check a stored manifest and, optionally, the corpus it describes.
    Verify {
        /// Manifest store directory.
        #[arg(long)]
        manifest_dir: PathBuf,
        /// Manifest id.
        #[arg(long)]
        id: String,
        /// Corpus file to check against the manifest.
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Corpus format: text or jsonl (default: from the file extension).
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Args)]
struct SampleArgs {
    /// Graph file (.json subgraph document or edge list).
    #[arg(long)]
    graph: PathBuf,

    /// Comma-separated root ids (default: every node).
    #[arg(long, value_delimiter = ',')]
    roots: Option<Vec<String>>,

    /// Maximum nodes per walk.
    #[arg(long)]
    length: Option<usize>,

    /// Walks per root.
    #[arg(long)]
    walks_per_root: Option<usize>,

    /// Return parameter p.
    #[arg(long, allow_hyphen_values = true)]
    return_bias: Option<f64>,

    /// In-out parameter q.
    #[arg(long, allow_hyphen_values = true)]
    explore_bias: Option<f64>,

    /// Seed for a reproducible corpus.
    #[arg(long)]
    seed: Option<u64>,

    /// Sample roots in parallel.
    #[arg(long)]
    parallel: bool,

    /// Corpus format: text or jsonl.
    #[arg(long)]
    format: Option<String>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Record a manifest in this directory.
    #[arg(long)]
    manifest_dir: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = CitewalkConfig::load(&cli.config)?;

    match cli.command {
        Command::Sample(args) => sample(args, config),
        Command::Stats { graph } => {
            let graph = load_graph(&graph)?;
            println!("{}", serde_json::to_string(&graph.stats())?);
            Ok(())
        }
        Command::Manifests { manifest_dir } => {
            let Some(dir) = manifest_dir.or_else(|| config.output.manifest_dir.map(PathBuf::from))
            else {
                anyhow::bail!("No manifest directory given and none configured");
            };
            list_manifests(&dir)
        }
        Command::Verify {
            manifest_dir,
            id,
            corpus,
            format,
        } => verify(&manifest_dir, &id, corpus.as_deref(), format.as_deref()),
    }
}

fn sample(args: SampleArgs, mut config: CitewalkConfig) -> anyhow::Result<()> {
    let walk = &mut config.walk;
    if let Some(length) = args.length {
        walk.length = length;
    }
    if let Some(n) = args.walks_per_root {
        walk.walks_per_root = n;
    }
    if let Some(p) = args.return_bias {
        walk.return_bias = p;
    }
    if let Some(q) = args.explore_bias {
        walk.explore_bias = q;
    }
    if args.seed.is_some() {
        walk.seed = args.seed;
    }
    walk.parallel |= args.parallel;
    if let Some(format) = args.format.as_deref() {
        config.output.format = format.parse()?;
    }
    if args.manifest_dir.is_some() {
        config.output.manifest_dir = args.manifest_dir;
    }

    let graph = load_graph(&args.graph)?;
    let roots: Vec<NodeId> = match args.roots {
        Some(ids) => ids.into_iter().map(NodeId::from).collect(),
        None => graph.node_ids(),
    };

    // Pin the seed so the manifest can record it.
    let seed = config.walk.seed.unwrap_or_else(|| rand::rng().random());
    config.walk.seed = Some(seed);

    let sampler = BiasedWalkSampler::with_seed(seed);
    let corpus = if config.walk.parallel {
        sampler.run_parallel(&graph, &roots, &config.walk)?
    } else {
        sampler.run(&graph, &roots, &config.walk)?
    };

    match &args.output {
        Some(path) => write_corpus(File::create(path)?, &corpus, config.output.format)?,
        None => write_corpus(std::io::stdout().lock(), &corpus, config.output.format)?,
    }

    if let Some(dir) = &config.output.manifest_dir {
        let manifest =
            CorpusManifest::new(graph.stats(), config.walk.clone(), seed, roots.len(), &corpus)
                .finalize();
        let path = FileManifestStore::new(dir)?.save(&manifest)?;
        tracing::info!(
            manifest_id = %manifest.id,
            path = %path.display(),
            "Manifest recorded"
        );
        eprintln!("{}", manifest.id);
    }

    Ok(())
}

fn verify(
    manifest_dir: &Path,
    id: &str,
    corpus_path: Option<&Path>,
    format: Option<&str>,
) -> anyhow::Result<()> {
    let id: ManifestId = id.parse()?;
    let manifest = FileManifestStore::new(manifest_dir)?.get(id)?;

    if let Some(path) = corpus_path {
        let format = match format {
            Some(f) => f.parse()?,
            None => format_from_extension(path),
        };
        let corpus = read_corpus(BufReader::new(File::open(path)?), format)?;
        if !manifest.matches_corpus(&corpus) {
            anyhow::bail!(
                "Corpus {} does not match manifest {}",
                path.display(),
                manifest.id
            );
        }
    }

    println!("{}", serde_json::to_string(&manifest)?);
    Ok(())
}

fn list_manifests(dir: &Path) -> anyhow::Result<()> {
    let store = FileManifestStore::new(dir)?;
    let mut stdout = std::io::stdout().lock();
    for manifest in store.list()? {
        serde_json::to_writer(&mut stdout, &manifest_summary(&manifest))?;
        writeln!(stdout)?;
    }
    Ok(())
}

/// One-line view of a recorded run.
fn manifest_summary(manifest: &CorpusManifest) -> serde_json::Value {
    serde_json::json!({
        "id": manifest.id.to_string(),
        "created_at": manifest.created_at.to_rfc3339(),
        "seed": manifest.seed,
        "roots": manifest.root_count,
        "walks": manifest.walk_count,
        "length": manifest.config.length,
        "return_bias": manifest.config.return_bias,
        "explore_bias": manifest.config.explore_bias,
        "corpus_hash": manifest.corpus_hash,
        "intact": manifest.verify_integrity(),
    })
}

fn format_from_extension(path: &Path) -> CorpusFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl") => CorpusFormat::Jsonl,
        _ => CorpusFormat::Text,
    }
}
