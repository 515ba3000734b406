//! Second-order biased random walks (node2vec).
//!
//! A walk is driven by a [`WalkState`] of `(previous, current)`. The first
//! step from a root is uniform over its neighbours. Every later step weighs
//! each neighbour `x` of `current` by
//!
//! - `1 / return_bias` if `x == previous`,
//! - `1` if `x` is also a neighbour of `previous`,
//! - `1 / explore_bias` otherwise,
//!
//! and draws from the normalised weights. A walk stops early only when it
//! reaches a node without neighbours.
//!
//! Every root position gets its own ChaCha8 stream derived from the run seed,
//! so [`BiasedWalkSampler::run`] and [`BiasedWalkSampler::run_parallel`]
//! produce identical corpora for the same seed.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use citewalk_core::{Corpus, NodeId, Walk, WalkConfig};
use citewalk_graph::AdjacencyView;

use crate::error::{Result, WalkError};

/// Upper bound on up-front reservations; longer walks and corpora grow as they fill.
const MAX_RESERVED: usize = 1024;

/// Position of a walk: the node it came from and the node it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkState {
    /// `None` while the walk is still on its root.
    pub previous: Option<usize>,
    pub current: usize,
}

impl WalkState {
    pub fn at_root(root: usize) -> Self {
        Self {
            previous: None,
            current: root,
        }
    }

    pub fn advance(self, next: usize) -> Self {
        Self {
            previous: Some(self.current),
            current: next,
        }
    }
}

/// Return and in-out parameters of a walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionBias {
    pub return_bias: f64,
    pub explore_bias: f64,
}

impl TransitionBias {
    pub fn from_config(config: &WalkConfig) -> Self {
        Self {
            return_bias: config.return_bias,
            explore_bias: config.explore_bias,
        }
    }

    /// With both biases at 1 every step is a plain uniform step.
    pub fn is_uniform(&self) -> bool {
        self.return_bias == 1.0 && self.explore_bias == 1.0
    }

    /// Unnormalised weight of stepping to `candidate` after arriving from `previous`.
    pub fn weight<G: AdjacencyView + ?Sized>(
        &self,
        graph: &G,
        previous: usize,
        candidate: usize,
    ) -> f64 {
        if candidate == previous {
            1.0 / self.return_bias
        } else if graph.is_adjacent(previous, candidate) {
            1.0
        } else {
            1.0 / self.explore_bias
        }
    }
}

/// Fill `buf` with the unnormalised weights of every neighbour of
/// `state.current`, in neighbour-list order.
///
/// Without a previous node all weights are 1.
pub fn transition_weights<G: AdjacencyView + ?Sized>(
    graph: &G,
    state: WalkState,
    bias: TransitionBias,
    buf: &mut Vec<f64>,
) {
    let neighbors = graph.neighbor_indices(state.current);
    buf.clear();
    match state.previous {
        None => buf.resize(neighbors.len(), 1.0),
        Some(previous) => buf.extend(
            neighbors
                .iter()
                .map(|&candidate| bias.weight(graph, previous, candidate)),
        ),
    }
}

/// Draw an index from unnormalised non-negative weights.
///
/// Equivalent to normalising `weights` into a probability vector and
/// inverting its CDF. Returns `None` when no weight is positive.
pub fn weighted_choice<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let mut r = rng.random::<f64>() * total;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if r < w {
            return Some(i);
        }
        r -= w;
        last = Some(i);
    }
    // Rounding can leave r marginally above the final weight.
    last
}

/// Sample one walk of at most `length` nodes, as dense indices.
pub fn walk_from<G: AdjacencyView + ?Sized, R: Rng>(
    graph: &G,
    root: usize,
    length: usize,
    bias: TransitionBias,
    rng: &mut R,
    buf: &mut Vec<f64>,
) -> Vec<usize> {
    let mut path = Vec::with_capacity(length.min(MAX_RESERVED));
    path.push(root);

    let mut state = WalkState::at_root(root);
    while path.len() < length {
        let Some(next) = next_step(graph, state, bias, rng, buf) else {
            break;
        };
        path.push(next);
        state = state.advance(next);
    }

    path
}

fn next_step<G: AdjacencyView + ?Sized, R: Rng>(
    graph: &G,
    state: WalkState,
    bias: TransitionBias,
    rng: &mut R,
    buf: &mut Vec<f64>,
) -> Option<usize> {
    let neighbors = graph.neighbor_indices(state.current);
    if neighbors.is_empty() {
        return None;
    }

    if state.previous.is_none() || bias.is_uniform() {
        return Some(neighbors[rng.random_range(0..neighbors.len())]);
    }

    transition_weights(graph, state, bias, buf);
    weighted_choice(buf, rng).map(|i| neighbors[i])
}

/// Reject a configuration the sampler cannot run.
pub fn validate_config(config: &WalkConfig) -> Result<()> {
    if config.length == 0 {
        return Err(WalkError::InvalidParameter {
            name: "length",
            value: config.length.to_string(),
            reason: "a walk holds at least its root",
        });
    }
    check_bias("return_bias", config.return_bias)?;
    check_bias("explore_bias", config.explore_bias)?;
    Ok(())
}

fn check_bias(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(WalkError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: "must be a positive finite number",
        })
    }
}

/// Generates biased walk corpora.
///
/// The sampler holds nothing but its seed. Without a seed every call draws a
/// fresh one, so repeated calls differ.
#[derive(Debug, Clone, Default)]
pub struct BiasedWalkSampler {
    seed: Option<u64>,
}

impl BiasedWalkSampler {
    /// Create an unseeded sampler.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Create a sampler whose corpora are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Sample `config.walks_per_root` walks from each root, on this thread.
    ///
    /// Walks are returned root-major, repetition-minor. Parameters and roots
    /// are validated before any walk is produced.
    pub fn run<G: AdjacencyView + ?Sized>(
        &self,
        graph: &G,
        roots: &[NodeId],
        config: &WalkConfig,
    ) -> Result<Corpus> {
        let plan = RunPlan::prepare(graph, roots, config, self.seed)?;
        let start = Instant::now();

        let mut corpus = Corpus::with_capacity(plan.capacity_hint());
        let mut buf = Vec::new();
        for (position, &root) in plan.roots.iter().enumerate() {
            corpus.extend(plan.root_walks(graph, position, root, &mut buf));
        }

        plan.finish(&corpus, start);
        Ok(corpus)
    }

    /// Same as [`run`](Self::run), with roots spread over the rayon pool.
    ///
    /// The output is identical to `run` for the same seed.
    pub fn run_parallel<G: AdjacencyView + Sync + ?Sized>(
        &self,
        graph: &G,
        roots: &[NodeId],
        config: &WalkConfig,
    ) -> Result<Corpus> {
        let plan = RunPlan::prepare(graph, roots, config, self.seed)?;
        let start = Instant::now();

        let blocks: Vec<Vec<Walk>> = plan
            .roots
            .par_iter()
            .enumerate()
            .map_init(Vec::new, |buf, (position, &root)| {
                plan.root_walks(graph, position, root, buf)
            })
            .collect();

        let mut corpus = Corpus::with_capacity(plan.capacity_hint());
        for block in blocks {
            corpus.extend(block);
        }

        plan.finish(&corpus, start);
        Ok(corpus)
    }

    /// Sample from every node of the graph, in dense index order.
    pub fn run_all<G: AdjacencyView + ?Sized>(
        &self,
        graph: &G,
        config: &WalkConfig,
    ) -> Result<Corpus> {
        let roots: Vec<NodeId> = (0..graph.node_count())
            .map(|i| graph.id_of(i).clone())
            .collect();
        self.run(graph, &roots, config)
    }
}

/// A validated run: resolved roots plus the seed every stream derives from.
struct RunPlan {
    roots: Vec<usize>,
    seed: u64,
    length: usize,
    walks_per_root: usize,
    walk_count: usize,
    bias: TransitionBias,
}

impl RunPlan {
    fn prepare<G: AdjacencyView + ?Sized>(
        graph: &G,
        roots: &[NodeId],
        config: &WalkConfig,
        seed: Option<u64>,
    ) -> Result<Self> {
        validate_config(config)?;

        let walk_count = roots
            .len()
            .checked_mul(config.walks_per_root)
            .ok_or_else(|| WalkError::InvalidParameter {
                name: "walks_per_root",
                value: config.walks_per_root.to_string(),
                reason: "total walk count overflows usize",
            })?;

        let roots = roots
            .iter()
            .map(|id| {
                graph.index_of(id).ok_or_else(|| WalkError::InvalidNode {
                    node_id: id.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let seed = seed.unwrap_or_else(|| rand::rng().random());

        let isolated = roots.iter().filter(|&&r| graph.degree(r) == 0).count();
        if isolated > 0 {
            tracing::debug!(isolated, "Roots without neighbours yield single-node walks");
        }

        tracing::info!(
            roots = roots.len(),
            walks_per_root = config.walks_per_root,
            length = config.length,
            return_bias = config.return_bias,
            explore_bias = config.explore_bias,
            seed,
            "Sampling biased walks"
        );

        Ok(Self {
            roots,
            seed,
            length: config.length,
            walks_per_root: config.walks_per_root,
            walk_count,
            bias: TransitionBias::from_config(config),
        })
    }

    fn capacity_hint(&self) -> usize {
        self.walk_count.min(MAX_RESERVED)
    }

    /// All walks of one root, drawn from that root position's own stream.
    fn root_walks<G: AdjacencyView + ?Sized>(
        &self,
        graph: &G,
        position: usize,
        root: usize,
        buf: &mut Vec<f64>,
    ) -> Vec<Walk> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(position as u64);

        // No up-front reservation of `walks_per_root`.
        let mut walks = Vec::with_capacity(self.walks_per_root.min(MAX_RESERVED));
        for _ in 0..self.walks_per_root {
            let path = walk_from(graph, root, self.length, self.bias, &mut rng, buf);
            walks.push(Walk(path.into_iter().map(|i| graph.id_of(i).clone()).collect()));
        }
        walks
    }

    fn finish(&self, corpus: &Corpus, start: Instant) {
        tracing::info!(
            walks = corpus.len(),
            tokens = corpus.token_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Corpus sampled"
        );
    }
}
