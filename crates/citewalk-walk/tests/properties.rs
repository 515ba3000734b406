//! Structural properties of sampled corpora over random graphs.

use proptest::prelude::*;

use citewalk_core::{NodeId, WalkConfig};
use citewalk_graph::{AdjacencyView, InMemoryGraph};
use citewalk_walk::BiasedWalkSampler;

fn build_graph(n: usize, edges: &[(usize, usize)]) -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    for i in 0..n {
        graph.add_node(NodeId::from(i as u64), None, serde_json::Value::Null);
    }
    for &(a, b) in edges {
        graph
            .add_edge(&NodeId::from(a as u64), &NodeId::from(b as u64))
            .unwrap();
    }
    graph
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Vec<usize>)> {
    (1usize..16).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..40),
            prop::collection::vec(0..n, 0..6),
        )
    })
}

fn config_strategy() -> impl Strategy<Value = WalkConfig> {
    (1usize..12, 0usize..4, 0.05f64..20.0, 0.05f64..20.0).prop_map(|(length, n, p, q)| {
        WalkConfig {
            length,
            walks_per_root: n,
            return_bias: p,
            explore_bias: q,
            seed: None,
            parallel: false,
        }
    })
}

proptest! {
    #[test]
    fn walks_are_rooted_bounded_and_follow_edges(
        (n, edges, root_indices) in graph_strategy(),
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let graph = build_graph(n, &edges);
        let roots: Vec<NodeId> = root_indices.iter().map(|&i| NodeId::from(i as u64)).collect();

        let corpus = BiasedWalkSampler::with_seed(seed)
            .run(&graph, &roots, &config)
            .unwrap();

        prop_assert_eq!(corpus.len(), roots.len() * config.walks_per_root);

        // Root-major, repetition-minor.
        for (block, root) in corpus.per_root(config.walks_per_root).zip(&roots) {
            prop_assert_eq!(block.len(), config.walks_per_root);
            for walk in block {
                prop_assert_eq!(walk.root(), Some(root));
            }
        }

        for walk in &corpus {
            prop_assert!(!walk.is_empty());
            prop_assert!(walk.len() <= config.length);

            let indices: Vec<usize> = walk
                .iter()
                .map(|id| graph.index_of(id).unwrap())
                .collect();

            for pair in indices.windows(2) {
                prop_assert!(
                    graph.is_adjacent(pair[0], pair[1]),
                    "step {} -> {} is not an edge", pair[0], pair[1]
                );
            }

            if walk.len() < config.length {
                let last = *indices.last().unwrap();
                prop_assert_eq!(graph.degree(last), 0);
            }
        }
    }

    #[test]
    fn same_seed_same_corpus_serial_or_parallel(
        (n, edges, root_indices) in graph_strategy(),
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let graph = build_graph(n, &edges);
        let roots: Vec<NodeId> = root_indices.iter().map(|&i| NodeId::from(i as u64)).collect();
        let sampler = BiasedWalkSampler::with_seed(seed);

        let first = sampler.run(&graph, &roots, &config).unwrap();
        let second = sampler.run(&graph, &roots, &config).unwrap();
        let parallel = sampler.run_parallel(&graph, &roots, &config).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &parallel);
    }
}

#[test]
fn duplicate_roots_get_their_own_blocks() {
    let graph = build_graph(3, &[(0, 1), (1, 2)]);
    let roots = [NodeId::from(2u64), NodeId::from(0u64), NodeId::from(2u64)];
    let config = WalkConfig {
        length: 4,
        walks_per_root: 2,
        ..WalkConfig::default()
    };

    let corpus = BiasedWalkSampler::with_seed(11)
        .run(&graph, &roots, &config)
        .unwrap();

    let firsts: Vec<&NodeId> = corpus.iter().filter_map(|w| w.root()).collect();
    assert_eq!(
        firsts,
        vec![
            &roots[0], &roots[0], &roots[1], &roots[1], &roots[2], &roots[2]
        ]
    );
}

#[test]
fn different_seeds_give_different_corpora() {
    let graph = build_graph(
        6,
        &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3), (1, 4)],
    );
    let config = WalkConfig {
        length: 30,
        walks_per_root: 5,
        ..WalkConfig::default()
    };

    let a = BiasedWalkSampler::with_seed(1).run_all(&graph, &config).unwrap();
    let b = BiasedWalkSampler::with_seed(2).run_all(&graph, &config).unwrap();
    assert_ne!(a, b);
}

#[test]
fn unseeded_sampler_still_honours_the_contract() {
    let graph = build_graph(4, &[(0, 1), (1, 2), (2, 3)]);
    let config = WalkConfig {
        length: 8,
        walks_per_root: 3,
        ..WalkConfig::default()
    };

    let corpus = BiasedWalkSampler::new().run_all(&graph, &config).unwrap();
    assert_eq!(corpus.len(), 12);
    assert!(corpus.iter().all(|w| w.len() == 8));
}
