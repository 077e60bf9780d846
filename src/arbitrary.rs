use crate::Hypergraph;
use quickcheck::{Arbitrary, Gen};

/// A small random hypergraph with integral weights in `1..=4`, a seed of
/// positive degree, and a non-negative score per vertex.
#[derive(Debug, Clone)]
pub struct RandomHypergraph {
    pub hypergraph: Hypergraph,
    pub seed: usize,
    pub scores: Vec<f64>,
}

impl Arbitrary for RandomHypergraph {
    fn arbitrary(g: &mut Gen) -> Self {
        const N: usize = 8;
        const MAX_EDGE: usize = 4;

        let n = 2 + usize::arbitrary(g) % (N - 1);
        let m = 1 + usize::arbitrary(g) % (2 * n);
        let edges: Vec<(Vec<usize>, f64)> = (0..m)
            .map(|_| {
                let size = 1 + usize::arbitrary(g) % MAX_EDGE;
                let members = (0..size).map(|_| usize::arbitrary(g) % n).collect();
                let weight = (1 + u8::arbitrary(g) % 4) as f64;
                (members, weight)
            })
            .collect();
        let seed = edges[0].0[0];
        let hypergraph = Hypergraph::new(n, edges).unwrap();
        let scores = (0..n).map(|_| (u16::arbitrary(g) % 1000) as f64 / 7.0).collect();
        Self {
            hypergraph,
            seed,
            scores,
        }
    }
}
