use super::*;
use crate::{common::norm_2, error::*, frontier::Frontier, Hypergraph};

/// HyperCut: alternating vertex → hyperedge → vertex propagation.
///
/// Every round, each active hyperedge averages the `residual / degree` of
/// its members, and every active vertex collects the averages of its
/// incident hyperedges as its new residual. A fraction `alpha` of the
/// residual is then settled into the estimate. Active vertices and
/// hyperedges only grow.
pub struct HyperCut<'a> {
    hypergraph: &'a Hypergraph,
    config: Config,
    vertex_measure: Vec<f64>,
    edge_measure: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub alpha: f64,
    /// Convergence threshold on the L2 norm of the change in estimate.
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 1e-5,
            epsilon: 0.25e-3,
            max_iterations: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub residual: f64,
    /// `(active vertices, active hyperedges)` after each iteration.
    pub frontier_sizes: Vec<(usize, usize)>,
}

impl<'a> HyperCut<'a> {
    pub fn new(hypergraph: &'a Hypergraph, config: &Config) -> Result<Self> {
        check_alpha(config.alpha)?;
        check_positive("epsilon", config.epsilon)?;
        let vertex_measure = hypergraph
            .degrees()
            .iter()
            .map(|d| if *d > 0.0 { 1.0 / d } else { 0.0 })
            .collect();
        let edge_measure = (0..hypergraph.edge_size())
            .map(|e| 1.0 / hypergraph.members(e).len() as f64)
            .collect();
        Ok(Self {
            hypergraph,
            config: config.clone(),
            vertex_measure,
            edge_measure,
        })
    }
}

impl Solver for HyperCut<'_> {
    type Output = Outcome;

    fn solve(&self, seed: usize) -> Result<Self::Output> {
        let h = self.hypergraph;
        let n = h.vertex_size();
        let m = h.edge_size();
        check_vertex(seed, n)?;
        if self.vertex_measure[seed] <= 0.0 {
            let mut scores = vec![0.0; n];
            scores[seed] = 1.0;
            return Ok(Outcome {
                scores,
                iterations: 0,
                residual: 0.0,
                frontier_sizes: vec![],
            });
        }

        let alpha = self.config.alpha;
        let beta = 1.0 - alpha;
        let mut estimate = vec![0.0; n];
        let mut residual = vec![0.0; n];
        let mut generation = vec![0.0; n];
        let mut accumulated = vec![0.0; m];
        let mut product = vec![0.0; m];
        estimate[seed] = alpha;
        residual[seed] = beta;
        generation[seed] = beta * self.vertex_measure[seed];

        let mut vertices = Frontier::new(n);
        vertices.insert(seed);
        let mut edges = Frontier::new(m);
        for e in h.incident_edges(seed) {
            edges.insert(*e);
        }

        let mut prev = vec![0.0; n];
        let mut next = vec![0.0; n];
        next[seed] = 1.0;
        let mut err = 1.0;
        let mut iterations = 0;
        let mut frontier_sizes = vec![];
        while !(err < self.config.epsilon) {
            if iterations == self.config.max_iterations {
                tracing::warn!(seed, alpha, iterations, err, "hypercut did not converge");
                return Err(Error::NotConverged {
                    iterations,
                    residual: err,
                });
            }
            for v in vertices.as_slice() {
                prev[*v] = next[*v];
            }

            // vertices -> hyperedges
            for pos in 0..edges.len() {
                let e = edges.get(pos);
                for v in h.members(e) {
                    accumulated[e] += generation[*v];
                    vertices.insert(*v);
                }
            }
            for e in edges.as_slice() {
                product[*e] = accumulated[*e] * self.edge_measure[*e];
            }

            // hyperedges -> vertices
            for v in vertices.as_slice() {
                residual[*v] = 0.0;
            }
            for pos in 0..vertices.len() {
                let v = vertices.get(pos);
                for e in h.incident_edges(v) {
                    residual[v] += product[*e];
                    edges.insert(*e);
                }
            }
            for e in edges.as_slice() {
                accumulated[*e] = 0.0;
                product[*e] = 0.0;
            }

            for v in vertices.as_slice().iter().copied() {
                next[v] = estimate[v] + residual[v];
                estimate[v] += alpha * residual[v];
                residual[v] *= beta;
                generation[v] = residual[v] * self.vertex_measure[v];
            }
            err = norm_2(vertices.as_slice().iter().map(|v| next[*v] - prev[*v]));
            iterations += 1;
            frontier_sizes.push((vertices.len(), edges.len()));
            tracing::trace!(iterations, err, "hypercut iteration");
        }

        for (x, r) in estimate.iter_mut().zip(residual.iter()) {
            *x += r;
        }
        tracing::debug!(
            seed,
            alpha,
            iterations,
            active_vertices = vertices.len(),
            active_edges = edges.len(),
            "hypercut converged"
        );
        Ok(Outcome {
            scores: estimate,
            iterations,
            residual: err,
            frontier_sizes,
        })
    }
}

impl SolverOutput for Outcome {
    fn scores(&self) -> &[f64] {
        &self.scores
    }

    fn into_scores(self) -> Vec<f64> {
        self.scores
    }
}
