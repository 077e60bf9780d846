use super::*;
use crate::{common::norm_1, error::*, frontier::Frontier};

/// Lazy personalized PageRank on a reduced graph by synchronous pushes.
///
/// Each round keeps half of the damped mass in place, spreads the other half
/// to neighbors in proportion to edge weight, and re-injects `alpha` at the
/// seed. Only vertices the mass has reached are visited.
pub struct Push<'a, N: Neighborhood> {
    graph: &'a N,
    config: Config,
    measure: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub alpha: f64,
    /// Convergence threshold on the L1 norm of the change in estimate.
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 0.15,
            epsilon: 0.25e-3,
            max_iterations: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    /// Scores of the original hypergraph vertices only.
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub residual: f64,
    pub active_vertices: usize,
}

impl<'a, N: Neighborhood> Push<'a, N> {
    pub fn new(graph: &'a N, config: &Config) -> Result<Self> {
        check_alpha(config.alpha)?;
        check_positive("epsilon", config.epsilon)?;
        let measure = (0..graph.vertex_size())
            .map(|v| {
                let d = graph.weighted_degree(v);
                if d > 0.0 {
                    1.0 / d
                } else {
                    0.0
                }
            })
            .collect();
        Ok(Self {
            graph,
            config: config.clone(),
            measure,
        })
    }

    fn spread(&self, estimate: &mut [f64], generation: &[f64], vertices: &mut Frontier) {
        // vertices reached in this round start pushing in the next one
        let len = vertices.len();
        for pos in 0..len {
            let v = vertices.get(pos);
            let g = generation[v];
            for (u, w) in self.graph.neighbors(v) {
                estimate[*u] += g * w;
                vertices.insert(*u);
            }
        }
    }
}

impl<N: Neighborhood> Solver for Push<'_, N> {
    type Output = Outcome;

    fn solve(&self, seed: usize) -> Result<Self::Output> {
        let n = self.graph.original_size();
        let total = self.graph.vertex_size();
        check_vertex(seed, n)?;
        if self.measure[seed] <= 0.0 {
            let mut scores = vec![0.0; n];
            scores[seed] = 1.0;
            return Ok(Outcome {
                scores,
                iterations: 0,
                residual: 0.0,
                active_vertices: 1,
            });
        }

        let alpha = self.config.alpha;
        let beta = 1.0 - alpha;
        let mut estimate = vec![0.0; total];
        let mut residual = vec![0.0; total];
        let mut generation = vec![0.0; total];
        let mut prev = vec![0.0; total];
        prev[seed] = 1.0;
        estimate[seed] = alpha + beta * 0.5;
        residual[seed] = beta * 0.5;
        generation[seed] = residual[seed] * self.measure[seed];

        let mut vertices = Frontier::new(total);
        vertices.insert(seed);
        self.spread(&mut estimate, &generation, &mut vertices);
        let mut err = norm_1(vertices.as_slice().iter().map(|v| estimate[*v] - prev[*v]));

        let mut iterations = 0;
        while !(err <= self.config.epsilon) {
            if iterations == self.config.max_iterations {
                tracing::warn!(seed, alpha, iterations, err, "push did not converge");
                return Err(Error::NotConverged {
                    iterations,
                    residual: err,
                });
            }
            for v in vertices.as_slice().iter().copied() {
                prev[v] = estimate[v];
                residual[v] = prev[v] * beta * 0.5;
                estimate[v] = residual[v];
                generation[v] = residual[v] * self.measure[v];
            }
            estimate[seed] += alpha;
            self.spread(&mut estimate, &generation, &mut vertices);
            err = norm_1(vertices.as_slice().iter().map(|v| estimate[*v] - prev[*v]));
            iterations += 1;
            tracing::trace!(iterations, err, "push iteration");
        }

        tracing::debug!(
            seed,
            alpha,
            iterations,
            active_vertices = vertices.len(),
            "push converged"
        );
        estimate.truncate(n);
        Ok(Outcome {
            scores: estimate,
            iterations,
            residual: err,
            active_vertices: vertices.len(),
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
