//! Nonlinear hypergraph diffusion integrated with explicit Euler steps.
//!
//! The state `x` follows
//!
//! ```text
//! dx/dt = -((1 - alpha) * Flow(x) + alpha * (x - e_seed))
//! ```
//!
//! where `Flow` moves mass inside every hyperedge from the members of
//! highest degree-normalized potential to those of lowest.

use super::*;
use crate::{error::*, frontier::Frontier, Hypergraph};

/// Potentials closer than this are treated as tied.
pub const TIE_TOLERANCE: f64 = 1e-8;
/// Scores below this are zeroed after each step of the active-set schedule.
pub const CLIP_THRESHOLD: f64 = 1e-5;

#[derive(Debug, Clone)]
pub struct Config {
    pub alpha: f64,
    pub dt: f64,
    pub horizon: f64,
    /// Evaluate the flow only over hyperedges the diffusion has reached.
    pub active_set: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            dt: 1.0,
            horizon: 30.0,
            active_set: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub scores: Vec<f64>,
    pub steps: usize,
    pub active_edges: usize,
}

pub struct Diffusion<'a> {
    hypergraph: &'a Hypergraph,
    config: Config,
}

impl<'a> Diffusion<'a> {
    pub fn new(hypergraph: &'a Hypergraph, config: &Config) -> Result<Self> {
        check_alpha(config.alpha)?;
        check_positive("dt", config.dt)?;
        check_positive("horizon", config.horizon)?;
        Ok(Self {
            hypergraph,
            config: config.clone(),
        })
    }
}

impl Solver for Diffusion<'_> {
    type Output = Outcome;

    fn solve(&self, seed: usize) -> Result<Self::Output> {
        let h = self.hypergraph;
        check_vertex(seed, h.vertex_size())?;
        if h.weighted_degree(seed) <= 0.0 {
            let mut scores = vec![0.0; h.vertex_size()];
            scores[seed] = 1.0;
            return Ok(Outcome {
                scores,
                steps: 0,
                active_edges: 0,
            });
        }
        let res = if self.config.active_set {
            self.run_active(seed)
        } else {
            self.run_full(seed)
        };
        tracing::debug!(
            seed,
            alpha = self.config.alpha,
            steps = res.steps,
            active_edges = res.active_edges,
            "diffusion finished"
        );
        Ok(res)
    }
}

impl Diffusion<'_> {
    fn run_full(&self, seed: usize) -> Outcome {
        let h = self.hypergraph;
        let alpha = self.config.alpha;
        let mut x = vec![0.0; h.vertex_size()];
        x[seed] = 1.0;
        let mut drift = vec![0.0; h.vertex_size()];
        let mut steps = 0;
        for step in self.step_sizes() {
            drift.fill(0.0);
            flow(h, &x, 0..h.edge_size(), &mut drift);
            for (v, x_v) in x.iter_mut().enumerate() {
                let restart = if v == seed { 1.0 } else { 0.0 };
                let dv = (1.0 - alpha) * drift[v] + alpha * (*x_v - restart);
                *x_v -= dv * step;
            }
            steps += 1;
        }
        Outcome {
            scores: x,
            steps,
            active_edges: h.edge_size(),
        }
    }

    fn run_active(&self, seed: usize) -> Outcome {
        let h = self.hypergraph;
        let alpha = self.config.alpha;
        let mut x = vec![0.0; h.vertex_size()];
        x[seed] = 1.0;
        let mut drift = vec![0.0; h.vertex_size()];
        // every vertex with non-zero mass is a member of `vertices`
        let mut edges = Frontier::new(h.edge_size());
        let mut vertices = Frontier::new(h.vertex_size());
        vertices.insert(seed);
        self.activate(seed, &mut edges, &mut vertices);

        let mut arrivals = vec![];
        let mut steps = 0;
        for step in self.step_sizes() {
            for v in vertices.as_slice() {
                drift[*v] = 0.0;
            }
            flow(h, &x, edges.as_slice().iter().copied(), &mut drift);

            arrivals.clear();
            for v in vertices.as_slice().iter().copied() {
                let prev = x[v];
                let restart = if v == seed { 1.0 } else { 0.0 };
                let dv = (1.0 - alpha) * drift[v] + alpha * (prev - restart);
                let mut next = prev - dv * step;
                if next < CLIP_THRESHOLD {
                    next = 0.0;
                }
                if prev == 0.0 && next != 0.0 {
                    arrivals.push(v);
                }
                x[v] = next;
            }
            arrivals.sort_unstable();
            for v in arrivals.iter() {
                self.activate(*v, &mut edges, &mut vertices);
            }
            tracing::trace!(step = steps, active_edges = edges.len(), "diffusion step");
            steps += 1;
        }
        Outcome {
            scores: x,
            steps,
            active_edges: edges.len(),
        }
    }

    /// `ceil(horizon / dt)` Euler steps of size `dt`, the last one cut to
    /// end exactly at the horizon.
    fn step_sizes(&self) -> impl Iterator<Item = f64> {
        let dt = self.config.dt;
        let horizon = self.config.horizon;
        let count = (horizon / dt).ceil() as usize;
        (0..count).map(move |i| f64::min(dt, horizon - i as f64 * dt).max(0.0))
    }

    fn activate(&self, v: usize, edges: &mut Frontier, vertices: &mut Frontier) {
        for e in self.hypergraph.incident_edges(v) {
            if edges.insert(*e) {
                for u in self.hypergraph.members(*e) {
                    vertices.insert(*u);
                }
            }
        }
    }
}

/// Accumulates the hyperedge flow of `x` over `edges` into `out`.
///
/// In each hyperedge, `w_e * (max - min)` of the degree-normalized potential
/// is added evenly to the members attaining the maximum and subtracted evenly
/// from those attaining the minimum, ties taken within [`TIE_TOLERANCE`].
pub fn flow<I>(h: &Hypergraph, x: &[f64], edges: I, out: &mut [f64])
where
    I: IntoIterator<Item = usize>,
{
    let mut argmax = vec![];
    let mut argmin = vec![];
    for e in edges {
        let w = h.edge_weight(e);
        if w == 0.0 {
            continue;
        }
        argmax.clear();
        argmin.clear();
        let mut max_val = f64::MIN;
        let mut min_val = f64::MAX;
        for v in h.members(e).iter().copied() {
            let val = potential(h, x, v);
            if val > max_val + TIE_TOLERANCE {
                max_val = val;
                argmax.clear();
                argmax.push(v);
            } else if val > max_val - TIE_TOLERANCE {
                argmax.push(v);
            }

            if val < min_val - TIE_TOLERANCE {
                min_val = val;
                argmin.clear();
                argmin.push(v);
            } else if val < min_val + TIE_TOLERANCE {
                argmin.push(v);
            }
        }
        assert!(
            !argmax.is_empty() && !argmin.is_empty(),
            "hyperedge {e} has no members"
        );
        let amount = w * (max_val - min_val);
        let up = amount / argmax.len() as f64;
        for v in argmax.iter() {
            out[*v] += up;
        }
        let down = amount / argmin.len() as f64;
        for v in argmin.iter() {
            out[*v] -= down;
        }
    }
}

fn potential(h: &Hypergraph, x: &[f64], v: usize) -> f64 {
    let d = h.weighted_degree(v);
    if d > 0.0 {
        x[v] / d
    } else {
        0.0
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::RandomHypergraph;
    use crate::sweep;
    use quickcheck_macros::quickcheck;

    fn path() -> Hypergraph {
        Hypergraph::new(3, [(vec![0, 1], 1.0), (vec![1, 2], 1.0)]).unwrap()
    }

    #[test]
    fn path_first_steps() {
        let h = path();
        let cfg = Config {
            alpha: 0.5,
            dt: 1.0,
            horizon: 2.0,
            active_set: false,
        };
        let res = Diffusion::new(&h, &cfg).unwrap().solve(1).unwrap();
        assert_eq!(res.steps, 2);
        // [0, 1, 0] -> [0.25, 0.5, 0.25] -> [0.125, 0.75, 0.125]
        assert_eq!(res.scores, vec![0.125, 0.75, 0.125]);
    }

    #[test]
    fn path_is_symmetric() {
        let h = path();
        for active_set in [false, true] {
            let cfg = Config {
                alpha: 0.5,
                active_set,
                ..Config::default()
            };
            let res = Diffusion::new(&h, &cfg).unwrap().solve(1).unwrap();
            assert_eq!(res.steps, 30);
            assert_eq!(res.scores[0], res.scores[2], "{:?}", res.debug());
            assert!(res.scores[1] > res.scores[0]);

            let cut = sweep::sweep_cut(&h, &res.scores, &sweep::Config::default())
                .unwrap()
                .unwrap();
            // every proper cut of this path has conductance 1
            assert!((cut.conductance - 1.0).abs() < 1e-12, "{cut:?}");
        }
    }

    #[test]
    fn last_step_is_truncated() {
        let h = path();
        let cfg = Config {
            alpha: 0.5,
            dt: 0.4,
            horizon: 1.0,
            active_set: false,
        };
        let res = Diffusion::new(&h, &cfg).unwrap().solve(0).unwrap();
        assert_eq!(res.steps, 3);
    }

    #[test]
    fn step_count_is_ceiling() {
        let h = path();
        let cases = [(0.1, 1.0, 10), (0.1, 5.0, 50), (0.3, 0.9, 3), (0.4, 1.0, 3)];
        for (dt, horizon, expected) in cases {
            for active_set in [false, true] {
                let cfg = Config {
                    alpha: 0.5,
                    dt,
                    horizon,
                    active_set,
                };
                let res = Diffusion::new(&h, &cfg).unwrap().solve(1).unwrap();
                assert_eq!(res.steps, expected, "dt={dt} horizon={horizon}");
            }
        }
    }

    #[test]
    fn zero_degree_seed() {
        let h = Hypergraph::new(3, [(vec![0, 1], 1.0)]).unwrap();
        let res = Diffusion::new(&h, &Config::default())
            .unwrap()
            .solve(2)
            .unwrap();
        assert_eq!(res.scores, vec![0.0, 0.0, 1.0]);
        assert_eq!(res.steps, 0);
    }

    #[test]
    fn rejects_bad_input() {
        let h = path();
        let cfg = Config {
            alpha: 0.0,
            ..Config::default()
        };
        assert!(Diffusion::new(&h, &cfg).is_err());
        let cfg = Config {
            dt: -1.0,
            ..Config::default()
        };
        assert!(Diffusion::new(&h, &cfg).is_err());
        let cfg = Config {
            horizon: 0.0,
            ..Config::default()
        };
        assert!(Diffusion::new(&h, &cfg).is_err());
        let d = Diffusion::new(&h, &Config::default()).unwrap();
        assert!(matches!(
            d.solve(3),
            Err(Error::VertexOutOfRange { vertex: 3, .. })
        ));
    }

    #[test]
    fn ties_split_evenly() {
        let h = Hypergraph::new(3, [(vec![0, 1, 2], 2.0)]).unwrap();
        let x = [0.5, 0.5, 0.0];
        let mut out = vec![0.0; 3];
        flow(&h, &x, [0], &mut out);
        // potentials 0.25, 0.25, 0: both maxima share the outflow
        assert_eq!(out, vec![0.25, 0.25, -0.5]);

        let x = [0.5, 0.5 + 1e-9, 0.5];
        let mut out = vec![0.0; 3];
        flow(&h, &x, [0], &mut out);
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn active_set_tracks_full() {
        let h = Hypergraph::new(
            6,
            [
                (vec![0, 1, 2], 1.0),
                (vec![2, 3], 2.0),
                (vec![3, 4, 5], 1.0),
                (vec![1, 4], 1.0),
            ],
        )
        .unwrap();
        let cfg = Config {
            alpha: 0.2,
            dt: 0.1,
            horizon: 5.0,
            active_set: false,
        };
        let full = Diffusion::new(&h, &cfg).unwrap().solve(0).unwrap();
        let cfg = Config {
            active_set: true,
            ..cfg
        };
        let active = Diffusion::new(&h, &cfg).unwrap().solve(0).unwrap();
        assert_eq!(full.steps, active.steps);
        assert_eq!(active.active_edges, 4);
        for (a, b) in full.scores.iter().zip(active.scores.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn active_set_stays_local() {
        let h = Hypergraph::new(5, [(vec![0, 1], 1.0), (vec![2, 3, 4], 1.0)]).unwrap();
        let cfg = Config {
            alpha: 0.3,
            ..Config::default()
        };
        let res = Diffusion::new(&h, &cfg).unwrap().solve(0).unwrap();
        assert_eq!(res.active_edges, 1);
        assert_eq!(&res.scores[2..], &[0.0, 0.0, 0.0]);
    }

    #[quickcheck]
    fn flow_is_conservative(g: RandomHypergraph) {
        let h = &g.hypergraph;
        for e in 0..h.edge_size() {
            let mut out = vec![0.0; h.vertex_size()];
            flow(h, &g.scores, [e], &mut out);
            let total: f64 = out.iter().sum();
            let scale: f64 = out.iter().map(|x| x.abs()).sum::<f64>() + 1.0;
            assert!(total.abs() < 1e-12 * scale, "edge {e}: {total}");
        }
    }

    #[quickcheck]
    fn pure_teleport_is_identity(g: RandomHypergraph) {
        let h = &g.hypergraph;
        for active_set in [false, true] {
            let cfg = Config {
                alpha: 1.0,
                active_set,
                ..Config::default()
            };
            let res = Diffusion::new(h, &cfg).unwrap().solve(g.seed).unwrap();
            let mut expected = vec![0.0; h.vertex_size()];
            expected[g.seed] = 1.0;
            assert_eq!(res.scores, expected);
        }
    }

    #[quickcheck]
    fn active_set_tracks_full_everywhere(g: RandomHypergraph) {
        let h = &g.hypergraph;
        let cfg = Config {
            alpha: 0.2,
            dt: 0.1,
            horizon: 5.0,
            active_set: false,
        };
        let full = Diffusion::new(h, &cfg).unwrap().solve(g.seed).unwrap();
        let cfg = Config {
            active_set: true,
            ..cfg
        };
        let active = Diffusion::new(h, &cfg).unwrap().solve(g.seed).unwrap();
        assert_eq!(full.steps, active.steps);
        for (v, (a, b)) in full.scores.iter().zip(active.scores.iter()).enumerate() {
            assert!((a - b).abs() < 5e-3, "{v}: {a} vs {b}");
        }
    }

    #[quickcheck]
    fn deterministic(g: RandomHypergraph) {
        let h = &g.hypergraph;
        let cfg = Config {
            alpha: 0.15,
            ..Config::default()
        };
        let d = Diffusion::new(h, &cfg).unwrap();
        let a = d.solve(g.seed).unwrap();
        let b = d.solve(g.seed).unwrap();
        assert_eq!(a.scores, b.scores);
    }
}
