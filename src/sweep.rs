//! Sweep cuts: the best-conductance prefix of a score ranking.
//!
//! Vertices are ranked by `score / weighted degree`, descending, and admitted
//! one by one until the admitted volume would exceed
//! `volume_fraction * total volume`. The cut weight is maintained
//! incrementally, so a sweep costs one pass over the incidences of the
//! admitted vertices plus the sort.

use crate::{error::*, solver::Neighborhood, Graph, Hypergraph};

#[derive(Debug, Clone)]
pub struct Config {
    /// Largest admitted share of the total volume, in `(0, 1]`.
    pub volume_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            volume_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepCut {
    pub conductance: f64,
    pub cut: f64,
    pub volume: f64,
    /// The prefix attaining `conductance`, in ranking order.
    pub cluster: Vec<usize>,
}

/// Structures whose cut weight can be tracked while a vertex set grows.
pub trait Sweepable {
    type Tracker<'a>: CutTracker
    where
        Self: 'a;

    fn vertex_count(&self) -> usize;
    fn vertex_weight(&self, v: usize) -> f64;
    fn tracker(&self) -> Self::Tracker<'_>;
}

pub trait CutTracker {
    /// Adds `v` to the set and returns the change in cut weight.
    fn admit(&mut self, v: usize) -> f64;
}

pub struct HyperedgeTracker<'a> {
    hypergraph: &'a Hypergraph,
    contained: Vec<usize>,
}

impl CutTracker for HyperedgeTracker<'_> {
    fn admit(&mut self, v: usize) -> f64 {
        let h = self.hypergraph;
        let mut delta = 0.0;
        for e in h.incident_edges(v).iter().copied() {
            let size = h.members(e).len();
            // first member in: the edge becomes cut
            if self.contained[e] == 0 {
                delta += h.edge_weight(e);
            }
            // last member in: the edge is no longer cut
            if self.contained[e] + 1 == size {
                delta -= h.edge_weight(e);
            }
            self.contained[e] += 1;
        }
        delta
    }
}

impl Sweepable for Hypergraph {
    type Tracker<'a> = HyperedgeTracker<'a>;

    fn vertex_count(&self) -> usize {
        self.vertex_size()
    }

    fn vertex_weight(&self, v: usize) -> f64 {
        self.weighted_degree(v)
    }

    fn tracker(&self) -> Self::Tracker<'_> {
        HyperedgeTracker {
            hypergraph: self,
            contained: vec![0; self.edge_size()],
        }
    }
}

pub struct EdgeTracker<'a> {
    graph: &'a Graph,
    inside: Vec<bool>,
}

impl CutTracker for EdgeTracker<'_> {
    fn admit(&mut self, v: usize) -> f64 {
        let mut delta = 0.0;
        for (u, w) in self.graph.neighbors(v) {
            if self.inside[*u] {
                delta -= w;
            } else {
                delta += w;
            }
        }
        self.inside[v] = true;
        delta
    }
}

/// Ordinary edge cut over every graph vertex. A star expansion's hubs are
/// vertices too, so scores restricted to the hypergraph vertices (what the
/// reduced-graph push returns) are swept against the [`Hypergraph`] instead.
impl Sweepable for Graph {
    type Tracker<'a> = EdgeTracker<'a>;

    fn vertex_count(&self) -> usize {
        self.vertex_size()
    }

    fn vertex_weight(&self, v: usize) -> f64 {
        self.weighted_degree(v)
    }

    fn tracker(&self) -> Self::Tracker<'_> {
        EdgeTracker {
            graph: self,
            inside: vec![false; self.vertex_size()],
        }
    }
}

/// Vertex order by degree-normalized score, highest first; ties keep index
/// order.
pub fn ranking<S: Sweepable + ?Sized>(s: &S, scores: &[f64]) -> Vec<usize> {
    let normalized: Vec<f64> = scores
        .iter()
        .enumerate()
        .map(|(v, x)| {
            let d = s.vertex_weight(v);
            if d > 0.0 {
                x / d
            } else {
                0.0
            }
        })
        .collect();
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| normalized[*b].total_cmp(&normalized[*a]));
    order
}

/// Returns the minimum-conductance prefix of the ranking, or `None` when no
/// prefix fits under the volume cap.
///
/// `scores` needs one entry per vertex of `s`.
pub fn sweep_cut<S: Sweepable + ?Sized>(
    s: &S,
    scores: &[f64],
    config: &Config,
) -> Result<Option<SweepCut>> {
    if scores.len() != s.vertex_count() {
        return Err(Error::InvalidParameter(format!(
            "{} scores for {} vertices",
            scores.len(),
            s.vertex_count()
        )));
    }
    let fraction = config.volume_fraction;
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(Error::InvalidParameter(format!(
            "volume_fraction={fraction}"
        )));
    }

    let vol_total: f64 = (0..s.vertex_count()).map(|v| s.vertex_weight(v)).sum();
    let cap = vol_total * fraction;
    let order = ranking(s, scores);
    let mut tracker = s.tracker();
    let mut vol_s = 0.0;
    let mut cut = 0.0;
    let mut best: Option<(f64, f64, f64, usize)> = None;
    for (i, v) in order.iter().copied().enumerate() {
        vol_s += s.vertex_weight(v);
        if vol_s > cap {
            break;
        }
        cut += tracker.admit(v);
        let divider = f64::min(vol_s, vol_total - vol_s);
        if divider <= 0.0 {
            continue;
        }
        let conductance = cut / divider;
        if best.map_or(true, |(c, ..)| conductance < c) {
            best = Some((conductance, cut, vol_s, i + 1));
        }
    }
    Ok(best.map(|(conductance, cut, volume, len)| SweepCut {
        conductance,
        cut,
        volume,
        cluster: order[..len].to_vec(),
    }))
}
