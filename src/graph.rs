use crate::{solver::Neighborhood, Hypergraph};
use std::collections::HashMap;

/// An ordinary weighted graph derived from a [`Hypergraph`].
///
/// Adjacency rows are sorted by neighbor, so iteration order never depends
/// on hashing.
#[derive(Debug, Clone)]
pub struct Graph {
    adj_list: Vec<Vec<(usize, f64)>>,
    degrees: Vec<f64>,
    original_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Star,
    Clique,
}

impl Graph {
    pub fn reduce(h: &Hypergraph, reduction: Reduction) -> Self {
        match reduction {
            Reduction::Star => Self::star(h),
            Reduction::Clique => Self::clique(h),
        }
    }

    /// Star expansion: hyperedge `e` becomes vertex `n + e`, linked to each
    /// member with weight `w_e / |e|`.
    pub fn star(h: &Hypergraph) -> Self {
        let n = h.vertex_size();
        let mut adj_list: Vec<Vec<(usize, f64)>> = vec![vec![]; n + h.edge_size()];
        for (e, members, w) in h.iter_edges() {
            let unit = w / members.len() as f64;
            let hub = n + e;
            for v in members.iter() {
                adj_list[hub].push((*v, unit));
                adj_list[*v].push((hub, unit));
            }
            adj_list[hub].sort_unstable_by_key(|(v, _)| *v);
        }
        Self::freeze(adj_list, n)
    }

    /// Clique expansion: every pair sharing a hyperedge is linked, weights
    /// summed over all hyperedges the pair shares.
    pub fn clique(h: &Hypergraph) -> Self {
        let n = h.vertex_size();
        let mut acc: Vec<HashMap<usize, f64, ahash::RandomState>> =
            (0..n).map(|_| HashMap::default()).collect();
        for (_, members, w) in h.iter_edges() {
            let mut it0 = members.iter();
            while let Some(u) = it0.next() {
                for v in it0.clone() {
                    *acc[*u].entry(*v).or_insert(0.0) += w;
                    *acc[*v].entry(*u).or_insert(0.0) += w;
                }
            }
        }
        let adj_list = acc
            .into_iter()
            .map(|row| {
                let mut row: Vec<_> = row.into_iter().collect();
                row.sort_unstable_by_key(|(v, _)| *v);
                row
            })
            .collect();
        Self::freeze(adj_list, n)
    }

    fn freeze(adj_list: Vec<Vec<(usize, f64)>>, original_size: usize) -> Self {
        let degrees = adj_list
            .iter()
            .map(|row| row.iter().map(|(_, w)| w).sum())
            .collect();
        Self {
            adj_list,
            degrees,
            original_size,
        }
    }

    pub fn edge_weight(&self, u: usize, v: usize) -> Option<f64> {
        let row = &self.adj_list[u];
        row.binary_search_by_key(&v, |(x, _)| *x)
            .ok()
            .map(|i| row[i].1)
    }

    pub fn total_volume(&self) -> f64 {
        self.degrees.iter().sum()
    }
}

impl Neighborhood for Graph {
    fn vertex_size(&self) -> usize {
        self.adj_list.len()
    }

    fn original_size(&self) -> usize {
        self.original_size
    }

    fn weighted_degree(&self, v: usize) -> f64 {
        self.degrees[v]
    }

    fn neighbors(&self, v: usize) -> &[(usize, f64)] {
        &self.adj_list[v]
    }
}
