use crate::error::*;
use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// An immutable weighted hypergraph over vertices `0..vertex_size()`.
///
/// Hyperedges keep the member order they were built with. Weighted degrees
/// and vertex→hyperedge incidence are computed once at construction.
#[derive(Debug, Clone)]
pub struct Hypergraph {
    edges: Vec<Vec<usize>>,
    edge_weights: Vec<f64>,
    incident_edges: Vec<Vec<usize>>,
    degrees: Vec<f64>,
}

impl Hypergraph {
    /// Builds a hypergraph with exactly `vertex_size` vertices.
    ///
    /// Repeated members inside one hyperedge are kept once.
    pub fn new<I, E>(vertex_size: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (E, f64)>,
        E: IntoIterator<Item = usize>,
    {
        let mut res = Self {
            edges: vec![],
            edge_weights: vec![],
            incident_edges: vec![vec![]; vertex_size],
            degrees: vec![0.0; vertex_size],
        };
        for (members, weight) in edges {
            let e = res.edges.len();
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidWeight { edge: e, weight });
            }
            let mut seen: HashSet<usize, ahash::RandomState> = HashSet::default();
            let mut edge = vec![];
            for v in members {
                check_vertex(v, vertex_size)?;
                if seen.insert(v) {
                    edge.push(v);
                }
            }
            if edge.is_empty() {
                return Err(Error::EmptyHyperedge { edge: e });
            }
            for v in edge.iter() {
                res.incident_edges[*v].push(e);
                res.degrees[*v] += weight;
            }
            res.edges.push(edge);
            res.edge_weights.push(weight);
        }
        Ok(res)
    }

    /// Builds a hypergraph whose vertex size is one more than the largest
    /// member index.
    pub fn from_edges(edges: Vec<(Vec<usize>, f64)>) -> Result<Self> {
        let vertex_size = edges
            .iter()
            .flat_map(|(members, _)| members.iter())
            .max()
            .map_or(0, |v| v + 1);
        Self::new(vertex_size, edges)
    }

    /// Reads one hyperedge per line: member indices followed by the weight.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut edges = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let tokens: Vec<_> = line.split_whitespace().collect();
            let Some((weight, members)) = tokens.split_last() else {
                continue;
            };
            if members.is_empty() {
                return Err(Error::Parse {
                    line: lineno,
                    reason: "expected member vertices before the weight".to_string(),
                });
            }
            let weight: f64 = weight.parse().map_err(|_| Error::Parse {
                line: lineno,
                reason: format!("invalid weight {weight:?}"),
            })?;
            let members = members
                .iter()
                .map(|tok| {
                    tok.parse::<usize>().map_err(|_| Error::Parse {
                        line: lineno,
                        reason: format!("invalid vertex {tok:?}"),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            edges.push((members, weight));
        }
        let res = Self::from_edges(edges)?;
        tracing::debug!(
            vertices = res.vertex_size(),
            edges = res.edge_size(),
            "hypergraph loaded"
        );
        Ok(res)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path)?;
        Self::read(BufReader::new(f))
    }

    pub fn vertex_size(&self) -> usize {
        self.incident_edges.len()
    }

    pub fn edge_size(&self) -> usize {
        self.edges.len()
    }

    pub fn members(&self, e: usize) -> &[usize] {
        &self.edges[e]
    }

    pub fn edge_weight(&self, e: usize) -> f64 {
        self.edge_weights[e]
    }

    pub fn incident_edges(&self, v: usize) -> &[usize] {
        &self.incident_edges[v]
    }

    /// Sum of the weights of the hyperedges containing `v`.
    pub fn weighted_degree(&self, v: usize) -> f64 {
        self.degrees[v]
    }

    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    pub fn total_volume(&self) -> f64 {
        self.degrees.iter().sum()
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, &[usize], f64)> + '_ {
        self.edges
            .iter()
            .zip(self.edge_weights.iter())
            .enumerate()
            .map(|(e, (members, w))| (e, members.as_slice(), *w))
    }

    pub fn average_degree(&self) -> f64 {
        if self.vertex_size() == 0 {
            return 0.0;
        }
        self.total_volume() / self.vertex_size() as f64
    }

    pub fn average_edge_size(&self) -> f64 {
        if self.edge_size() == 0 {
            return 0.0;
        }
        let incidences: usize = self.edges.iter().map(|e| e.len()).sum();
        incidences as f64 / self.edge_size() as f64
    }
}
