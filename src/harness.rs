//! Seed-by-seed evaluation of a clustering method.
//!
//! For each seed every teleport candidate of the method is solved and swept
//! against the hypergraph; the best conductance and the wall time of the
//! whole candidate loop form one [`RunRecord`], which is handed to a
//! [`Sink`].

use crate::{
    error::*,
    solver::{diffusion, hypercut, push, Solver, SolverOutput},
    sweep, Graph, Hypergraph, Reduction,
};
use rand::Rng;
use std::{
    fmt,
    io::Write,
    time::{Duration, Instant},
};

/// Teleport candidates shared by the reduced-graph baselines.
pub const REDUCTION_ALPHAS: [f64; 19] = [
    0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.60, 0.65, 0.70, 0.75, 0.80,
    0.85, 0.90, 0.95,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Diffusion,
    HyperCut,
    Star,
    Clique,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Diffusion,
        Method::HyperCut,
        Method::Star,
        Method::Clique,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Diffusion => "LocalClustering",
            Method::HyperCut => "HyperCut",
            Method::Star => "Star",
            Method::Clique => "Clique",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sweep: sweep::Config,
    /// Base settings; `alpha` is replaced by each candidate.
    pub diffusion: diffusion::Config,
    /// Growth ratio of the geometric diffusion candidates.
    pub diffusion_ratio: f64,
    pub hypercut: hypercut::Config,
    /// Base settings; `alpha` is replaced by each candidate.
    pub push: push::Config,
    pub reduction_alphas: Vec<f64>,
    pub seed_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep: sweep::Config::default(),
            diffusion: diffusion::Config::default(),
            diffusion_ratio: 0.9,
            hypercut: hypercut::Config::default(),
            push: push::Config::default(),
            reduction_alphas: REDUCTION_ALPHAS.to_vec(),
            seed_count: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRecord {
    pub seed: usize,
    /// Best sweep conductance over all candidates; infinite when no prefix
    /// fit under the volume cap.
    pub conductance: f64,
    pub elapsed: Duration,
}

/// Receives the records of one method on one hypergraph.
pub trait Sink {
    fn begin(&mut self, h: &Hypergraph, method: Method) -> Result<()>;
    fn record(&mut self, record: &RunRecord) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

/// `(1 + ratio)^i / (n * m)` for `i` in `0..=floor(ln(n * m) / ln(1 + ratio))`.
pub fn geometric_alphas(vertex_size: usize, edge_size: usize, ratio: f64) -> Vec<f64> {
    let nm = (vertex_size * edge_size) as f64;
    if nm < 1.0 {
        return vec![];
    }
    let last = (nm.ln() / (1.0 + ratio).ln()).floor() as i32;
    (0..=last).map(|i| (1.0 + ratio).powi(i) / nm).collect()
}

/// Draws `count` distinct vertices uniformly, in draw order.
pub fn sample_seeds<R: Rng>(rng: &mut R, vertex_size: usize, count: usize) -> Result<Vec<usize>> {
    if count > vertex_size {
        return Err(Error::InvalidParameter(format!(
            "{count} distinct seeds from {vertex_size} vertices"
        )));
    }
    let mut taken = vec![false; vertex_size];
    let mut seeds = Vec::with_capacity(count);
    while seeds.len() < count {
        let v = rng.random_range(0..vertex_size);
        if !taken[v] {
            taken[v] = true;
            seeds.push(v);
        }
    }
    Ok(seeds)
}

/// Runs every candidate of `method` from `seed` and keeps the best sweep.
pub fn evaluate(h: &Hypergraph, method: Method, seed: usize, config: &Config) -> Result<RunRecord> {
    check_vertex(seed, h.vertex_size())?;
    let start = Instant::now();
    let conductance = match method {
        Method::Diffusion => {
            let alphas =
                geometric_alphas(h.vertex_size(), h.edge_size(), config.diffusion_ratio);
            best_over(h, &alphas, &config.sweep, |alpha| {
                let cfg = diffusion::Config {
                    alpha,
                    ..config.diffusion.clone()
                };
                diffusion::Diffusion::new(h, &cfg)?.solve(seed)
            })?
        }
        Method::HyperCut => best_over(h, &[config.hypercut.alpha], &config.sweep, |_| {
            hypercut::HyperCut::new(h, &config.hypercut)?.solve(seed)
        })?,
        Method::Star | Method::Clique => {
            let g = Graph::reduce(h, reduction_of(method));
            best_over(h, &config.reduction_alphas, &config.sweep, |alpha| {
                let cfg = push::Config {
                    alpha,
                    ..config.push.clone()
                };
                push::Push::new(&g, &cfg)?.solve(seed)
            })?
        }
    };
    let elapsed = start.elapsed();
    tracing::info!(%method, seed, conductance, ?elapsed, "seed evaluated");
    Ok(RunRecord {
        seed,
        conductance,
        elapsed,
    })
}

/// Evaluates `method` on each seed in order and streams the records to `sink`.
pub fn run<K: Sink + ?Sized>(
    h: &Hypergraph,
    method: Method,
    seeds: &[usize],
    config: &Config,
    sink: &mut K,
) -> Result<Vec<RunRecord>> {
    sink.begin(h, method)?;
    let mut records = Vec::with_capacity(seeds.len());
    for seed in seeds.iter().copied() {
        let record = evaluate(h, method, seed, config)?;
        sink.record(&record)?;
        records.push(record);
    }
    sink.finish()?;
    Ok(records)
}

fn reduction_of(method: Method) -> Reduction {
    match method {
        Method::Star => Reduction::Star,
        _ => Reduction::Clique,
    }
}

fn best_over<O, F>(h: &Hypergraph, alphas: &[f64], sweep: &sweep::Config, mut solve: F) -> Result<f64>
where
    O: SolverOutput,
    F: FnMut(f64) -> Result<O>,
{
    let mut best = f64::INFINITY;
    for alpha in alphas.iter().copied() {
        let scores = match solve(alpha) {
            Ok(out) => out.into_scores(),
            Err(Error::NotConverged {
                iterations,
                residual,
            }) => {
                tracing::warn!(alpha, iterations, residual, "skipping candidate");
                continue;
            }
            Err(e) => return Err(e),
        };
        if let Some(cut) = sweep::sweep_cut(h, &scores, sweep)? {
            best = best.min(cut.conductance);
        }
    }
    Ok(best)
}

/// Tab-separated report: a header with hypergraph statistics, one line per
/// seed, then the averages and the per-run conductance and time lists.
pub struct TsvSink<W: Write> {
    out: W,
    records: Vec<RunRecord>,
}

impl<W: Write> TsvSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: vec![],
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for TsvSink<W> {
    fn begin(&mut self, h: &Hypergraph, method: Method) -> Result<()> {
        self.records.clear();
        writeln!(self.out, "# method: {method}")?;
        writeln!(self.out, "# nodes: {}", h.vertex_size())?;
        writeln!(self.out, "# edges: {}", h.edge_size())?;
        writeln!(self.out, "average degree: {}", h.average_degree())?;
        writeln!(self.out, "average edge size: {}", h.average_edge_size())?;
        writeln!(self.out)?;
        writeln!(self.out, "seed vertex\tconductance\t\ttime (us)")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn record(&mut self, record: &RunRecord) -> Result<()> {
        self.records.push(*record);
        writeln!(
            self.out,
            "{}\t\t{}\t\t{}",
            record.seed,
            record.conductance,
            record.elapsed.as_micros()
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.records.is_empty() {
            let runs = self.records.len() as f64;
            let conductance: f64 = self.records.iter().map(|r| r.conductance).sum();
            let elapsed: u128 = self.records.iter().map(|r| r.elapsed.as_micros()).sum();
            writeln!(self.out)?;
            writeln!(self.out, "Average values:")?;
            writeln!(
                self.out,
                "\t\t{}\t\t{}",
                conductance / runs,
                elapsed as f64 / runs
            )?;

            let conductances: Vec<String> =
                self.records.iter().map(|r| r.conductance.to_string()).collect();
            writeln!(self.out)?;
            writeln!(self.out, "Conductance")?;
            writeln!(self.out, "{}", conductances.join(", "))?;

            let times: Vec<String> = self
                .records
                .iter()
                .map(|r| r.elapsed.as_micros().to_string())
                .collect();
            writeln!(self.out)?;
            writeln!(self.out, "time taken (us)")?;
            writeln!(self.out, "{}", times.join(", "))?;
        }
        self.out.flush()?;
        Ok(())
    }
}
