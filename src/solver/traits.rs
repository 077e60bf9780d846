use crate::Result;

/// A local solver producing one score per vertex for a given seed.
pub trait Solver {
    type Output: SolverOutput;

    fn solve(&self, seed: usize) -> Result<Self::Output>;
}

pub trait SolverOutput {
    fn scores(&self) -> &[f64];
    fn into_scores(self) -> Vec<f64>;

    fn debug(&self) -> impl std::fmt::Debug + '_ {
        ScoresDebug(self.scores())
    }
}

/// Neighbor iteration over an ordinary weighted graph.
pub trait Neighborhood {
    fn vertex_size(&self) -> usize;
    /// Number of leading vertices that correspond to hypergraph vertices.
    fn original_size(&self) -> usize;
    fn weighted_degree(&self, v: usize) -> f64;
    fn neighbors(&self, v: usize) -> &[(usize, f64)];
}

struct ScoresDebug<'a>(&'a [f64]);

impl std::fmt::Debug for ScoresDebug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (v, x) in self.0.iter().enumerate() {
            if *x != 0.0 {
                writeln!(f, "{v:?}: {x:?}")?;
            }
        }
        Ok(())
    }
}
