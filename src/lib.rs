pub mod conductance;
pub use self::conductance::{conductance, cut, volume};
pub mod error;
pub use self::error::{Error, Result};
mod common;
pub use self::common::*;
mod frontier;
pub mod graph;
pub use self::graph::{Graph, Reduction};
pub mod hypergraph;
pub use self::hypergraph::Hypergraph;
pub mod sweep;
pub use self::sweep::{sweep_cut, SweepCut};

pub mod harness;
pub mod solver;

#[cfg(test)]
mod arbitrary;
#[cfg(test)]
mod subset;
