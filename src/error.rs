use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("vertex {vertex} out of range (vertex size={vertex_size})")]
    VertexOutOfRange { vertex: usize, vertex_size: usize },

    #[error("hyperedge {edge} has no members")]
    EmptyHyperedge { edge: usize },

    #[error("hyperedge {edge} has invalid weight {weight}")]
    InvalidWeight { edge: usize, weight: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("did not converge within {iterations} iterations (residual={residual})")]
    NotConverged { iterations: usize, residual: f64 },
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("alpha={alpha}")))
    }
}

pub(crate) fn check_positive(name: &str, x: f64) -> Result<()> {
    if x > 0.0 && x.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("{name}={x}")))
    }
}

pub(crate) fn check_vertex(vertex: usize, vertex_size: usize) -> Result<()> {
    if vertex < vertex_size {
        Ok(())
    } else {
        Err(Error::VertexOutOfRange {
            vertex,
            vertex_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = Error::VertexOutOfRange {
            vertex: 7,
            vertex_size: 3,
        };
        assert_eq!(e.to_string(), "vertex 7 out of range (vertex size=3)");
        let e = Error::Parse {
            line: 2,
            reason: "missing weight".to_string(),
        };
        assert_eq!(e.to_string(), "line 2: missing weight");
    }

    #[test]
    fn alpha_range() {
        assert!(check_alpha(0.5).is_ok());
        assert!(check_alpha(1.0).is_ok());
        assert!(check_alpha(0.0).is_err());
        assert!(check_alpha(1.5).is_err());
        assert!(check_alpha(f64::NAN).is_err());
    }
}
