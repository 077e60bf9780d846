use crate::Hypergraph;
use std::collections::HashSet;

/// `cut(S) / min(vol(S), vol(V) - vol(S))` for a proper non-empty subset `S`.
pub fn conductance(h: &Hypergraph, s: &HashSet<usize, ahash::RandomState>) -> f64 {
    assert!(!s.is_empty());
    assert!(s.len() < h.vertex_size());
    let cut = cut(h, s);
    let vol_s = volume(h, s);
    let vol_g = h.total_volume();
    let divider = f64::min(vol_s, vol_g - vol_s);
    cut / divider
}

pub fn volume(h: &Hypergraph, s: &HashSet<usize, ahash::RandomState>) -> f64 {
    s.iter().map(|v| h.weighted_degree(*v)).sum()
}

/// Total weight of the hyperedges with members both inside and outside `s`.
pub fn cut(h: &Hypergraph, s: &HashSet<usize, ahash::RandomState>) -> f64 {
    let mut res = 0.0;
    for (_, members, w) in h.iter_edges() {
        let inside = members.iter().filter(|v| s.contains(v)).count();
        if inside > 0 && inside < members.len() {
            res += w;
        }
    }
    res
}

#[cfg(test)]
pub fn min_conductance(h: &Hypergraph) -> Option<f64> {
    let n = h.vertex_size();
    let mut min_conductance: Option<f64> = None;
    for vs in crate::subset::Subsets::new(n) {
        if vs.is_empty() || vs.len() == n {
            continue;
        }
        let vs: HashSet<_, ahash::RandomState> = vs.into_iter().collect();
        let conductance = conductance(h, &vs);
        if !conductance.is_finite() {
            continue;
        }
        if let Some(ref mut min_c) = min_conductance {
            if *min_c > conductance {
                *min_c = conductance;
            }
        } else {
            min_conductance = Some(conductance);
        }
    }
    min_conductance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(vs: &[usize]) -> HashSet<usize, ahash::RandomState> {
        vs.iter().copied().collect()
    }

    #[test]
    fn hyperedge_cut() {
        let h = Hypergraph::new(4, [(vec![0, 1, 2], 2.0), (vec![2, 3], 1.0), (vec![3], 5.0)])
            .unwrap();
        assert_eq!(cut(&h, &set(&[0])), 2.0);
        assert_eq!(cut(&h, &set(&[0, 1, 2])), 1.0);
        assert_eq!(cut(&h, &set(&[3])), 1.0);
        assert_eq!(volume(&h, &set(&[2, 3])), 3.0 + 6.0);
        assert!((conductance(&h, &set(&[0, 1, 2])) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn brute_force_two_blocks() {
        let h = Hypergraph::new(
            6,
            [
                (vec![0, 1, 2], 1.0),
                (vec![3, 4, 5], 1.0),
                (vec![2, 3], 1.0),
            ],
        )
        .unwrap();
        let best = min_conductance(&h).unwrap();
        assert!((best - 0.25).abs() < 1e-12, "{best}");
    }
}
