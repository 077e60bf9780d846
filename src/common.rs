use std::collections::HashSet;

pub fn norm_1<I: IntoIterator<Item = f64>>(v: I) -> f64 {
    v.into_iter().map(|x| x.abs()).sum()
}

pub fn norm_2<I: IntoIterator<Item = f64>>(v: I) -> f64 {
    v.into_iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Vertices carrying non-negligible mass.
pub fn support(p: &[f64]) -> HashSet<usize, ahash::RandomState> {
    p.iter()
        .enumerate()
        .filter_map(|(v, val)| {
            if *val < -1e-7 || *val > 1e-7 {
                Some(v)
            } else {
                None
            }
        })
        .collect()
}
