use std::iter::Iterator;

/// Every subset of `0..n` as an ascending index list, walked by bitmask.
pub struct Subsets {
    n: usize,
    next: u64,
    end: u64,
}

impl Subsets {
    pub fn new(n: usize) -> Self {
        assert!(n < 24, "too many subsets: n={n}");
        Self {
            n,
            next: 0,
            end: 1 << n,
        }
    }
}

impl Iterator for Subsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.end {
            return None;
        }
        let mask = self.next;
        self.next += 1;
        Some((0..self.n).filter(|i| mask & (1 << i) != 0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn zero() {
        let subsets: Vec<_> = Subsets::new(0).collect();
        assert_eq!(subsets.len(), 1, "{subsets:?}");
        assert!(subsets[0].is_empty(), "{subsets:?}");
    }

    #[test]
    fn three() {
        let subsets: Vec<_> = Subsets::new(3).collect();
        assert_eq!(subsets.len(), 8);
        let distinct: HashSet<_, ahash::RandomState> = subsets.iter().cloned().collect();
        assert_eq!(distinct.len(), 8);
        for ss in subsets.iter() {
            assert!(ss.iter().all(|i| *i < 3));
            assert!(ss.windows(2).all(|w| w[0] < w[1]));
        }
        assert!(subsets.contains(&vec![0, 1, 2]));
    }
}
