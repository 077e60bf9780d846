/// A grow-only set of indices that remembers insertion order.
///
/// Iteration follows insertion order, which keeps every solver that walks a
/// frontier deterministic.
#[derive(Debug, Clone)]
pub struct Frontier {
    members: Vec<usize>,
    seen: Vec<bool>,
}

impl Frontier {
    pub fn new(universe: usize) -> Self {
        Self {
            members: vec![],
            seen: vec![false; universe],
        }
    }

    /// Returns `true` if `i` was not in the frontier yet.
    pub fn insert(&mut self, i: usize) -> bool {
        if self.seen[i] {
            return false;
        }
        self.seen[i] = true;
        self.members.push(i);
        true
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.members
    }

    pub fn get(&self, pos: usize) -> usize {
        self.members[pos]
    }
}
