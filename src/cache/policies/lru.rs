use super::ReplacementPolicy;

/// Least-recently-used replacement, grounded on the teacher's `LruPolicy`:
/// per set, a usage stack with index 0 the most-recently-used way and the
/// last entry the least-recently-used.
pub struct LruPolicy {
    usage: Vec<Vec<usize>>,
}

impl LruPolicy {
    pub fn new(num_sets: usize, ways: usize) -> Self {
        let usage = (0..num_sets).map(|_| (0..ways).collect()).collect();
        Self { usage }
    }
}

impl ReplacementPolicy for LruPolicy {
    fn update(&mut self, set: usize, way: usize, _is_insertion: bool) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&w| w == way) {
            stack.remove(pos);
        }
        stack.insert(0, way);
    }

    fn get_victim(&mut self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }
}
