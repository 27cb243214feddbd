use super::ReplacementPolicy;

/// Static re-reference interval prediction.
///
/// Each `(set, way)` carries an RRPV counter in `0..=max_rrpv`. A hit resets
/// the counter to 0 ("near-immediate re-reference"); a fresh insertion seeds
/// `max_rrpv - 1` ("long re-reference, but not maximal"), matching the
/// specification's stated insertion value.
pub struct SrripPolicy {
    rrpv: Vec<Vec<u8>>,
    max_rrpv: u8,
}

impl SrripPolicy {
    pub fn new(num_sets: usize, ways: usize, rrpv_bits: u32) -> Self {
        let max_rrpv = ((1u32 << rrpv_bits) - 1) as u8;
        Self {
            rrpv: vec![vec![max_rrpv; ways]; num_sets],
            max_rrpv,
        }
    }
}

impl ReplacementPolicy for SrripPolicy {
    fn update(&mut self, set: usize, way: usize, is_insertion: bool) {
        self.rrpv[set][way] = if is_insertion {
            self.max_rrpv.saturating_sub(1)
        } else {
            0
        };
    }

    fn get_victim(&mut self, set: usize) -> usize {
        loop {
            if let Some(way) = self.rrpv[set]
                .iter()
                .position(|&rrpv| rrpv == self.max_rrpv)
            {
                return way;
            }
            for rrpv in &mut self.rrpv[set] {
                if *rrpv < self.max_rrpv {
                    *rrpv += 1;
                }
            }
        }
    }
}
