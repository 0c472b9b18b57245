//! Discretized allocations of the battery capacity across price-ranked hours.

use std::fmt::{Debug, Formatter};

/// Number of ranked slots in a scheduling window.
pub const N_SLOTS: usize = 6;

/// Number of allocation steps making up the whole capacity, that is 10% per step.
pub const N_STEPS: u8 = 10;

/// Capacity fractions per ranked slot, stored in whole steps so that the lattice is exact.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Distribution([u8; N_SLOTS]);

impl Distribution {
    pub const ZERO: Self = Self([0; N_SLOTS]);

    /// # Panics
    ///
    /// When the total exceeds the whole capacity.
    #[cfg(test)]
    pub const fn from_steps(steps: [u8; N_SLOTS]) -> Self {
        let mut total = 0;
        let mut i = 0;
        while i < N_SLOTS {
            total += steps[i];
            i += 1;
        }
        assert!(total <= N_STEPS, "the distribution must not exceed the capacity");
        Self(steps)
    }

    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        N_SLOTS
    }

    pub fn steps(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Capacity fraction per slot.
    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps().map(step_to_rate)
    }

    pub fn total_steps(&self) -> u8 {
        self.0.iter().sum()
    }

    pub fn total_rate(&self) -> f64 {
        step_to_rate(self.total_steps())
    }

    /// The largest single-slot allocation, used to prefer balanced distributions.
    pub fn max_steps(&self) -> u8 {
        self.0.iter().copied().max().unwrap_or_default()
    }
}

impl Debug for Distribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rates()).finish()
    }
}

fn step_to_rate(steps: u8) -> f64 {
    f64::from(steps) / f64::from(N_STEPS)
}

/// Total allocation a candidate has to satisfy.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Budget {
    /// Anything from nothing to the whole capacity.
    AtMost,

    /// The whole capacity, no less.
    Exactly,
}

/// Depth-first enumeration of every distribution within the budget.
///
/// Runs over an explicit stack of partial allocations, so the depth never exceeds
/// [`N_SLOTS`] and the search is pruned as soon as a branch cannot fit the budget.
/// Slots past `n_free` are pinned to zero. Every slot tries the largest allocation first.
pub struct Enumerator {
    stack: Vec<Partial>,
    n_free: usize,
    budget: Budget,
}

#[derive(Copy, Clone)]
struct Partial {
    steps: [u8; N_SLOTS],
    depth: usize,
    used: u8,
}

impl Enumerator {
    pub fn new(n_free: usize, budget: Budget) -> Self {
        let root = Partial { steps: [0; N_SLOTS], depth: 0, used: 0 };
        Self { stack: vec![root], n_free: n_free.min(N_SLOTS), budget }
    }
}

impl Iterator for Enumerator {
    type Item = Distribution;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(partial) = self.stack.pop() {
            if partial.depth == N_SLOTS {
                if self.budget == Budget::Exactly && partial.used != N_STEPS {
                    continue;
                }
                return Some(Distribution(partial.steps));
            }

            if partial.depth >= self.n_free {
                // The rest is pinned to zero, no need to branch any further:
                if self.budget == Budget::AtMost || partial.used == N_STEPS {
                    return Some(Distribution(partial.steps));
                }
                continue;
            }

            let remaining = N_STEPS - partial.used;
            // Pushing in ascending order makes the largest allocation pop first:
            for value in 0..=remaining {
                let mut child = partial;
                child.steps[partial.depth] = value;
                child.depth += 1;
                child.used += value;
                self.stack.push(child);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;

    #[test]
    fn enumerates_all_compositions() {
        // Weak compositions of at most 10 into 6 parts: C(16, 6).
        assert_eq!(Enumerator::new(N_SLOTS, Budget::AtMost).count(), 8008);
    }

    #[test]
    fn enumerates_exact_compositions() {
        // Weak compositions of exactly 10 into 6 parts: C(15, 5).
        assert_eq!(Enumerator::new(N_SLOTS, Budget::Exactly).count(), 3003);
    }

    #[test]
    fn every_distribution_is_valid() {
        for distribution in Enumerator::new(N_SLOTS, Budget::AtMost) {
            assert_eq!(distribution.len(), N_SLOTS);
            assert!(distribution.total_rate() <= 1.0 + 1e-9);
            for rate in distribution.rates() {
                assert!((0.0..=1.0).contains(&rate));
                assert_abs_diff_eq!(rate * 10.0, (rate * 10.0).round(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn no_duplicates() {
        let distributions = Enumerator::new(N_SLOTS, Budget::AtMost).collect_vec();
        assert_eq!(distributions.iter().unique().count(), distributions.len());
    }

    #[test]
    fn pinned_slots_stay_zero() {
        let distributions = Enumerator::new(2, Budget::AtMost).collect_vec();
        // Pairs summing up to at most 10: 11 + 10 + … + 1.
        assert_eq!(distributions.len(), 66);
        assert!(distributions.iter().all(|distribution| distribution.steps().skip(2).all(|step| step == 0)));
    }

    #[test]
    fn nothing_free_with_exact_budget() {
        assert_eq!(Enumerator::new(0, Budget::Exactly).count(), 0);
        assert_eq!(Enumerator::new(0, Budget::AtMost).collect_vec(), vec![Distribution::ZERO]);
    }

    #[test]
    fn largest_allocation_first() {
        let first = Enumerator::new(N_SLOTS, Budget::AtMost).next();
        assert_eq!(first, Some(Distribution::from_steps([10, 0, 0, 0, 0, 0])));
    }

    #[test]
    fn max_steps_ok() {
        assert_eq!(Distribution::from_steps([3, 3, 2, 2, 0, 0]).max_steps(), 3);
        assert_eq!(Distribution::ZERO.max_steps(), 0);
    }
}
