use bon::Builder;
use itertools::Itertools;

use crate::{
    core::{
        conditions::Conditions,
        distribution::{Budget, Distribution, Enumerator, N_SLOTS},
        efficiency::EfficiencyCurve,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Objective differences below this count as ties.
const TIE_TOLERANCE: f64 = 1e-9;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Minimize the cost of filling the battery from the grid.
    Charge,

    /// Maximize the profit of feeding the battery energy into the grid.
    Discharge,
}

/// Hours of a scheduling window ranked by price priority and padded to [`N_SLOTS`].
#[derive(Clone, Debug)]
pub struct RankedWindow {
    slots: Vec<Option<Conditions>>,
}

impl RankedWindow {
    /// Cheapest import first for charging, best export first for discharging.
    /// Equal prices keep the earlier hour first.
    pub fn rank(hours: &[Conditions], direction: Direction) -> Self {
        if hours.len() > N_SLOTS {
            warn!(n_hours = hours.len(), n_slots = N_SLOTS, "the window is too long, truncating");
        }
        let mut slots = hours
            .iter()
            .copied()
            .sorted_by(|lhs, rhs| {
                match direction {
                    Direction::Charge => lhs.import_rate.cmp(&rhs.import_rate),
                    Direction::Discharge => rhs.export_rate.cmp(&lhs.export_rate),
                }
                .then(lhs.hour.cmp(&rhs.hour))
            })
            .take(N_SLOTS)
            .map(Some)
            .collect_vec();
        slots.resize(N_SLOTS, None);
        Self { slots }
    }

    /// Number of real hours, the rest is padding.
    pub fn n_hours(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn slots(&self) -> &[Option<Conditions>] {
        &self.slots
    }
}

/// Winning distribution of a single scheduling window.
#[derive(Clone, Debug)]
pub struct Optimum {
    pub window: RankedWindow,
    pub distribution: Distribution,

    /// Charging cost or discharging profit of the distribution.
    pub value: Cost,
}

/// Brute-force search for the best split of the battery capacity over a window.
#[derive(Builder)]
pub struct Optimizer {
    direction: Direction,
    capacity: KilowattHours,
    efficiency: EfficiencyCurve,
}

impl Optimizer {
    #[instrument(skip_all, fields(direction = ?self.direction, first_hour = hours.first().map(|conditions| conditions.hour)))]
    pub fn optimize(&self, hours: &[Conditions]) -> Optimum {
        let window = RankedWindow::rank(hours, self.direction);
        let budget = match self.direction {
            // Charging nothing always costs nothing, so the battery has to be filled up:
            Direction::Charge => Budget::Exactly,
            Direction::Discharge => Budget::AtMost,
        };

        let mut best: Option<(Distribution, Cost)> = None;
        let mut n_candidates = 0_usize;
        for distribution in Enumerator::new(window.n_hours(), budget) {
            n_candidates += 1;
            let candidate = (distribution, self.evaluate(&distribution, &window));
            if best.is_none_or(|incumbent| self.is_better(candidate, incumbent)) {
                best = Some(candidate);
            }
        }

        let (distribution, value) = best.unwrap_or((Distribution::ZERO, Cost::ZERO));
        debug!(
            n_candidates,
            ?distribution,
            total_rate = distribution.total_rate(),
            value = %value,
            "optimized"
        );
        Optimum { window, distribution, value }
    }

    /// Charging cost or discharging profit of the distribution over the ranked window.
    ///
    /// Padding slots never contribute.
    pub fn evaluate(&self, distribution: &Distribution, window: &RankedWindow) -> Cost {
        if distribution.len() != window.slots.len() {
            warn!(
                distribution_len = distribution.len(),
                window_len = window.slots.len(),
                "length mismatch, counting as zero"
            );
            return Cost::ZERO;
        }
        distribution
            .rates()
            .zip(&window.slots)
            .filter_map(|(rate, slot)| slot.filter(|_| rate > 0.0).map(|conditions| (rate, conditions)))
            .map(|(rate, conditions)| {
                let energy = self.capacity * rate;
                let efficiency = self.efficiency.at(rate);
                match self.direction {
                    Direction::Charge => energy / efficiency * conditions.import_rate,
                    Direction::Discharge => energy * efficiency * conditions.export_rate,
                }
            })
            .sum()
    }

    /// Better objective first, then the more balanced allocation.
    fn is_better(&self, candidate: (Distribution, Cost), incumbent: (Distribution, Cost)) -> bool {
        let gain = match self.direction {
            Direction::Charge => incumbent.1 - candidate.1,
            Direction::Discharge => candidate.1 - incumbent.1,
        };
        if gain.0 > TIE_TOLERANCE {
            true
        } else if gain.0 < -TIE_TOLERANCE {
            false
        } else {
            candidate.0.max_steps() < incumbent.0.max_steps()
        }
    }
}
