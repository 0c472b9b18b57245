use std::collections::BTreeMap;

use crate::core::optimizer::Optimum;

/// Scheduled charging or discharging rate per hour.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleMap(BTreeMap<usize, f64>);

impl ScheduleMap {
    /// Assign every non-zero rate to the hour at the matching ranked position.
    pub fn from_optimum(optimum: &Optimum) -> Self {
        optimum
            .distribution
            .rates()
            .zip(optimum.window.slots())
            .filter(|(rate, _)| *rate > 0.0)
            .filter_map(|(rate, slot)| slot.map(|conditions| (conditions.hour, rate)))
            .collect()
    }

    /// Merge the window maps, earlier windows take priority for the same hour.
    pub fn merge(maps: impl IntoIterator<Item = Self>) -> Self {
        let mut merged = BTreeMap::new();
        for map in maps {
            for (hour, rate) in map.0 {
                merged.entry(hour).or_insert(rate);
            }
        }
        Self(merged)
    }

    pub fn rate(&self, hour: usize) -> Option<f64> {
        self.0.get(&hour).copied()
    }
}

impl FromIterator<(usize, f64)> for ScheduleMap {
    fn from_iter<T: IntoIterator<Item = (usize, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::{
            conditions::tests::day_from_rates,
            distribution::Distribution,
            optimizer::{Direction, RankedWindow},
        },
        quantity::cost::Cost,
    };

    fn optimum(import_rates: &[f64], first_hour: usize, steps: [u8; 6]) -> Optimum {
        let mut series = day_from_rates(import_rates, &vec![0.0; import_rates.len()]);
        for (offset, conditions) in series.iter_mut().enumerate() {
            conditions.hour = first_hour + offset;
        }
        Optimum {
            window: RankedWindow::rank(&series, Direction::Charge),
            distribution: Distribution::from_steps(steps),
            value: Cost::ZERO,
        }
    }

    #[test]
    fn maps_ranked_positions_to_hours() {
        // Ranked as hours 11, 10, 12:
        let map = ScheduleMap::from_optimum(&optimum(&[0.2, 0.1, 0.3], 10, [6, 4, 0, 0, 0, 0]));
        assert_abs_diff_eq!(map.rate(11).unwrap(), 0.6);
        assert_abs_diff_eq!(map.rate(10).unwrap(), 0.4);
        assert_eq!(map.rate(12), None);
    }

    #[test]
    fn padding_is_never_scheduled() {
        let map = ScheduleMap::from_optimum(&optimum(&[0.1], 0, [5, 5, 0, 0, 0, 0]));
        assert_eq!(map, ScheduleMap::from_iter([(0, 0.5)]));
    }

    #[test]
    fn first_window_wins() {
        let first = ScheduleMap(BTreeMap::from([(1, 0.3), (2, 0.7)]));
        let second = ScheduleMap(BTreeMap::from([(2, 0.1), (5, 0.9)]));
        let merged = ScheduleMap::merge([first, second]);
        assert_eq!(merged.rate(2), Some(0.7));
        assert_eq!(merged.rate(5), Some(0.9));
        assert_eq!(merged.rate(1), Some(0.3));
    }
}
