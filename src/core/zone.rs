//! Contiguous runs of hours satisfying a price predicate.

use serde::Serialize;

use crate::{core::conditions::Conditions, quantity::rate::KilowattHourRate};

/// Maximal run of consecutive hours, `start..=end`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(bound(serialize = "K: Serialize + Tag"))]
pub struct Zone<K = ()> {
    pub start: usize,
    pub end: usize,

    #[serde(rename = "type", skip_serializing_if = "Tag::is_untagged")]
    pub kind: K,
}

impl<K> Zone<K> {
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// Zone classification of the cheaper-tariff scan.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Import,
    Export,
}

pub trait Tag {
    fn is_untagged(&self) -> bool;
}

impl Tag for () {
    fn is_untagged(&self) -> bool {
        true
    }
}

impl Tag for ZoneKind {
    fn is_untagged(&self) -> bool {
        false
    }
}

/// Split the series into zones of equally classified points.
///
/// Unclassified points close the current zone. A change of the classification closes
/// the current zone and immediately opens a new one, so the zones never mix kinds.
pub fn scan_by<T, K, F>(series: &[T], mut classify: F) -> Vec<Zone<K>>
where
    K: Copy + PartialEq,
    F: FnMut(&T) -> Option<K>,
{
    let mut zones = Vec::new();
    let mut current: Option<Zone<K>> = None;

    for (index, point) in series.iter().enumerate() {
        match classify(point) {
            Some(kind) => match current.as_mut() {
                Some(zone) if zone.kind == kind => zone.end = index,
                _ => zones.extend(current.replace(Zone { start: index, end: index, kind })),
            },
            None => zones.extend(current.take()),
        }
    }

    zones.extend(current);
    zones
}

pub fn scan<T>(series: &[T], mut predicate: impl FnMut(&T) -> bool) -> Vec<Zone> {
    scan_by(series, |point| predicate(point).then_some(()))
}

pub fn expensive_import_zones(series: &[Conditions], threshold: KilowattHourRate) -> Vec<Zone> {
    scan(series, |conditions| conditions.import_rate >= threshold)
}

pub fn cheap_import_zones(series: &[Conditions], threshold: KilowattHourRate) -> Vec<Zone> {
    scan(series, |conditions| conditions.import_rate < threshold)
}

pub fn export_price_zones(series: &[Conditions], threshold: KilowattHourRate) -> Vec<Zone> {
    scan(series, |conditions| conditions.export_rate >= threshold)
}

/// Hours where importing is cheap or exporting pays well, import taking precedence.
pub fn cheaper_tariff_zones(
    series: &[Conditions],
    import_threshold: KilowattHourRate,
    export_threshold: KilowattHourRate,
) -> Vec<Zone<ZoneKind>> {
    scan_by(series, |conditions| {
        if conditions.import_rate < import_threshold {
            Some(ZoneKind::Import)
        } else if conditions.export_rate > export_threshold {
            Some(ZoneKind::Export)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conditions::tests::day_from_rates;

    const fn zone(start: usize, end: usize) -> Zone {
        Zone { start, end, kind: () }
    }

    #[test]
    fn cheap_import_zones_are_strict() {
        let series = day_from_rates(&[0.05, 0.1, 0.05, 0.04, 0.2], &[0.0; 5]);
        let zones = cheap_import_zones(&series, KilowattHourRate(0.1));
        assert_eq!(zones, vec![zone(0, 0), zone(2, 3)]);
        assert!(zones[1].contains(3));
        assert!(!zones[1].contains(4));
    }

    #[test]
    fn scan_empty() {
        assert!(scan::<bool>(&[], |value| *value).is_empty());
    }

    #[test]
    fn scan_flushes_trailing_zone() {
        let mask = [false, true, true, false, true];
        assert_eq!(scan(&mask, |value| *value), vec![zone(1, 2), zone(4, 4)]);
    }

    #[test]
    fn scan_whole_series() {
        assert_eq!(scan(&[true; 24], |value| *value), vec![zone(0, 23)]);
    }

    #[test]
    fn scan_is_idempotent_on_own_mask() {
        let mask = [true, false, false, true, true, true, false, true, false, false, true, true];
        let zones = scan(&mask, |value| *value);

        for pair in zones.windows(2) {
            assert!(pair[0].end < pair[1].start, "zones must be sorted and disjoint");
        }

        let derived: Vec<bool> =
            (0..mask.len()).map(|index| zones.iter().any(|zone| (zone.start..=zone.end).contains(&index))).collect();
        assert_eq!(derived, mask);
        assert_eq!(scan(&derived, |value| *value), zones);
    }

    #[test]
    fn expensive_import_threshold_is_inclusive() {
        let series = day_from_rates(&[0.1, 0.2, 0.3, 0.2, 0.1], &[0.0; 5]);
        assert_eq!(expensive_import_zones(&series, KilowattHourRate(0.2)), vec![zone(1, 3)]);
    }

    #[test]
    fn export_price_zones_ok() {
        let series = day_from_rates(&[0.1; 6], &[0.3, 0.3, 0.0, 0.0, 0.3, 0.1]);
        assert_eq!(export_price_zones(&series, KilowattHourRate(0.3)), vec![zone(0, 1), zone(4, 4)]);
    }

    #[test]
    fn cheaper_tariff_zones_split_on_kind_change() {
        let series = day_from_rates(&[0.05, 0.05, 0.2, 0.2, 0.2, 0.05], &[0.0, 0.0, 0.5, 0.5, 0.0, 0.0]);
        let zones = cheaper_tariff_zones(&series, KilowattHourRate(0.1), KilowattHourRate(0.4));
        assert_eq!(
            zones,
            vec![
                Zone { start: 0, end: 1, kind: ZoneKind::Import },
                Zone { start: 2, end: 3, kind: ZoneKind::Export },
                Zone { start: 5, end: 5, kind: ZoneKind::Import },
            ],
        );
    }

    #[test]
    fn import_takes_precedence_over_export() {
        let series = day_from_rates(&[0.05], &[0.5]);
        let zones = cheaper_tariff_zones(&series, KilowattHourRate(0.1), KilowattHourRate(0.4));
        assert_eq!(zones, vec![Zone { start: 0, end: 0, kind: ZoneKind::Import }]);
    }

    #[test]
    fn serialization() {
        assert_eq!(serde_json::to_string(&zone(1, 2)).unwrap(), r#"{"start":1,"end":2}"#);
        assert_eq!(
            serde_json::to_string(&Zone { start: 3, end: 4, kind: ZoneKind::Export }).unwrap(),
            r#"{"start":3,"end":4,"type":"export"}"#,
        );
    }
}
