use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_with::SerializeDisplay;

use crate::{
    core::{conditions::Conditions, zone::Zone},
    quantity::energy::KilowattHours,
};

/// How far ahead the profile looks for an upcoming expensive zone or demand.
pub const LOOK_AHEAD_HOURS: usize = 6;

/// Energy the battery should hold at the given hour to cover what comes next.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyProfileEntry {
    pub hour: usize,
    pub needed_energy: KilowattHours,
    pub reason: NeedReason,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, SerializeDisplay)]
pub enum NeedReason {
    ExpensiveImportZone(Zone),
    UpcomingDemand,
    Nothing,
}

impl Display for NeedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpensiveImportZone(zone) => {
                write!(f, "Preparing for expensive import zone ({}-{})", zone.start, zone.end)
            }
            Self::UpcomingDemand => write!(f, "Preparing for upcoming high demand"),
            Self::Nothing => Ok(()),
        }
    }
}

/// Build the look-ahead profile, one entry per hour.
///
/// An expensive zone starting within the look-ahead window wins: the whole zone deficit
/// is needed. Otherwise, the deficit of the next `look_ahead` hours is.
pub fn needed_energy_profile(
    series: &[Conditions],
    expensive_zones: &[Zone],
    look_ahead: usize,
) -> Vec<EnergyProfileEntry> {
    series
        .iter()
        .enumerate()
        .map(|(index, conditions)| {
            let upcoming_zone = expensive_zones
                .iter()
                .find(|zone| zone.start > index && zone.start <= index + look_ahead);
            let (needed_energy, reason) = if let Some(zone) = upcoming_zone {
                let span = series.get(zone.start..=zone.end).unwrap_or_default();
                (total_deficit(span), NeedReason::ExpensiveImportZone(*zone))
            } else {
                let upcoming = series.iter().skip(index + 1).take(look_ahead);
                let demand: KilowattHours = upcoming.map(Conditions::deficit).sum();
                if demand > KilowattHours::ZERO {
                    (demand, NeedReason::UpcomingDemand)
                } else {
                    (KilowattHours::ZERO, NeedReason::Nothing)
                }
            };
            EnergyProfileEntry {
                hour: conditions.hour,
                needed_energy: needed_energy.round_to_hundredths(),
                reason,
            }
        })
        .collect()
}

fn total_deficit(span: &[Conditions]) -> KilowattHours {
    span.iter().map(Conditions::deficit).sum()
}
