use std::fmt::{Display, Formatter};

use comfy_table::Color;
use serde_with::SerializeDisplay;

use crate::quantity::energy::KilowattHours;

/// Classification of an hour.
///
/// Variants are ordered by precedence: the arbitrage labels override whatever the
/// simulator said, and a good export overrides a good import.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, SerializeDisplay)]
pub enum Reason {
    NoAction,
    EnergyDeficit,
    ExcessEnergy,
    ScheduledCharging,
    ScheduledDischarging,
    PeakHour,
    PreparingForExpensivePeriod,
    GoodImport,
    GoodExport,
}

impl Reason {
    /// Base reason of an hour without any battery activity.
    pub fn of_balance(balance: KilowattHours) -> Self {
        if balance < KilowattHours::ZERO {
            Self::EnergyDeficit
        } else if balance > KilowattHours::ZERO {
            Self::ExcessEnergy
        } else {
            Self::NoAction
        }
    }

    #[must_use]
    pub fn overridden_by(self, other: Self) -> Self {
        self.max(other)
    }

    pub const fn color(self) -> Color {
        match self {
            Self::GoodImport => Color::Green,
            Self::GoodExport => Color::Blue,
            Self::EnergyDeficit => Color::Red,
            Self::ExcessEnergy => Color::DarkYellow,
            Self::NoAction
            | Self::ScheduledCharging
            | Self::ScheduledDischarging
            | Self::PeakHour
            | Self::PreparingForExpensivePeriod => Color::Reset,
        }
    }
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAction => write!(f, "No action needed"),
            Self::EnergyDeficit => write!(f, "Energy deficit"),
            Self::ExcessEnergy => write!(f, "Excess energy"),
            Self::ScheduledCharging => write!(f, "Scheduled charging"),
            Self::ScheduledDischarging => write!(f, "Scheduled discharging"),
            Self::PeakHour => write!(f, "Peak hour, high import price"),
            Self::PreparingForExpensivePeriod => write!(f, "Preparing for upcoming expensive period"),
            Self::GoodImport => write!(f, "Good Import"),
            Self::GoodExport => write!(f, "Good Export"),
        }
    }
}
