use std::fmt::{Display, Formatter};

use comfy_table::Color;
use serde_with::SerializeDisplay;

use crate::quantity::energy::KilowattHours;

/// What the battery does during an hour.
#[derive(Copy, Clone, Debug, Eq, PartialEq, SerializeDisplay)]
pub enum WorkingMode {
    /// Do not do anything.
    Idle,

    /// Scheduled charging from the grid.
    Charge,

    /// Scheduled discharging into the grid.
    Discharge,

    /// Buy during a cheap hour ahead of an expensive period.
    ChargeFromGrid,

    /// Store the solar excess ahead of an expensive period.
    ChargeFromSolar,

    /// Cover the household load during an expensive hour.
    PeakDischarge,
}

impl Display for WorkingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Charge => write!(f, "Optimal Charging"),
            Self::Discharge => write!(f, "Optimal Discharging"),
            Self::ChargeFromGrid => write!(f, "Charging from grid"),
            Self::ChargeFromSolar => write!(f, "Charging from solar"),
            Self::PeakDischarge => write!(f, "Discharging"),
        }
    }
}

impl WorkingMode {
    pub const fn color(self) -> Color {
        match self {
            Self::Charge | Self::ChargeFromGrid => Color::Green,
            Self::ChargeFromSolar => Color::DarkYellow,
            Self::Discharge | Self::PeakDischarge => Color::Blue,
            Self::Idle => Color::Reset,
        }
    }
}

/// Grid flow that settles whatever the battery and the solar panels left over.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Remainder {
    Importing,
    Exporting,
}

impl Remainder {
    /// Negative balance is imported, positive is exported.
    pub fn of(balance: KilowattHours) -> Option<Self> {
        if balance < KilowattHours::ZERO {
            Some(Self::Importing)
        } else if balance > KilowattHours::ZERO {
            Some(Self::Exporting)
        } else {
            None
        }
    }
}

impl Display for Remainder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Importing => write!(f, "Importing"),
            Self::Exporting => write!(f, "Exporting"),
        }
    }
}

/// Battery mode together with the grid remainder, for example «Charging from solar and Exporting».
#[derive(Copy, Clone, Debug, Eq, PartialEq, SerializeDisplay)]
pub struct Decision {
    pub mode: WorkingMode,
    pub remainder: Option<Remainder>,
}

impl From<WorkingMode> for Decision {
    fn from(mode: WorkingMode) -> Self {
        Self { mode, remainder: None }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.mode, self.remainder) {
            (WorkingMode::Idle, Some(remainder)) => write!(f, "{remainder}"),
            (mode, Some(remainder)) => write!(f, "{mode} and {remainder}"),
            (mode, None) => write!(f, "{mode}"),
        }
    }
}
