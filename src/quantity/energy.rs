use std::ops::{Div, Mul};

use crate::quantity::{cost::Cost, rate::KilowattHourRate};

quantity!(KilowattHours, "kWh");

impl Mul<KilowattHourRate> for KilowattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourRate) -> Self::Output {
        Cost(self.0 * rhs.0)
    }
}

/// Ratio of two energies, for example the realized C-rate of a single hour.
impl Div<Self> for KilowattHours {
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}
