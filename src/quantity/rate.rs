quantity!(KilowattHourRate, "€/kWh");

impl KilowattHourRate {
    /// Arithmetic mean, zero for no rates.
    pub fn mean(rates: impl ExactSizeIterator<Item = Self>) -> Self {
        let n_rates = rates.len();
        if n_rates == 0 {
            return Self::ZERO;
        }
        #[expect(clippy::cast_precision_loss)]
        let n_rates = n_rates as f64;
        rates.sum::<Self>() / n_rates
    }
}
