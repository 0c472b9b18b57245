use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::quantity::rate::KilowattHourRate;

/// Synthetic tariff shapes the scenario generator can draw prices from.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum PricingStructure {
    /// Cheap nights, morning and evening peaks, export slightly above import during peaks.
    #[default]
    #[value(name = "normal")]
    Normal,

    /// Flat two-band import tariff without any feed-in compensation.
    #[value(name = "simpleCheaper")]
    SimpleCheaper,

    /// Very cheap nights and middays, export compensated at a fraction of import.
    #[value(name = "variableCheapRatesLowExport")]
    VariableCheapRatesLowExport,

    /// Like [`PricingStructure::Normal`], but nights go below zero for both directions.
    #[value(name = "negativeImportAndExportPrice")]
    NegativeImportAndExportPrice,

    /// Practically constant price all day long.
    #[value(name = "stablePrice")]
    StablePrice,
}

/// Time-of-day band of an import tariff.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Band {
    Night,
    MorningPeak,
    Day,
    EveningPeak,
    LateEvening,
}

impl Band {
    const fn of(hour: usize) -> Self {
        match hour {
            0..6 => Self::Night,
            6..9 => Self::MorningPeak,
            9..17 => Self::Day,
            17..22 => Self::EveningPeak,
            _ => Self::LateEvening,
        }
    }
}

/// Base rate and the maximum random surcharge on top of it.
#[derive(Copy, Clone)]
struct Jittered {
    base: f64,
    spread: f64,
}

impl Jittered {
    const fn new(base: f64, spread: f64) -> Self {
        Self { base, spread }
    }

    fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        self.base + rng.r#gen::<f64>() * self.spread
    }
}

impl PricingStructure {
    /// Draw the import and export rates for the hour, unrounded.
    pub fn draw_rates<R: Rng + ?Sized>(
        self,
        hour: usize,
        rng: &mut R,
    ) -> (KilowattHourRate, KilowattHourRate) {
        let band = Band::of(hour);
        let (import_rate, export_rate) = match self {
            Self::Normal => {
                let import_rate = Self::normal_import(band).draw(rng);
                (import_rate, import_rate * Self::normal_export_multiplier(hour).draw(rng))
            }
            Self::SimpleCheaper => (if hour < 4 { 0.05 } else { 0.15 }, 0.0),
            Self::VariableCheapRatesLowExport => {
                let import_rate = match band {
                    Band::Night => Jittered::new(0.03, 0.04),
                    Band::MorningPeak => Jittered::new(0.18, 0.05),
                    Band::Day => Jittered::new(0.08, 0.06),
                    Band::EveningPeak => Jittered::new(0.25, 0.05),
                    Band::LateEvening => Jittered::new(0.10, 0.03),
                }
                .draw(rng);
                (import_rate, import_rate * Jittered::new(0.3, 0.1).draw(rng))
            }
            Self::NegativeImportAndExportPrice => {
                let import_rate = match band {
                    Band::Night => Jittered::new(-0.05, 0.03),
                    _ => Self::normal_import(band),
                }
                .draw(rng);
                (import_rate, import_rate * Self::normal_export_multiplier(hour).draw(rng))
            }
            Self::StablePrice => {
                let import_rate = Jittered::new(0.12, 0.01).draw(rng);
                (import_rate, import_rate * 0.8)
            }
        };
        (KilowattHourRate(import_rate), KilowattHourRate(export_rate))
    }

    const fn normal_import(band: Band) -> Jittered {
        match band {
            Band::Night => Jittered::new(0.05, 0.05),
            Band::MorningPeak => Jittered::new(0.15, 0.05),
            Band::Day => Jittered::new(0.10, 0.05),
            Band::EveningPeak => Jittered::new(0.20, 0.05),
            Band::LateEvening => Jittered::new(0.08, 0.05),
        }
    }

    /// Export-to-import ratio: feed-in pays more during the peaks and around noon.
    const fn normal_export_multiplier(hour: usize) -> Jittered {
        match hour {
            17..=21 => Jittered::new(1.1, 0.1),
            6..=9 => Jittered::new(1.2, 0.1),
            10..=15 => Jittered::new(0.9, 0.1),
            _ => Jittered::new(0.7, 0.1),
        }
    }
}
