use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    core::{
        classifier::ArbitrageThresholds,
        simulator::AnalyzedHour,
        summary::Summary,
        zone::Zone,
    },
    quantity::energy::KilowattHours,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// Hourly plan with the primary ledger.
#[must_use]
pub fn build_hourly_table(hours: &[AnalyzedHour], thresholds: &ArbitrageThresholds) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Hour",
        "Import rate",
        "Export rate",
        "Load",
        "Solar",
        "Mode",
        "Charge",
        "Discharge",
        "Level",
        "Grid import",
        "Grid export",
        "Net cost",
        "Reason",
    ]);
    for hour in hours {
        let conditions = &hour.conditions;
        let ledger = hour.ledgers.first().copied().unwrap_or_default();
        table.add_row(vec![
            Cell::new(format!("{:02}:00", conditions.hour)).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.2}", conditions.import_rate))
                .set_alignment(CellAlignment::Right)
                .fg(if conditions.import_rate <= thresholds.good_import_threshold {
                    Color::Green
                } else {
                    Color::Reset
                }),
            Cell::new(format!("{:.2}", conditions.export_rate))
                .set_alignment(CellAlignment::Right)
                .fg(if conditions.export_rate >= thresholds.good_export_threshold {
                    Color::Blue
                } else {
                    Color::Reset
                }),
            Cell::new(format!("{:.2}", conditions.load)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", conditions.solar_generation))
                .set_alignment(CellAlignment::Right),
            Cell::new(hour.decision).fg(hour.action.color()),
            Cell::new(format!("{:.2}", hour.battery_charge)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", hour.battery_discharge)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", hour.battery_level)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", ledger.grid_import)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", ledger.grid_export)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", ledger.net_cost())).set_alignment(CellAlignment::Right),
            Cell::new(hour.reason).fg(hour.reason.color()),
        ]);
    }
    table
}

/// Daily totals per battery configuration.
#[must_use]
pub fn build_ledgers_table(summary: &Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Configuration",
        "Grid import",
        "Grid export",
        "Import cost",
        "Export profit",
        "Net cost",
    ]);
    for (index, totals) in summary.ledgers.iter().enumerate() {
        table.add_row(vec![
            Cell::new(if index == 0 { "Primary".to_string() } else { format!("#{}", index + 1) }),
            Cell::new(totals.total_grid_import).set_alignment(CellAlignment::Right),
            Cell::new(totals.total_grid_export).set_alignment(CellAlignment::Right),
            Cell::new(totals.total_import_cost).set_alignment(CellAlignment::Right),
            Cell::new(totals.total_export_profit).set_alignment(CellAlignment::Right),
            Cell::new(totals.net_cost).set_alignment(CellAlignment::Right).fg(
                if totals.net_cost.0 > 0.0 { Color::Red } else { Color::Green },
            ),
        ]);
    }
    table
}

/// Day totals, arbitrage thresholds, and the detected zones.
#[must_use]
pub fn build_summary_table(summary: &Summary) -> Table {
    let arbitrage = &summary.arbitrage;
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_rows(vec![
        vec![Cell::new("Total load"), Cell::new(summary.total_load)],
        vec![Cell::new("Total solar generation"), Cell::new(summary.total_solar_generation)],
        vec![
            Cell::new("Final battery level"),
            Cell::new(format!("{:.2}", summary.final_battery_capacity)),
        ],
        vec![Cell::new("Mid price"), Cell::new(format!("{:.3}", arbitrage.mid_price))],
        vec![
            Cell::new("Arbitrage margin"),
            Cell::new(format!("{:.3}", arbitrage.arbitrage_margin)),
        ],
        vec![
            Cell::new("Good import threshold"),
            Cell::new(format!("{:.3}", arbitrage.good_import_threshold)).fg(Color::Green),
        ],
        vec![
            Cell::new("Good export threshold"),
            Cell::new(format!("{:.3}", arbitrage.good_export_threshold)).fg(Color::Blue),
        ],
        vec![
            Cell::new("Expensive import zones"),
            Cell::new(format_zones(summary.expensive_import_zones.as_slice().iter().map(span))),
        ],
        vec![
            Cell::new("Export price zones"),
            Cell::new(format_zones(summary.export_price_zones.as_slice().iter().map(span))),
        ],
        vec![
            Cell::new("Cheaper tariff zones"),
            Cell::new(format_zones(
                summary
                    .cheaper_tariff_zones
                    .as_slice()
                    .iter()
                    .map(|zone| format!("{} ({:?})", span(zone), zone.kind)),
            )),
        ],
    ]);
    table
}

/// Look-ahead energy needs for the hours that need anything.
#[must_use]
pub fn build_profile_table(summary: &Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hour", "Needed energy", "Reason"]);
    for entry in summary.needed_energy_profile.as_slice() {
        if entry.needed_energy > KilowattHours::ZERO {
            table.add_row(vec![
                Cell::new(format!("{:02}:00", entry.hour)).add_attribute(Attribute::Dim),
                Cell::new(entry.needed_energy).set_alignment(CellAlignment::Right),
                Cell::new(&entry.reason),
            ]);
        }
    }
    table
}

fn span<K>(zone: &Zone<K>) -> String {
    format!("{:02}:00–{:02}:59", zone.start, zone.end)
}

fn format_zones(mut zones: impl Iterator<Item = String>) -> String {
    let zones = zones.join(", ");
    if zones.is_empty() { "None".to_string() } else { zones }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_zones_ok() {
        let zones = [Zone { start: 6, end: 9, kind: () }, Zone { start: 17, end: 17, kind: () }];
        assert_eq!(format_zones(zones.iter().map(span)), "06:00–09:59, 17:00–17:59");
    }

    #[test]
    fn format_no_zones() {
        assert_eq!(format_zones(std::iter::empty()), "None");
    }
}
