// src/render/mod.rs
use serde_json::Value;
use tracing::warn;

use crate::analysis::{AnalysisResult, FareStats, HourStat, Section, ZoneStat};

pub mod format;

use format::{format_count, format_fare, format_hour, format_plain};

/// Rows at these positions are marked as top performers
pub const HIGHLIGHT_ROWS: usize = 3;
pub const UNKNOWN_ZONE: &str = "unknown";

const TIP: &str = "Focus on highlighted rows (top 3) for maximum profitability";

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub cells: Vec<String>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub section: Section,
    pub headers: [&'static str; 4],
    pub rows: Vec<RowView>,
}

impl TableView {
    pub fn title(&self) -> &'static str {
        self.section.title()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub label: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub tables: Vec<TableView>,
    pub insights: Vec<Insight>,
    /// (hour, average fare) points for the hourly chart
    pub hourly_fares: Vec<(f64, f64)>,
}

impl ResultsView {
    pub fn project(result: &AnalysisResult) -> Self {
        let mut tables = Vec::new();
        if !result.best_hours.is_empty() {
            tables.push(hours_table(&result.best_hours));
        }
        if !result.best_zones.is_empty() {
            tables.push(zones_table(&result.best_zones));
        }

        Self {
            tables,
            insights: insights(result),
            hourly_fares: hourly_fares(&result.best_hours),
        }
    }

    pub fn table(&self, section: Section) -> Option<&TableView> {
        self.tables.iter().find(|t| t.section == section)
    }
}

fn hours_table(hours: &[HourStat]) -> TableView {
    TableView {
        section: Section::BestHours,
        headers: ["Hour of Day", "Average Fare ($)", "Trip Count", "Total Fare ($)"],
        rows: hours
            .iter()
            .enumerate()
            .map(|(idx, hour)| RowView {
                cells: vec![
                    format_hour(hour.hour()),
                    format_fare(hour.avg_fare()),
                    format_count(hour.trip_count()),
                    format_fare(hour.total_fare()),
                ],
                highlighted: idx < HIGHLIGHT_ROWS,
            })
            .collect(),
    }
}

fn zones_table(zones: &[ZoneStat]) -> TableView {
    TableView {
        section: Section::BestZones,
        headers: ["Zone ID", "Average Fare ($)", "Trip Count", "Total Fare ($)"],
        rows: zones
            .iter()
            .enumerate()
            .map(|(idx, zone)| RowView {
                cells: vec![
                    zone_cell(idx, zone),
                    format_fare(zone.avg_fare()),
                    format_count(zone.trip_count()),
                    format_fare(zone.total_fare()),
                ],
                highlighted: idx < HIGHLIGHT_ROWS,
            })
            .collect(),
    }
}

fn zone_cell(idx: usize, zone: &ZoneStat) -> String {
    match zone.zone() {
        Some(value) => format_plain(Some(value)),
        None => {
            warn!(row = idx, "zone row has no identifier column");
            UNKNOWN_ZONE.to_string()
        }
    }
}

fn insights(result: &AnalysisResult) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(top) = result.best_hours.first() {
        insights.push(Insight {
            label: "Peak Hour",
            text: format!(
                "Hour {} shows the highest average fare of {}",
                format_plain(top.hour()),
                format_fare(top.avg_fare())
            ),
        });
    }

    if let Some(top) = result.best_zones.first() {
        insights.push(Insight {
            label: "Top Zone",
            text: format!(
                "The most profitable pickup zone generates an average fare of {}",
                format_fare(top.avg_fare())
            ),
        });
    }

    insights.push(Insight {
        label: "Tip",
        text: TIP.to_string(),
    });
    insights
}

fn hourly_fares(hours: &[HourStat]) -> Vec<(f64, f64)> {
    hours
        .iter()
        .filter_map(|h| {
            let hour = h.hour_of_day()?;
            let fare = h.avg_fare().and_then(Value::as_f64)?;
            Some((hour as f64, fare))
        })
        .collect()
}
