// src/analysis/result.rs
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

pub const AVG_FARE: &str = "avg_fare";
pub const TRIP_COUNT: &str = "trip_count";
pub const TOTAL_FARE: &str = "total_fare";

const HOUR_KEYS: [&str; 2] = ["pickup_hour", "hour_of_day"];
const STAT_KEYS: [&str; 3] = [AVG_FARE, TRIP_COUNT, TOTAL_FARE];

/// One aggregate row exactly as the service sent it. Key order is kept so
/// exports send back what was received.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    BestHours,
    BestZones,
}

impl Section {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Section::BestHours => "best_hours",
            Section::BestZones => "best_zones",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_analysis.csv", self.wire_name())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::BestHours => "⏰ Best Hours for Highest Fares",
            Section::BestZones => "📍 Top 20 Pickup Zones by Fare",
        }
    }
}

// Fields shared by hour and zone rows
pub trait FareStats {
    fn row(&self) -> &Row;

    fn avg_fare(&self) -> Option<&Value> {
        self.row().get(AVG_FARE)
    }

    fn trip_count(&self) -> Option<&Value> {
        self.row().get(TRIP_COUNT)
    }

    fn total_fare(&self) -> Option<&Value> {
        self.row().get(TOTAL_FARE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourStat(pub Row);

impl HourStat {
    /// Raw hour value, under whichever hour key the service used.
    pub fn hour(&self) -> Option<&Value> {
        HOUR_KEYS.iter().find_map(|key| self.0.get(*key))
    }

    pub fn hour_of_day(&self) -> Option<u8> {
        self.hour()
            .and_then(Value::as_u64)
            .filter(|h| *h < 24)
            .map(|h| h as u8)
    }
}

impl FareStats for HourStat {
    fn row(&self) -> &Row {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneStat(pub Row);

impl ZoneStat {
    pub fn zone(&self) -> Option<&Value> {
        zone_key(&self.0).and_then(|key| self.0.get(key))
    }
}

impl FareStats for ZoneStat {
    fn row(&self) -> &Row {
        &self.0
    }
}

/// The zone column name depends on the uploaded dataset (`PULocationID`,
/// `pickup_zone`, ...), so it is the first key that is not a fare statistic.
pub fn zone_key(row: &Row) -> Option<&str> {
    row.keys()
        .map(String::as_str)
        .find(|key| !STAT_KEYS.contains(key))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub best_hours: Vec<HourStat>,
    #[serde(default)]
    pub best_zones: Vec<ZoneStat>,
}

impl AnalysisResult {
    pub fn rows(&self, section: Section) -> Vec<Row> {
        match section {
            Section::BestHours => self.best_hours.iter().map(|h| h.0.clone()).collect(),
            Section::BestZones => self.best_zones.iter().map(|z| z.0.clone()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.best_hours.is_empty() && self.best_zones.is_empty()
    }
}
