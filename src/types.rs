use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One raw CSV row as it appears in `day.csv`.
///
/// The file carries more columns than we use (instant, mnth, holiday,
/// weekday, temp, atemp, hum, windspeed); serde ignores them. The coded
/// categorical fields stay `Option<i64>` so an empty cell simply decodes to
/// a missing label instead of failing the whole load.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub dteday: String,
    pub season: Option<i64>,
    pub weathersit: Option<i64>,
    pub yr: Option<i64>,
    pub workingday: Option<i64>,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

/// One decoded daily record. `None` in a label field means the source row
/// carried a code outside the lookup table (or no code at all); that row
/// still participates in every aggregate, grouped under its own bucket.
#[derive(Debug, Clone)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub season: Option<&'static str>,
    pub weather: Option<&'static str>,
    pub year_label: Option<&'static str>,
    pub working_day: Option<&'static str>,
    pub casual: u32,
    pub registered: u32,
    pub total: u32,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyTotalRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "TotalRentals")]
    #[tabled(rename = "TotalRentals")]
    pub total_rentals: u64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CategoryAverageRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Days")]
    #[tabled(rename = "Days")]
    pub days: usize,
    #[serde(rename = "AvgRentals")]
    #[tabled(rename = "AvgRentals", display_with = "crate::util::display_mean")]
    pub mean_total: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TierCountRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "DemandTier")]
    #[tabled(rename = "DemandTier")]
    pub tier: &'static str,
    #[serde(rename = "Days")]
    #[tabled(rename = "Days")]
    pub days: usize,
}

/// Which binning policy produced the demand tiers for the current window.
///
/// `Quantile` is the normal case (1/3 and 2/3 sample quantiles of the
/// window's totals). `EqualWidth` fires only when the window has fewer than
/// three distinct totals, where equal-count cuts are ill-defined.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum TierBinning {
    Quantile { lower: f64, upper: f64 },
    EqualWidth { lower: f64, upper: f64 },
}

/// The three header metrics of the dashboard, computed over the window.
#[derive(Debug, Serialize, Clone)]
pub struct WindowMetrics {
    pub total_rentals: u64,
    pub daily_mean: f64,
    pub peak_day: u32,
}

/// Casual vs. registered rental totals over the window.
#[derive(Debug, Serialize, Clone)]
pub struct UserTypeTotals {
    pub casual: u64,
    pub registered: u64,
}

/// Everything one viewer interaction renders, computed in a single pass by
/// `pipeline::compute`. Purely derived, discarded after rendering.
#[derive(Debug, Serialize, Clone)]
pub struct ViewModel {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: usize,
    pub metrics: WindowMetrics,
    pub monthly: Vec<MonthlyTotalRow>,
    pub season_avg: Vec<CategoryAverageRow>,
    pub weather_avg: Vec<CategoryAverageRow>,
    pub working_day_avg: Vec<CategoryAverageRow>,
    pub tier_binning: TierBinning,
    pub season_tiers: Vec<TierCountRow>,
    pub working_day_tiers: Vec<TierCountRow>,
    pub weather_tiers: Vec<TierCountRow>,
    pub user_totals: UserTypeTotals,
}
