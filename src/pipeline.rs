//! The data preparation and aggregation pipeline behind the dashboard.
//!
//! Every viewer interaction maps to one call of [`compute`]: a pure function
//! from an inclusive date range to the full set of derived views. Nothing is
//! cached between calls; the loaded dataset is immutable and each run starts
//! from scratch over it.

use crate::types::{
    CategoryAverageRow, DailyRecord, MonthlyTotalRow, TierBinning, TierCountRow, UserTypeTotals,
    ViewModel, WindowMetrics,
};
use crate::util::{mean, quantile};
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Demand tier labels, low to high. Indexes match the tier assignment
/// produced by [`demand_tiers`].
pub const TIER_LABELS: [&str; 3] = ["Low Demand", "Medium Demand", "High Demand"];

/// Bucket name for records whose category code had no lookup entry.
pub const UNMAPPED_BUCKET: &str = "(unmapped)";

#[derive(Error, Debug, PartialEq)]
pub enum PipelineError {
    /// The date filter selected zero records. Recoverable: the caller shows
    /// a warning and waits for a new range; no partial views are computed.
    #[error("no records between {start} and {end}")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },
}

/// The three categorical dimensions every grouped view can slice by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDim {
    Season,
    Weather,
    WorkingDay,
}

impl CategoryDim {
    pub fn label(self, record: &DailyRecord) -> Option<&'static str> {
        match self {
            CategoryDim::Season => record.season,
            CategoryDim::Weather => record.weather,
            CategoryDim::WorkingDay => record.working_day,
        }
    }

    /// Fixed presentation order for the demand-tier grids.
    pub fn canonical_order(self) -> &'static [&'static str] {
        match self {
            CategoryDim::Season => &["Spring", "Summer", "Fall", "Winter"],
            CategoryDim::Weather => &["Clear", "Mist", "Light Snow/Rain", "Heavy Rain/Snow/Fog"],
            CategoryDim::WorkingDay => &["Holiday", "Working Day"],
        }
    }
}

/// Select the records with `start <= date <= end`.
///
/// A reversed range or a range that misses every record both surface as
/// `EmptyWindow`; the pipeline never computes partial views over nothing.
pub fn filter_window<'a>(
    data: &'a [DailyRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<&'a DailyRecord>, PipelineError> {
    let window: Vec<&DailyRecord> = data
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .collect();
    if window.is_empty() {
        return Err(PipelineError::EmptyWindow { start, end });
    }
    Ok(window)
}

/// Sum total rentals per calendar month, chronologically ascending.
/// Months without records in the window are omitted, not zero-filled.
pub fn monthly_totals(window: &[&DailyRecord]) -> Vec<MonthlyTotalRow> {
    let mut by_month: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for r in window {
        *by_month.entry((r.date.year(), r.date.month())).or_insert(0) += u64::from(r.total);
    }
    by_month
        .into_iter()
        .map(|((year, month), total_rentals)| MonthlyTotalRow {
            month: format!("{:04}-{:02}", year, month),
            total_rentals,
        })
        .collect()
}

/// Mean total rentals per category value, sorted descending by mean.
///
/// Groups accumulate in first-appearance order and the sort is stable, so
/// equal means keep discovery order. Records with an unmapped code form
/// their own bucket rather than being dropped.
pub fn category_average(window: &[&DailyRecord], dim: CategoryDim) -> Vec<CategoryAverageRow> {
    struct Acc {
        label: Option<&'static str>,
        sum: u64,
        days: usize,
    }
    let mut order: Vec<Acc> = Vec::new();
    let mut index: HashMap<Option<&'static str>, usize> = HashMap::new();
    for r in window {
        let label = dim.label(r);
        let idx = *index.entry(label).or_insert_with(|| {
            order.push(Acc {
                label,
                sum: 0,
                days: 0,
            });
            order.len() - 1
        });
        order[idx].sum += u64::from(r.total);
        order[idx].days += 1;
    }

    let mut rows: Vec<CategoryAverageRow> = order
        .into_iter()
        .map(|acc| CategoryAverageRow {
            category: acc.label.unwrap_or(UNMAPPED_BUCKET).to_string(),
            days: acc.days,
            mean_total: acc.sum as f64 / acc.days as f64,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.mean_total
            .partial_cmp(&a.mean_total)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Assign every record in the window to one of three demand tiers.
///
/// Normal case: equal-count binning at the 1/3 and 2/3 sample quantiles of
/// `total`, recomputed for every window. With fewer than three distinct
/// totals equal-count cuts are ill-defined, so the classification falls back
/// to equal-width bins over `[min, max]` and says so through the returned
/// `TierBinning`. With a single distinct value the width collapses to zero
/// and every day lands in the low tier.
///
/// Returns one tier index (0 = low, 2 = high) per window record, in window
/// order, plus the binning marker.
pub fn demand_tiers(window: &[&DailyRecord]) -> (Vec<usize>, TierBinning) {
    let totals: Vec<f64> = window.iter().map(|r| f64::from(r.total)).collect();
    let mut distinct: Vec<u32> = window.iter().map(|r| r.total).collect();
    distinct.sort_unstable();
    distinct.dedup();

    let (lower, upper, binning) = if distinct.len() >= 3 {
        let mut sorted = totals.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let lower = quantile(&sorted, 1.0 / 3.0);
        let upper = quantile(&sorted, 2.0 / 3.0);
        (lower, upper, TierBinning::Quantile { lower, upper })
    } else {
        let lo = distinct.first().copied().unwrap_or(0) as f64;
        let hi = distinct.last().copied().unwrap_or(0) as f64;
        let width = (hi - lo) / 3.0;
        let lower = lo + width;
        let upper = lo + 2.0 * width;
        log::warn!(
            "window has {} distinct totals, using equal-width tier bins over [{}, {}]",
            distinct.len(),
            lo,
            hi
        );
        (lower, upper, TierBinning::EqualWidth { lower, upper })
    };

    let tiers = totals
        .iter()
        .map(|&v| {
            if v <= lower {
                0
            } else if v <= upper {
                1
            } else {
                2
            }
        })
        .collect();
    (tiers, binning)
}

/// Cross-tabulate tier assignments against one category dimension.
///
/// Emits the complete (category value x tier) grid in canonical category
/// order with low-to-high tiers, zero-filled where no day matches; the
/// grouped-bar presentation expects every cell. Records with an unmapped
/// code for this dimension fall outside the canonical grid.
pub fn tier_counts(
    window: &[&DailyRecord],
    tiers: &[usize],
    dim: CategoryDim,
) -> Vec<TierCountRow> {
    let mut rows = Vec::new();
    for &category in dim.canonical_order() {
        let mut counts = [0usize; 3];
        for (r, &tier) in window.iter().zip(tiers) {
            if dim.label(r) == Some(category) {
                counts[tier] += 1;
            }
        }
        for (count, &label) in counts.iter().zip(TIER_LABELS.iter()) {
            rows.push(TierCountRow {
                category: category.to_string(),
                tier: label,
                days: *count,
            });
        }
    }
    rows
}

/// Sum casual and registered rentals independently over the window. Their
/// sum always equals the window's total rentals since the source provides
/// `cnt = casual + registered` per day.
pub fn user_type_totals(window: &[&DailyRecord]) -> UserTypeTotals {
    UserTypeTotals {
        casual: window.iter().map(|r| u64::from(r.casual)).sum(),
        registered: window.iter().map(|r| u64::from(r.registered)).sum(),
    }
}

/// Run the whole pipeline for one viewer interaction.
pub fn compute(
    data: &[DailyRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ViewModel, PipelineError> {
    let window = filter_window(data, start, end)?;

    let totals: Vec<f64> = window.iter().map(|r| f64::from(r.total)).collect();
    let metrics = WindowMetrics {
        total_rentals: window.iter().map(|r| u64::from(r.total)).sum(),
        daily_mean: mean(&totals),
        peak_day: window.iter().map(|r| r.total).max().unwrap_or(0),
    };

    let (tiers, tier_binning) = demand_tiers(&window);

    Ok(ViewModel {
        start,
        end,
        days: window.len(),
        metrics,
        monthly: monthly_totals(&window),
        season_avg: category_average(&window, CategoryDim::Season),
        weather_avg: category_average(&window, CategoryDim::Weather),
        working_day_avg: category_average(&window, CategoryDim::WorkingDay),
        season_tiers: tier_counts(&window, &tiers, CategoryDim::Season),
        working_day_tiers: tier_counts(&window, &tiers, CategoryDim::WorkingDay),
        weather_tiers: tier_counts(&window, &tiers, CategoryDim::Weather),
        tier_binning,
        user_totals: user_type_totals(&window),
    })
}
