// Console rendering of a computed `ViewModel`.
//
// This is the thin presentation stand-in for the charting layer: each
// derived view becomes a markdown table, the header metrics become formatted
// scalars. Nothing here computes; it only displays what the pipeline built.
use crate::types::{TierBinning, UserTypeTotals, ViewModel};
use crate::util::{format_int, format_number};
use serde::Serialize;
use std::error::Error;
use tabled::{settings::Style, Table, Tabled};

pub fn preview_table<T>(rows: &[T])
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(rows.iter().cloned()).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

fn render_user_split(totals: &UserTypeTotals) {
    let overall = totals.casual + totals.registered;
    let pct = |part: u64| {
        if overall == 0 {
            0.0
        } else {
            part as f64 / overall as f64 * 100.0
        }
    };
    println!(
        "casual:     {} ({}%)",
        format_int(totals.casual),
        format_number(pct(totals.casual), 1)
    );
    println!(
        "registered: {} ({}%)\n",
        format_int(totals.registered),
        format_number(pct(totals.registered), 1)
    );
}

pub fn render(vm: &ViewModel) {
    println!("Bike Sharing Dashboard");
    println!(
        "(Window: {} to {}, {} days)\n",
        vm.start,
        vm.end,
        format_int(vm.days as u64)
    );

    println!("Total Rentals:       {}", format_int(vm.metrics.total_rentals));
    println!(
        "Daily Average:       {}",
        format_int(vm.metrics.daily_mean.trunc() as i64)
    );
    println!("Peak Day:            {}\n", format_int(vm.metrics.peak_day));

    println!("Monthly Rental Trend\n");
    preview_table(&vm.monthly);

    println!("Average Rentals by Season\n");
    preview_table(&vm.season_avg);
    println!("Average Rentals by Weather\n");
    preview_table(&vm.weather_avg);
    println!("Average Rentals by Day Type\n");
    preview_table(&vm.working_day_avg);

    println!("Demand Tiers");
    match vm.tier_binning {
        TierBinning::Quantile { lower, upper } => println!(
            "(Equal-count bins; boundaries at {} and {} rentals)\n",
            format_number(lower, 1),
            format_number(upper, 1)
        ),
        TierBinning::EqualWidth { lower, upper } => println!(
            "(Too few distinct totals for equal-count bins; equal-width \
             fallback with boundaries at {} and {} rentals)\n",
            format_number(lower, 1),
            format_number(upper, 1)
        ),
    }
    println!("Demand Tiers by Season\n");
    preview_table(&vm.season_tiers);
    println!("Demand Tiers by Day Type\n");
    preview_table(&vm.working_day_tiers);
    println!("Demand Tiers by Weather\n");
    preview_table(&vm.weather_tiers);

    println!("Rentals by User Type\n");
    render_user_split(&vm.user_totals);
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}
