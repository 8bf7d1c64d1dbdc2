// Entry point and high-level console flow.
//
// The binary is the presentation stand-in for the original dashboard:
// - Option [1] loads and decodes the CSV, printing diagnostics.
// - Option [2] prompts for a date range and renders every derived view.
// - Option [3] exports the last rendered views as JSON.
//
// Every pass through option [2] re-runs the whole pipeline over the
// immutable loaded dataset; nothing is cached between interactions.
mod loader;
mod pipeline;
mod render;
mod types;
mod util;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{DailyRecord, ViewModel};

const DATA_PATH: &str = "data/day.csv";

// Simple in-memory app state so we only load the CSV once but can render
// the dashboard for many date ranges in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        last_view: None,
    })
});

struct AppState {
    data: Option<Vec<DailyRecord>>,
    last_view: Option<ViewModel>,
}

/// Print `prompt` and read one trimmed line from stdin.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after rendering.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Prompt for one date. Empty input takes `default`; anything unparseable
/// re-prompts.
fn prompt_date(label: &str, default: NaiveDate) -> NaiveDate {
    loop {
        let input = read_line(&format!("{} [{}]: ", label, default));
        if input.is_empty() {
            return default;
        }
        match util::parse_date_safe(Some(&input)) {
            Some(d) => return d,
            None => println!("Invalid date. Please use YYYY-MM-DD."),
        }
    }
}

/// Handle option [1]: load and decode the CSV file.
///
/// On success, we store the `Vec<DailyRecord>` in `APP_STATE` and print a
/// short textual summary. Load failures (missing file, malformed row or
/// date) are fatal for the dataset: nothing is stored.
fn handle_load() {
    match loader::load_and_decode(DATA_PATH) {
        Ok((data, load_report)) => {
            println!(
                "Processing dataset... ({} daily records loaded)",
                util::format_int(load_report.total_rows as i64)
            );
            if load_report.unmapped_codes > 0 {
                println!(
                    "Note: {} unmapped category codes kept as missing values.",
                    util::format_int(load_report.unmapped_codes as i64)
                );
            }
            if let Some((min, max)) = date_bounds(&data) {
                println!("Dataset spans {} to {}.", min, max);
            }
            println!();
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
            state.last_view = None;
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn date_bounds(data: &[DailyRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = data.iter().map(|r| r.date).min()?;
    let max = data.iter().map(|r| r.date).max()?;
    Some((min, max))
}

/// Handle option [2]: prompt for a date range and render the dashboard.
///
/// The prompt is constrained to the dataset's date bounds: empty input takes
/// the full range and out-of-bounds input is clamped before the pipeline
/// runs. An empty window is a warning, not a crash; the user lands back on
/// the menu and can pick another range.
fn handle_dashboard() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let Some((min_date, max_date)) = date_bounds(&data) else {
        println!("Error: The loaded dataset has no records.\n");
        return;
    };

    println!("Pick a date range between {} and {}.", min_date, max_date);
    let start = prompt_date("Start date", min_date).clamp(min_date, max_date);
    let end = prompt_date("End date", max_date).clamp(min_date, max_date);
    println!();

    match pipeline::compute(&data, start, end) {
        Ok(vm) => {
            render::render(&vm);
            let mut state = APP_STATE.lock().unwrap();
            state.last_view = Some(vm);
        }
        Err(e) => {
            println!("Warning: {}. Pick another range.\n", e);
        }
    }
}

/// Handle option [3]: export the last rendered views as pretty JSON.
fn handle_export() {
    let view = {
        let state = APP_STATE.lock().unwrap();
        state.last_view.clone()
    };
    let Some(view) = view else {
        println!("Error: No dashboard rendered yet. View it first (option 2).\n");
        return;
    };
    let file = "dashboard_views.json";
    match render::write_json(file, &view) {
        Ok(()) => println!("Views exported to {}.\n", file),
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn main() {
    env_logger::init();
    loop {
        println!("Bike Sharing Report");
        println!("[1] Load the dataset");
        println!("[2] View dashboard");
        println!("[3] Export current views to JSON\n");
        match read_line("Enter choice: ").as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_dashboard();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                handle_export();
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2, or 3.\n");
            }
        }
    }
}
