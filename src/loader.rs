use crate::types::{DailyRecord, RawRow};
use crate::util::parse_date_safe;
use csv::ReaderBuilder;
use std::error::Error;

// Fixed code -> label lookup tables for the four coded columns.
// A code outside a table's domain decodes to `None` rather than failing the
// load; the record keeps flowing through every aggregate under its own
// missing-label bucket.
fn season_label(code: Option<i64>) -> Option<&'static str> {
    match code? {
        1 => Some("Spring"),
        2 => Some("Summer"),
        3 => Some("Fall"),
        4 => Some("Winter"),
        _ => None,
    }
}

fn weather_label(code: Option<i64>) -> Option<&'static str> {
    match code? {
        1 => Some("Clear"),
        2 => Some("Mist"),
        3 => Some("Light Snow/Rain"),
        4 => Some("Heavy Rain/Snow/Fog"),
        _ => None,
    }
}

fn year_label(code: Option<i64>) -> Option<&'static str> {
    match code? {
        0 => Some("2011"),
        1 => Some("2012"),
        _ => None,
    }
}

fn working_day_label(code: Option<i64>) -> Option<&'static str> {
    match code? {
        0 => Some("Holiday"),
        1 => Some("Working Day"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub unmapped_codes: usize,
}

/// Load `day.csv` and decode every row into a `DailyRecord`.
///
/// An unparseable date aborts the whole load: the dataset is assumed
/// well-formed and there is no per-row recovery. Unmapped category codes are
/// tolerated, counted in the `LoadReport`, and kept as missing labels.
pub fn load_and_decode(path: &str) -> Result<(Vec<DailyRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut unmapped_codes = 0usize;
    let mut records: Vec<DailyRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        let row = result?;
        total_rows += 1;

        let date = parse_date_safe(Some(&row.dteday))
            .ok_or_else(|| format!("row {}: malformed date {:?}", total_rows, row.dteday))?;

        let season = season_label(row.season);
        let weather = weather_label(row.weathersit);
        let year = year_label(row.yr);
        let working_day = working_day_label(row.workingday);
        for (label, column) in [
            (season, "season"),
            (weather, "weathersit"),
            (year, "yr"),
            (working_day, "workingday"),
        ] {
            if label.is_none() {
                unmapped_codes += 1;
                log::warn!("row {}: unmapped {} code, keeping as missing", total_rows, column);
            }
        }

        records.push(DailyRecord {
            date,
            season,
            weather,
            year_label: year,
            working_day,
            casual: row.casual,
            registered: row.registered,
            total: row.cnt,
        });
    }

    let report = LoadReport {
        total_rows,
        unmapped_codes,
    };
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_fixture(name: &str, body: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("bikeshare-report-{}-{}", std::process::id(), name));
        fs::write(&path, body).unwrap();
        path
    }

    const HEADER: &str =
        "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt\n";

    #[test]
    fn decodes_codes_into_labels() {
        let body = format!(
            "{}{}{}",
            HEADER,
            "1,2011-01-01,1,0,1,0,6,0,2,0.34,0.36,0.80,0.16,331,654,985\n",
            "2,2011-07-02,3,1,7,0,0,1,1,0.36,0.35,0.69,0.24,131,670,801\n"
        );
        let path = write_fixture("decode.csv", &body);
        let (records, report) = load_and_decode(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.unmapped_codes, 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].season, Some("Spring"));
        assert_eq!(records[0].weather, Some("Mist"));
        assert_eq!(records[0].year_label, Some("2011"));
        assert_eq!(records[0].working_day, Some("Holiday"));
        assert_eq!(records[0].total, 985);
        assert_eq!(records[1].season, Some("Fall"));
        assert_eq!(records[1].weather, Some("Clear"));
        assert_eq!(records[1].working_day, Some("Working Day"));
    }

    #[test]
    fn unmapped_code_becomes_missing_label_and_is_counted() {
        let body = format!(
            "{}{}",
            HEADER, "1,2011-01-01,9,0,1,0,6,0,1,0.34,0.36,0.80,0.16,10,20,30\n"
        );
        let path = write_fixture("unmapped.csv", &body);
        let (records, report) = load_and_decode(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(records[0].season, None);
        assert_eq!(report.unmapped_codes, 1);
    }

    #[test]
    fn malformed_date_aborts_the_load() {
        let body = format!(
            "{}{}{}",
            HEADER,
            "1,2011-01-01,1,0,1,0,6,0,1,0.34,0.36,0.80,0.16,10,20,30\n",
            "2,not-a-date,1,0,1,0,6,1,1,0.34,0.36,0.80,0.16,10,20,30\n"
        );
        let path = write_fixture("baddate.csv", &body);
        let result = load_and_decode(path.to_str().unwrap());
        fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
