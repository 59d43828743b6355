use crate::models::{SnapshotOffer, SnapshotRow};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const REQUIRED_COLUMNS: &[&str] = &["hotel_name", "start_date", "end_date"];

/// Logs go to stderr so that stdout only carries results.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `<dir>/<dataset>_hotels_<DD_MM_YYYY>.csv`
pub fn dated_output_path(output_dir: &Path, dataset: &str, date: NaiveDate) -> PathBuf {
    output_dir.join(format!("{}_hotels_{}.csv", dataset, date.format("%d_%m_%Y")))
}

/// The header is written even when there are no offers, so an empty fetch
/// still gives a readable snapshot.
pub fn save_offers_to_csv<T: Serialize + SnapshotRow>(offers: &[T], output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create output directory: {}", parent.display()))?;
        }
    }

    let file = File::create(output_path)
        .context(format!("Failed to create output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);
    if offers.is_empty() {
        writer.write_record(T::COLUMNS)?;
    }
    for offer in offers {
        writer.serialize(offer)?;
    }
    writer.flush()?;

    info!("Saved {} offers to {}", offers.len(), output_path.display());
    Ok(())
}

pub fn save_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(output_path, json)
        .context(format!("Failed to write JSON file: {}", output_path.display()))?;
    info!("Saved raw listings to {}", output_path.display());
    Ok(())
}

/// Loads a snapshot written by one of the fetchers. Only the name and date
/// columns are read; they must be present. A completely empty file has no
/// offers.
pub fn load_snapshot(input_path: &Path) -> Result<Vec<SnapshotOffer>> {
    let file = File::open(input_path)
        .context(format!("Failed to open snapshot: {}", input_path.display()))?;

    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .context(format!("Failed to read header of {}", input_path.display()))?
        .clone();
    if headers.is_empty() {
        debug!("{} is empty", input_path.display());
        return Ok(Vec::new());
    }
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == *column) {
            bail!("{} has no '{}' column", input_path.display(), column);
        }
    }

    let mut offers = Vec::new();
    for result in reader.deserialize() {
        let offer: SnapshotOffer =
            result.context(format!("Malformed row in {}", input_path.display()))?;
        offers.push(offer);
    }

    let dated = offers.iter().filter(|offer| offer.interval.is_some()).count();
    debug!(
        "Loaded {} offers from {} ({} with a usable date range)",
        offers.len(),
        input_path.display(),
        dated
    );
    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VerychicOffer, VoyagePriveOffer};
    use chrono::NaiveDateTime;
    use std::io::Write;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn dated_path_uses_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            dated_output_path(Path::new("data"), "verychic", date),
            PathBuf::from("data/verychic_hotels_07_03_2025.csv")
        );
    }

    #[test]
    fn written_snapshot_can_be_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("voyageprive_hotels_01_03_2025.csv");

        let offers = vec![VoyagePriveOffer {
            destination: "Greece".to_string(),
            hotel_name: "Hôtel Aegean Blue".to_string(),
            price: "£340".to_string(),
            time_remaining: "2 days".to_string(),
            start_date: at(1, 9),
            end_date: at(3, 9),
            exclusive: true,
        }];
        save_offers_to_csv(&offers, &path).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].hotel_name, "Hôtel Aegean Blue");
        assert_eq!(loaded[0].normalized_name, "aegeanblue");
        let interval = loaded[0].interval.unwrap();
        assert_eq!((interval.start, interval.end), (at(1, 9), at(3, 9)));
    }

    #[test]
    fn snapshot_without_date_columns_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hotel_name,Price").unwrap();
        writeln!(file, "Hotel Royal,120").unwrap();

        let err = load_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn empty_fetch_still_writes_a_readable_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verychic_hotels_01_01_2025.csv");

        save_offers_to_csv(&Vec::<VerychicOffer>::new(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), VerychicOffer::COLUMNS.join(","));
        assert!(load_snapshot(&path).unwrap().is_empty());
    }

    #[test]
    fn zero_byte_file_has_no_offers() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_snapshot(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_snapshot(&dir.path().join("nope.csv")).is_err());
    }
}
