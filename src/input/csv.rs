use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::{LoadError, Result};
use crate::core::{Sample, SampleBuffer};

/// Row tag for simulator output; every other tag is skipped
pub const SIM_TAG: &str = "SIM";

const TYPE_COLUMN: &str = "TYPE";

/// Numeric columns in the order they fill a [`Sample`]
const VALUE_COLUMNS: [&str; 7] = ["TIME", "X", "Y", "THETA", "VX", "VY", "VA"];

/// Load a trajectory from a CSV file
///
/// Expects a header row with at least `TYPE,TIME,X,Y,THETA,VX,VY,VA`.
/// Only `SIM` rows are kept. A file with no `SIM` rows gives an empty
/// buffer rather than an error.
pub fn load_trajectory(path: impl AsRef<Path>) -> Result<SampleBuffer> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    info!("Loading trajectory from {}", path.display());
    load_reader(file)
}

/// Load a trajectory from any CSV source
pub fn load_reader<R: Read>(source: R) -> Result<SampleBuffer> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(source);

    let headers = rdr.headers()?.clone();
    let type_idx = find_column(&headers, TYPE_COLUMN)?;
    let mut value_idx = [0usize; 7];
    for (slot, name) in value_idx.iter_mut().zip(VALUE_COLUMNS) {
        *slot = find_column(&headers, name)?;
    }

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;

        if record.get(type_idx) != Some(SIM_TAG) {
            skipped += 1;
            continue;
        }

        let mut values = [0.0f64; 7];
        for ((value, &idx), column) in values.iter_mut().zip(&value_idx).zip(VALUE_COLUMNS) {
            *value = parse_field(&record, idx, row, column)?;
        }
        let [time, pos_x, pos_y, heading, vel_x, vel_y, angular_vel] = values;

        samples.push(Sample {
            time,
            pos_x,
            pos_y,
            heading,
            vel_x,
            vel_y,
            angular_vel,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} non-{} rows", skipped, SIM_TAG);
    }
    info!("Trajectory loaded: {} frames", samples.len());

    Ok(SampleBuffer::from_samples(samples))
}

fn parse_field(
    record: &::csv::StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidValue {
            row,
            column,
            value: raw.to_string(),
        })
}

/// Find a column by name, ignoring case
fn find_column(headers: &::csv::StringRecord, name: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
        .ok_or(LoadError::MissingColumn(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "TYPE,TIME,X,Y,THETA,VX,VY,VA\n";

    #[test]
    fn test_load_sim_rows() {
        let data = format!(
            "{}SIM,0.0,0.0,0.0,0.0,0.0,0.0,0.0\nSIM,0.1,0.5,-0.25,1.57,1.0,2.0,0.3\n",
            HEADER
        );
        let buffer = load_reader(data.as_bytes()).unwrap();

        assert_eq!(buffer.len(), 2);
        let s = buffer.at(1);
        assert_eq!(s.time, 0.1);
        assert_eq!(s.pos_x, 0.5);
        assert_eq!(s.pos_y, -0.25);
        assert_eq!(s.heading, 1.57);
        assert_eq!(s.vel_x, 1.0);
        assert_eq!(s.vel_y, 2.0);
        assert_eq!(s.angular_vel, 0.3);
    }

    #[test]
    fn test_other_tags_are_skipped() {
        let data = format!(
            "{}SIM,0.0,1,1,0,0,0,0\nCMD,garbage,,,,,,\nSIM,1.0,2,2,0,0,0,0\nNOTE,1.5\n",
            HEADER
        );
        let buffer = load_reader(data.as_bytes()).unwrap();

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.at(0).pos_x, 1.0);
        assert_eq!(buffer.at(1).pos_x, 2.0);
    }

    #[test]
    fn test_no_sim_rows_gives_empty_buffer() {
        let data = format!("{}CMD,0.0,1,1,0,0,0,0\n", HEADER);
        let buffer = load_reader(data.as_bytes()).unwrap();
        assert!(buffer.is_empty());

        let buffer = load_reader(HEADER.as_bytes()).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_columns_in_any_order_and_case() {
        let data = "va,vy,vx,theta,y,x,time,type,extra\n0.3,0.2,0.1,1.0,2.0,3.0,4.0,SIM,ignored\n";
        let buffer = load_reader(data.as_bytes()).unwrap();

        assert_eq!(buffer.len(), 1);
        let s = buffer.at(0);
        assert_eq!(s.time, 4.0);
        assert_eq!(s.pos_x, 3.0);
        assert_eq!(s.pos_y, 2.0);
        assert_eq!(s.heading, 1.0);
        assert_eq!(s.angular_vel, 0.3);
    }

    #[test]
    fn test_missing_column() {
        let data = "TYPE,TIME,X,Y,THETA,VX,VY\nSIM,0,0,0,0,0,0\n";
        let err = load_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("VA")));
    }

    #[test]
    fn test_invalid_value_reports_row_and_column() {
        let data = format!("{}SIM,0.0,0,0,0,0,0,0\nSIM,0.1,oops,0,0,0,0,0\n", HEADER);
        let err = load_reader(data.as_bytes()).unwrap_err();
        match err {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "X");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let data = format!("{}SIM,0.0,0,0,0,0,0,0\nSIM,NaN,0,0,0,0,0,0\n", HEADER);
        let err = load_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 2, column: "TIME", ref value } if value == "NaN"
        ));

        for bad in ["inf", "-inf"] {
            let data = format!("{}SIM,0.0,0,0,0,{},0,0\n", HEADER, bad);
            let err = load_reader(data.as_bytes()).unwrap_err();
            assert!(matches!(err, LoadError::InvalidValue { row: 1, column: "VX", .. }));
        }
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}SIM, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0", HEADER).unwrap();

        let buffer = load_trajectory(file.path()).unwrap();
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.at(0).pos_y, 2.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_trajectory("/nonexistent/trajectory.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
