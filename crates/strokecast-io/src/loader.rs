//! CSV reader for the stroke dataset with row filtering.

use std::path::{Path, PathBuf};

use strokecast_rf::Dataset;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::codes::{gender_code, smoking_code};

// Column positions in the raw stroke CSV:
// id,gender,age,hypertension,heart_disease,ever_married,work_type,
// Residence_type,avg_glucose_level,bmi,smoking_status,stroke
const COL_GENDER: usize = 1;
const COL_AGE: usize = 2;
const COL_HYPERTENSION: usize = 3;
const COL_HEART_DISEASE: usize = 4;
const COL_AVG_GLUCOSE: usize = 8;
const COL_BMI: usize = 9;
const COL_SMOKING: usize = 10;
const COL_STROKE: usize = 11;
const N_COLUMNS: usize = 12;

/// Names of the feature columns, in record order.
pub const FEATURE_NAMES: [&str; 7] = [
    "gender",
    "age",
    "hypertension",
    "heart_disease",
    "avg_glucose_level",
    "bmi",
    "smoking_status",
];

/// A loaded stroke dataset plus the count of rows that were filtered out.
#[derive(Debug)]
pub struct LoadedData {
    /// Validated records: 7 encoded features followed by the stroke label.
    pub dataset: Dataset,
    /// Number of data rows skipped as malformed.
    pub n_skipped: usize,
}

/// Reads patient records from the 12-column stroke CSV.
///
/// Each usable row becomes a record
/// `[gender, age, hypertension, heart_disease, avg_glucose_level, bmi,
/// smoking_status, stroke]` with the categorical columns encoded through
/// the static tables in [`crate::codes`]. Data rows that are too short,
/// hold unparseable numerics, carry an unrecognized category, or have a
/// non-binary stroke label are skipped and counted rather than treated
/// as fatal.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV framing |
/// | [`IoError::EmptyDataset`] | Zero usable rows after filtering |
pub struct StrokeReader {
    path: PathBuf,
    max_rows: Option<usize>,
}

impl StrokeReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            max_rows: None,
        }
    }

    /// Cap the number of usable rows read. `None` reads the whole file.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Read and filter the CSV file, returning the encoded dataset.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<LoadedData, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets short rows through so that our own filtering
        // governs instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut n_skipped = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            if let Some(cap) = self.max_rows
                && rows.len() >= cap
            {
                break;
            }

            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            match encode_record(&record) {
                Some(row) => rows.push(row),
                None => {
                    n_skipped += 1;
                    debug!(row_index, "skipped malformed row");
                }
            }
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let n_rows = rows.len();
        let dataset = Dataset::from_rows(rows).map_err(|e| IoError::InvalidDataset {
            path: self.path.clone(),
            source: e,
        })?;

        info!(n_rows, n_skipped, "stroke dataset loaded");
        Ok(LoadedData { dataset, n_skipped })
    }
}

/// Encode one raw CSV row into a numeric record, or `None` if unusable.
fn encode_record(record: &csv::StringRecord) -> Option<Vec<f64>> {
    if record.len() < N_COLUMNS {
        return None;
    }

    let gender = gender_code(record.get(COL_GENDER)?.trim())?;
    let age = numeric(record, COL_AGE)?;
    let hypertension = numeric(record, COL_HYPERTENSION)?;
    let heart_disease = numeric(record, COL_HEART_DISEASE)?;
    let avg_glucose = numeric(record, COL_AVG_GLUCOSE)?;
    let bmi = numeric(record, COL_BMI)?;
    let smoking = smoking_code(record.get(COL_SMOKING)?.trim())?;

    let stroke = numeric(record, COL_STROKE)?;
    if stroke != 0.0 && stroke != 1.0 {
        return None;
    }

    Some(vec![
        gender,
        age,
        hypertension,
        heart_disease,
        avg_glucose,
        bmi,
        smoking,
        stroke,
    ])
}

/// Parse a finite float from the given column.
fn numeric(record: &csv::StringRecord, col: usize) -> Option<f64> {
    record
        .get(col)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const HEADER: &str = "id,gender,age,hypertension,heart_disease,ever_married,work_type,Residence_type,avg_glucose_level,bmi,smoking_status,stroke\n";

    fn write_csv(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(HEADER.as_bytes()).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_rows() {
        let f = write_csv(concat!(
            "9046,Male,67,0,1,Yes,Private,Urban,228.69,36.6,formerly smoked,1\n",
            "51676,Female,61,0,0,Yes,Self-employed,Rural,202.21,28.9,never smoked,0\n",
        ));
        let loaded = StrokeReader::new(f.path()).read().unwrap();

        assert_eq!(loaded.dataset.len(), 2);
        assert_eq!(loaded.n_skipped, 0);
        assert_eq!(loaded.dataset.n_features(), 7);
        assert_eq!(
            loaded.dataset.rows()[0],
            vec![0.0, 67.0, 0.0, 1.0, 228.69, 36.6, 1.0, 1.0]
        );
        assert_eq!(loaded.dataset.label(0), 1);
        assert_eq!(loaded.dataset.label(1), 0);
    }

    #[test]
    fn malformed_rows_skipped_and_counted() {
        let f = write_csv(concat!(
            "1,Male,67,0,1,Yes,Private,Urban,228.69,36.6,formerly smoked,1\n",
            "2,Female,61,0,0,Yes,Private,Urban,202.21,N/A,never smoked,0\n",
            "3,Female,49,0,0\n",
            "4,Martian,49,0,0,Yes,Private,Urban,171.23,34.4,smokes,0\n",
            "5,Female,79,1,0,Yes,Self-employed,Rural,174.12,24.0,never smoked,0\n",
        ));
        let loaded = StrokeReader::new(f.path()).read().unwrap();

        assert_eq!(loaded.dataset.len(), 2);
        assert_eq!(loaded.n_skipped, 3);
    }

    #[test]
    fn non_binary_stroke_label_skipped() {
        let f = write_csv(concat!(
            "1,Male,67,0,1,Yes,Private,Urban,228.69,36.6,formerly smoked,2\n",
            "2,Female,61,0,0,Yes,Private,Urban,202.21,28.9,never smoked,0\n",
        ));
        let loaded = StrokeReader::new(f.path()).read().unwrap();

        assert_eq!(loaded.dataset.len(), 1);
        assert_eq!(loaded.n_skipped, 1);
    }

    #[test]
    fn unknown_smoking_status_maps_to_code_three() {
        let f = write_csv("1,Male,80,1,1,Yes,Private,Urban,120.0,30.0,Unknown,0\n");
        let loaded = StrokeReader::new(f.path()).read().unwrap();
        assert_eq!(loaded.dataset.rows()[0][6], 3.0);
    }

    #[test]
    fn max_rows_caps_usable_rows() {
        let body: String = (0..10)
            .map(|i| format!("{i},Male,50,0,0,Yes,Private,Urban,100.0,25.0,smokes,0\n"))
            .collect();
        let f = write_csv(&body);
        let loaded = StrokeReader::new(f.path())
            .with_max_rows(Some(4))
            .read()
            .unwrap();

        assert_eq!(loaded.dataset.len(), 4);
    }

    #[test]
    fn error_file_not_found() {
        let result = StrokeReader::new(Path::new("/nonexistent/stroke.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("");
        let result = StrokeReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_all_rows_malformed() {
        let f = write_csv("1,Male,sixty,0,0,Yes,Private,Urban,100.0,25.0,smokes,0\n");
        let result = StrokeReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }
}
