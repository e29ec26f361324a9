use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{
    parse_date, rename_header, CellValue, FitnessDataset, Measurement, Record, DATE_COLUMN,
    ID_COLUMN,
};
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an activity dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (tracker export layout)
/// * `.parquet` – same columns as the CSV, one record per row
///
/// Headline columns are renamed on load (`TotalSteps` → `Total Steps`, …)
/// and cohort labels are derived from identifier order.
pub fn load_file(path: &Path) -> Result<FitnessDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} records for {} identifiers from {}",
        dataset.len(),
        dataset.identifier_count(),
        path.display()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::NotFound(path.to_path_buf()),
        _ => DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

// ---------------------------------------------------------------------------
// Column lookup and record assembly (shared by both formats)
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header row.
struct ColumnIndex {
    id: usize,
    date: usize,
    measurements: [(Measurement, usize); 6],
}

impl ColumnIndex {
    /// `headers` must already be renamed.
    fn locate(headers: &[String]) -> Result<Self, DataLoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
        };

        let id = find(ID_COLUMN)?;
        let date = find(DATE_COLUMN)?;
        let mut measurements = [(Measurement::TotalSteps, 0); 6];
        for (slot, m) in measurements.iter_mut().zip(Measurement::ALL) {
            // Report the raw export name; that is what a broken file lacks.
            let pos = find(m.column_name())
                .map_err(|_| DataLoadError::MissingColumn(m.source_name().to_string()))?;
            *slot = (m, pos);
        }

        Ok(ColumnIndex {
            id,
            date,
            measurements,
        })
    }

    fn build_record(
        &self,
        row_no: usize,
        headers: &[String],
        cells: Vec<CellValue>,
    ) -> Result<Record, DataLoadError> {
        let invalid = |col: usize| DataLoadError::InvalidValue {
            row: row_no,
            column: headers[col].clone(),
            value: cells[col].to_string(),
        };

        let id = match &cells[self.id] {
            CellValue::Integer(i) => *i,
            CellValue::Float(f) if f.fract() == 0.0 => *f as i64,
            _ => return Err(invalid(self.id)),
        };

        let activity_date = match &cells[self.date] {
            CellValue::Date(s) | CellValue::String(s) => parse_date(s),
            _ => None,
        }
        .ok_or_else(|| invalid(self.date))?;

        let mut values = [0.0f64; 6];
        for (slot, (_, col)) in values.iter_mut().zip(self.measurements) {
            *slot = cells[col].as_f64().ok_or_else(|| invalid(col))?;
        }
        let [total_steps, total_distance, calories, very, fairly, lightly] = values;

        Ok(Record {
            id,
            activity_date,
            total_steps,
            total_distance,
            calories,
            very_active_minutes: very,
            fairly_active_minutes: fairly,
            lightly_active_minutes: lightly,
            cells,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, e.g. the tracker's daily
/// activity export (`Id,ActivityDate,TotalSteps,TotalDistance,…`).
/// Files written by the export service (BOM, renamed headers) load too.
fn load_csv(path: &Path) -> Result<FitnessDataset, DataLoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| rename_header(h.trim_start_matches('\u{feff}').trim()))
        .collect();

    let index = ColumnIndex::locate(&headers)?;
    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let cells: Vec<CellValue> = row.iter().map(guess_cell_type).collect();
        records.push(index.build_record(row_no, &headers, cells)?);
    }

    Ok(FitnessDataset::from_records(headers, records))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if parse_date(s).is_some() {
        return CellValue::Date(s.to_string());
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same columns as the CSV export.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); dates may be strings, `Date32`,
/// `Date64` or timestamps (time of day is dropped).
fn load_parquet(path: &Path) -> Result<FitnessDataset, DataLoadError> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(open(path)?).map_err(parquet_err)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| rename_header(f.name()))
        .collect();
    let index = ColumnIndex::locate(&headers)?;
    let reader = builder.build().map_err(parquet_err)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(parquet_err)?;
        for row in 0..batch.num_rows() {
            let cells: Vec<CellValue> = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect();
            let row_no = records.len();
            records.push(index.build_record(row_no, &headers, cells)?);
        }
    }

    Ok(FitnessDataset::from_records(headers, records))
}

fn parquet_err(e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parquet(e.to_string())
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => guess_cell_type(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => guess_cell_type(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::String(col.as_boolean().value(row).to_string()),
        DataType::Date32 => date_cell(col.as_primitive::<Date32Type>().value_as_date(row)),
        DataType::Date64 => date_cell(col.as_primitive::<Date64Type>().value_as_date(row)),
        DataType::Timestamp(unit, _) => {
            let datetime = match unit {
                TimeUnit::Second => col
                    .as_primitive::<TimestampSecondType>()
                    .value_as_datetime(row),
                TimeUnit::Millisecond => col
                    .as_primitive::<TimestampMillisecondType>()
                    .value_as_datetime(row),
                TimeUnit::Microsecond => col
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row),
                TimeUnit::Nanosecond => col
                    .as_primitive::<TimestampNanosecondType>()
                    .value_as_datetime(row),
            };
            date_cell(datetime.map(|dt| dt.date()))
        }
        // Anything else keeps Arrow's own rendering of the value.
        _ => ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())
            .map(|fmt| guess_cell_type(&fmt.value(row).to_string()))
            .unwrap_or(CellValue::Null),
    }
}

fn date_cell(date: Option<NaiveDate>) -> CellValue {
    date.map(|d| CellValue::Date(d.format("%Y-%m-%d").to_string()))
        .unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{
        ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
        TimestampMicrosecondArray, TimestampMillisecondArray,
    };
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::cohort::Cohort;
    use crate::data::table::DataTable;
    use crate::export::export_csv;

    const HEADER: &str = "Id,ActivityDate,TotalSteps,TotalDistance,VeryActiveMinutes,\
FairlyActiveMinutes,LightlyActiveMinutes,SedentaryMinutes,Calories";

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{body}").unwrap();
        file
    }

    #[test]
    fn loads_and_renames_tracker_export() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             1,1/1/2024,4000,2.5,30,10,120,700,2100\n\
             1503960366,4/12/2016,13162,8.5,25,13,328,728,1985\n"
        ));
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert!(ds.columns.contains(&"Total Steps".to_string()));
        assert!(ds.columns.contains(&"Calories Burned".to_string()));
        assert!(ds.columns.contains(&"SedentaryMinutes".to_string()));

        let r = &ds.records[1];
        assert_eq!(r.id, 1503960366);
        assert_eq!(r.total_distance, 8.5);
        assert_eq!(r.lightly_active_minutes, 328.0);
        assert_eq!(r.activity_date.to_string(), "2016-04-12");
        assert_eq!(ds.cohorts, vec![Cohort::Personal, Cohort::Peers(1)]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("/nonexistent/activity.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }

    #[test]
    fn missing_column_is_reported_by_source_name() {
        let file = write_csv("Id,ActivityDate,TotalSteps\n1,1/1/2024,10\n");
        let err = load_file(file.path()).unwrap_err();
        match err {
            DataLoadError::MissingColumn(name) => assert_eq!(name, "TotalDistance"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_measurement_is_invalid_value() {
        let file = write_csv(&format!("{HEADER}\n1,1/1/2024,lots,2.5,30,10,120,700,2100\n"));
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { row: 0, .. }));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("activity.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn reloading_yields_identical_labels() {
        let mut body = format!("{HEADER}\n");
        for id in [1, 5, 9, 5, 1, 12] {
            body.push_str(&format!("{id},4/12/2016,100,0.1,1,2,3,4,5\n"));
        }
        let file = write_csv(&body);
        let first = load_file(file.path()).unwrap();
        let second = load_file(file.path()).unwrap();
        assert_eq!(first.cohorts, second.cohorts);
    }

    fn write_parquet(columns: Vec<(&str, ArrayRef)>) -> tempfile::NamedTempFile {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    fn floats(values: &[f64]) -> ArrayRef {
        Arc::new(Float64Array::from(values.to_vec()))
    }

    fn days_since_epoch(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (date - epoch).num_days() as i32
    }

    /// Required columns besides the date, for two rows.
    fn measurement_columns() -> Vec<(&'static str, ArrayRef)> {
        vec![
            ("Id", Arc::new(Int64Array::from(vec![1, 1503960366])) as ArrayRef),
            ("TotalSteps", floats(&[4000.0, 13162.0])),
            ("TotalDistance", floats(&[2.5, 8.5])),
            ("VeryActiveMinutes", floats(&[30.0, 25.0])),
            ("FairlyActiveMinutes", floats(&[10.0, 13.0])),
            ("LightlyActiveMinutes", floats(&[120.0, 328.0])),
            ("Calories", floats(&[2100.0, 1985.0])),
        ]
    }

    #[test]
    fn loads_parquet_with_text_dates_and_extra_columns() {
        let mut columns = measurement_columns();
        columns.insert(
            1,
            (
                "ActivityDate",
                Arc::new(StringArray::from(vec!["1/1/2024", "2016-04-12"])) as ArrayRef,
            ),
        );
        columns.push(("Synced", Arc::new(BooleanArray::from(vec![true, false])) as ArrayRef));
        let file = write_parquet(columns);

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.columns,
            vec![
                "Id",
                "ActivityDate",
                "Total Steps",
                "Total Distance (in miles)",
                "VeryActiveMinutes",
                "FairlyActiveMinutes",
                "LightlyActiveMinutes",
                "Calories Burned",
                "Synced",
            ]
        );

        let r = &ds.records[1];
        assert_eq!(r.id, 1503960366);
        assert_eq!(r.total_steps, 13162.0);
        assert_eq!(r.calories, 1985.0);
        assert_eq!(r.activity_date.to_string(), "2016-04-12");
        assert_eq!(ds.cohorts, vec![Cohort::Personal, Cohort::Peers(1)]);

        assert_eq!(ds.records[0].cells[8], CellValue::String("true".into()));
        assert_eq!(r.cells[8], CellValue::String("false".into()));

        let blob = export_csv(&DataTable::from_dataset(&ds)).unwrap();
        let text = String::from_utf8(blob.content).unwrap();
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.ends_with(",true"), "{first_row}");
    }

    #[test]
    fn loads_parquet_date32_and_timestamp_dates() {
        let april = NaiveDate::from_ymd_opt(2016, 4, 12).unwrap();
        let january = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let mut columns = measurement_columns();
        columns.insert(
            1,
            (
                "ActivityDate",
                Arc::new(Date32Array::from(vec![
                    days_since_epoch(january),
                    days_since_epoch(april),
                ])) as ArrayRef,
            ),
        );
        let millis = |d: NaiveDate| d.and_hms_opt(7, 30, 0).unwrap().and_utc().timestamp_millis();
        columns.push((
            "SyncedAt",
            Arc::new(TimestampMillisecondArray::from(vec![millis(january), millis(april)]))
                as ArrayRef,
        ));
        let file = write_parquet(columns);

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].activity_date, january);
        assert_eq!(ds.records[1].activity_date, april);
        assert_eq!(ds.records[1].cells[1], CellValue::Date("2016-04-12".into()));
        assert_eq!(ds.records[1].cells[8], CellValue::Date("2016-04-12".into()));
    }

    #[test]
    fn timestamp_activity_dates_load() {
        let april = NaiveDate::from_ymd_opt(2016, 4, 12).unwrap();
        let micros = |d: NaiveDate| d.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_micros();

        let mut columns = measurement_columns();
        columns.insert(
            1,
            (
                "ActivityDate",
                Arc::new(TimestampMicrosecondArray::from(vec![micros(april), micros(april)]))
                    as ArrayRef,
            ),
        );
        let ds = load_file(write_parquet(columns).path()).unwrap();
        assert!(ds.records.iter().all(|r| r.activity_date == april));
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        let mut columns = measurement_columns();
        columns.insert(
            1,
            (
                "ActivityDate",
                Arc::new(StringArray::from(vec!["1/1/2024", "4/12/2016"])) as ArrayRef,
            ),
        );
        columns.retain(|(name, _)| *name != "Calories");
        let file = write_parquet(columns);

        match load_file(file.path()).unwrap_err() {
            DataLoadError::MissingColumn(name) => assert_eq!(name, "Calories"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn guesses_cell_types() {
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("4.2"), CellValue::Float(4.2));
        assert_eq!(guess_cell_type("4/12/2016"), CellValue::Date("4/12/2016".into()));
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("walk"), CellValue::String("walk".into()));
    }
}
