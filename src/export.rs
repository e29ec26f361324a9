use crate::data::table::DataTable;
use crate::error::ExportError;

pub const EXPORT_FILENAME: &str = "data.csv";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A downloadable file produced in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub filename: &'static str,
    pub content: Vec<u8>,
}

/// Serialize the unlabeled table as CSV: BOM, header row, one row per record.
///
/// Nothing is written to disk; the caller decides where the bytes go.
pub fn export_csv(table: &DataTable) -> Result<ExportBlob, ExportError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    let content = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;

    Ok(ExportBlob {
        filename: EXPORT_FILENAME,
        content,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::CellValue;
    use crate::data::partition::CohortPartition;

    const SOURCE: &str = "Id,ActivityDate,TotalSteps,TotalDistance,VeryActiveMinutes,\
FairlyActiveMinutes,LightlyActiveMinutes,SedentaryMinutes,Calories
1,1/1/2024,4000,2.5,30,10,120,700,2100
1503960366,4/12/2016,13162,8.5,25,13,328,728,1985
1503960366,4/13/2016,10735,6.97,21,19,217,776,1797
";

    #[test]
    fn blob_starts_with_bom_and_header() {
        let table = DataTable {
            columns: vec!["Id".into(), "Total Steps".into()],
            rows: vec![vec![CellValue::Integer(1), CellValue::Float(2.0)]],
        };
        let blob = export_csv(&table).unwrap();

        assert_eq!(blob.filename, "data.csv");
        assert!(blob.content.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&blob.content[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text, "Id,Total Steps\n1,2.0\n");
    }

    #[test]
    fn export_is_idempotent() {
        let table = DataTable {
            columns: vec!["Id".into()],
            rows: vec![vec![CellValue::Integer(7)]],
        };
        assert_eq!(export_csv(&table).unwrap(), export_csv(&table).unwrap());
    }

    #[test]
    fn exported_file_reloads_with_same_shape() {
        let mut source = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(source, "{SOURCE}").unwrap();
        let original = load_file(source.path()).unwrap();
        let table = CohortPartition::new(&original).table;

        let blob = export_csv(&table).unwrap();
        let mut exported = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        exported.write_all(&blob.content).unwrap();
        exported.flush().unwrap();

        let reloaded = load_file(exported.path()).unwrap();
        assert_eq!(reloaded.len(), original.len());
        assert_eq!(reloaded.columns, table.columns);
        assert_eq!(reloaded.cohorts, original.cohorts);
        assert_eq!(reloaded.records[2].total_distance, 6.97);
    }
}
