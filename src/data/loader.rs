use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Cohort, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a class snapshot from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first sheet, header row first (recommended)
/// * `.csv`     – header row, one student per line
/// * `.json`    – `[{ "姓名": "...", "测评总分": 85, ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<Cohort> {
    let table = load_table(path)?;
    log::debug!("Read {} rows with columns {:?}", table.rows.len(), table.columns);
    Ok(Cohort::from_table(table))
}

/// Read the untyped table without building records.
pub fn load_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Only the first worksheet is read; its first row names the fields.
fn load_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("First worksheet is empty");
    };
    let headers: Vec<String> = header_row.iter().map(|c| c.to_string()).collect();

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(spreadsheet_to_cell).collect())
        .filter(|row: &Vec<CellValue>| row.iter().any(|c| *c != CellValue::Null))
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn spreadsheet_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Null,
        // Typed cells keep their type; "007" stays text.
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Date(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, one student per line.
/// Ragged lines are tolerated; missing trailing cells read as null.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Type an untyped CSV field.
fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "学号": "S001", "姓名": "张三", "测评总分": 85 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).  Nested columns are rendered as text.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell_value(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable::new(headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| CellValue::Text(s.value(row).to_string())),
        DataType::LargeUtf8 => Some(CellValue::Text(
            col.as_string::<i64>().value(row).to_string(),
        )),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(i64::from(a.value(row)))),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(f64::from(a.value(row)))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    value.unwrap_or_else(|| {
        let text = arrow::util::display::array_value_to_string(col, row)
            .unwrap_or_else(|_| format!("{:?}", col.data_type()));
        CellValue::Text(text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::NumericField;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_coercion_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "class.csv",
            "学号,姓名,测评总分,第一学期绩点,有无需要学院协助解决的困难\n\
             S001,张三,85,3.4,无\n\
             S002,李四,缺考,,经济困难\n",
        );

        let cohort = load_file(&path).unwrap();
        assert_eq!(cohort.len(), 2);
        assert_eq!(cohort.records[0].student_id.as_deref(), Some("S001"));
        assert_eq!(cohort.records[0].scores.total, Some(85.0));
        assert_eq!(cohort.records[1].scores.total, None);
        assert_eq!(cohort.records[1].gpa[0], None);
        assert!(!cohort.records[0].needs_assistance());
        assert!(cohort.records[1].needs_assistance());
        assert!(cohort.has_field(NumericField::Total));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "class.json",
            r#"[
                {"学号": "S001", "德育": 13.5},
                {"学号": 2021002, "德育": "14"},
                {"学号": "007"}
            ]"#,
        );

        let cohort = load_file(&path).unwrap();
        assert_eq!(cohort.records[2].student_id.as_deref(), Some("007"));
        assert_eq!(cohort.records[1].student_id.as_deref(), Some("2021002"));
        assert_eq!(cohort.records[1].scores.moral, Some(14.0));
    }

    #[test]
    fn loads_first_sheet_of_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("class.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "学号").unwrap();
        sheet.write_string(0, 1, "助学金").unwrap();
        sheet.write_string(0, 2, "助学金").unwrap();
        sheet.write_string(0, 3, "智育").unwrap();
        sheet.write_string(1, 0, "S001").unwrap();
        sheet.write_string(1, 2, "二等").unwrap();
        sheet.write_number(1, 3, 78.5).unwrap();
        workbook.save(&path).unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns, vec!["学号", "助学金", "助学金.1", "智育"]);

        let cohort = Cohort::from_table(table);
        // "助学金" exists, so the renamed duplicate is not consulted.
        assert_eq!(cohort.records[0].grant, None);
        assert_eq!(cohort.records[0].scores.intellectual, Some(78.5));
    }

    #[test]
    fn workbook_text_cells_are_not_reparsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "学号").unwrap();
        sheet.write_string(0, 1, "测评总分").unwrap();
        sheet.write_string(1, 0, "007").unwrap();
        sheet.write_string(1, 1, "85").unwrap();
        workbook.save(&path).unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows[0][0], CellValue::Text("007".into()));

        let cohort = Cohort::from_table(table);
        assert_eq!(cohort.records[0].student_id.as_deref(), Some("007"));
        // Numeric fields still coerce text.
        assert_eq!(cohort.records[0].scores.total, Some(85.0));
        assert_eq!(crate::data::filter::filtered_indices(&cohort, "007"), vec![0]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("class.txt")).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn unreadable_workbook_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "broken.xlsx", "not a zip archive");
        assert!(load_file(&path).is_err());
    }
}
