use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::schema::{NumericField, Semester, TextField, NO_DIFFICULTY};

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what spreadsheet readers yield.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date or time cells kept as text.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Spreadsheets store ids and counts as floats; print those bare.
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Best-effort numeric coercion. Anything that is not a finite number
    /// counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Date(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Display text, or `None` for cells that hold no entry: null, blank
    /// text, NaN and numeric zero.
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Float(v) if v.is_nan() || *v == 0.0 => None,
            CellValue::Integer(0) | CellValue::Bool(false) => None,
            other => Some(other.to_string()),
        }
    }

    /// Cell text kept verbatim. Only null, blank text and NaN are missing;
    /// zero and `false` are real entries here.
    pub fn raw_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Float(v) if v.is_nan() => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the untyped first sheet
// ---------------------------------------------------------------------------

/// Header row plus data rows, as read from the snapshot file.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table, renaming repeated headers to `name.1`, `name.2`, ...
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let mut columns = Vec::with_capacity(headers.len());
        for header in headers {
            let header = header.trim().to_string();
            let count = seen.entry(header.clone()).or_insert(0);
            if *count == 0 {
                columns.push(header);
            } else {
                columns.push(format!("{header}.{count}"));
            }
            *count += 1;
        }
        RawTable { columns, rows }
    }

    /// Index of the first candidate column present in the header row.
    pub fn resolve(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|name| self.columns.iter().position(|c| c == name))
    }
}

// ---------------------------------------------------------------------------
// StudentRecord – one typed row
// ---------------------------------------------------------------------------

/// The five comprehensive-evaluation scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scores {
    pub moral: Option<f64>,
    pub intellectual: Option<f64>,
    pub fitness: Option<f64>,
    pub bonus: Option<f64>,
    pub total: Option<f64>,
}

/// One student, validated and coerced once at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentRecord {
    pub name: Option<String>,
    pub student_id: Option<String>,
    pub class_name: Option<String>,
    pub gender: Option<String>,
    pub major: Option<String>,
    pub counselor: Option<String>,
    pub political_status: Option<String>,
    pub ethnicity: Option<String>,

    pub scores: Scores,
    /// Grade points, indexed like [`Semester::ALL`].
    pub gpa: [Option<f64>; 3],

    pub assistance: Option<String>,
    pub difficulty: Option<String>,
    pub psych_level: Option<String>,

    pub hardship_year1: Option<String>,
    pub hardship_year2: Option<String>,
    pub hardship_group: Option<String>,

    pub scholarship: Option<String>,
    pub grant: Option<String>,
    pub awards: Option<String>,
}

/// Column positions resolved once per table.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    numeric: BTreeMap<NumericField, usize>,
    text: BTreeMap<TextField, usize>,
}

impl ColumnIndex {
    pub fn resolve(table: &RawTable) -> Self {
        let numeric = NumericField::ALL
            .iter()
            .filter_map(|&f| table.resolve(f.columns()).map(|i| (f, i)))
            .collect();
        let text = TextField::ALL
            .iter()
            .filter_map(|&f| table.resolve(f.columns()).map(|i| (f, i)))
            .collect();
        ColumnIndex { numeric, text }
    }

    pub fn has_numeric(&self, field: NumericField) -> bool {
        self.numeric.contains_key(&field)
    }
}

impl StudentRecord {
    /// Build a record from one table row; absent or malformed cells become `None`.
    pub fn from_row(index: &ColumnIndex, row: &[CellValue]) -> Self {
        let num = |field: NumericField| {
            index
                .numeric
                .get(&field)
                .and_then(|&i| row.get(i))
                .and_then(CellValue::as_f64)
        };
        let text = |field: TextField| {
            index
                .text
                .get(&field)
                .and_then(|&i| row.get(i))
                .and_then(CellValue::label)
        };
        let raw = |field: TextField| {
            index
                .text
                .get(&field)
                .and_then(|&i| row.get(i))
                .and_then(CellValue::raw_text)
        };

        StudentRecord {
            name: text(TextField::Name),
            student_id: text(TextField::StudentId),
            class_name: text(TextField::Class),
            gender: text(TextField::Gender),
            major: text(TextField::Major),
            counselor: text(TextField::Counselor),
            political_status: text(TextField::PoliticalStatus),
            ethnicity: text(TextField::Ethnicity),
            scores: Scores {
                moral: num(NumericField::Moral),
                intellectual: num(NumericField::Intellectual),
                fitness: num(NumericField::Fitness),
                bonus: num(NumericField::Bonus),
                total: num(NumericField::Total),
            },
            gpa: Semester::ALL.map(|s| num(NumericField::Gpa(s))),
            assistance: raw(TextField::Assistance),
            difficulty: text(TextField::Difficulty),
            psych_level: text(TextField::PsychLevel),
            hardship_year1: text(TextField::HardshipYear1),
            hardship_year2: text(TextField::HardshipYear2),
            hardship_group: text(TextField::HardshipGroup),
            scholarship: text(TextField::Scholarship),
            grant: text(TextField::Grant),
            awards: text(TextField::Awards),
        }
    }

    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Moral => self.scores.moral,
            NumericField::Intellectual => self.scores.intellectual,
            NumericField::Fitness => self.scores.fitness,
            NumericField::Bonus => self.scores.bonus,
            NumericField::Total => self.scores.total,
            NumericField::Gpa(s) => self.gpa[s as usize],
        }
    }

    /// Anything other than the literal "无" in the assistance column.
    pub fn needs_assistance(&self) -> bool {
        self.assistance
            .as_deref()
            .is_some_and(|v| v != NO_DIFFICULTY)
    }

    /// Holds a people's scholarship or a grant.
    pub fn has_scholarship_or_grant(&self) -> bool {
        self.scholarship.is_some() || self.grant.is_some()
    }

    /// "name - id - class", as shown in the student picker.
    pub fn picker_label(&self) -> String {
        format!(
            "{} - {} - {}",
            self.name.as_deref().unwrap_or("未知"),
            self.student_id.as_deref().unwrap_or("未知"),
            self.class_name.as_deref().unwrap_or("未知"),
        )
    }
}

// ---------------------------------------------------------------------------
// Cohort – the complete loaded snapshot
// ---------------------------------------------------------------------------

/// All students of one snapshot plus the numeric columns it carried.
#[derive(Debug, Clone, Default)]
pub struct Cohort {
    pub records: Vec<StudentRecord>,
    /// Header row after de-duplication.
    pub column_names: Vec<String>,
    numeric_fields: BTreeSet<NumericField>,
}

impl Cohort {
    pub fn from_table(table: RawTable) -> Self {
        let index = ColumnIndex::resolve(&table);
        let records = table
            .rows
            .iter()
            .map(|row| StudentRecord::from_row(&index, row))
            .collect();
        let numeric_fields = NumericField::ALL
            .into_iter()
            .filter(|&f| index.has_numeric(f))
            .collect();
        Cohort {
            records,
            column_names: table.columns,
            numeric_fields,
        }
    }

    /// Whether the snapshot had a column for `field`.
    pub fn has_field(&self, field: NumericField) -> bool {
        self.numeric_fields.contains(&field)
    }

    /// Coerced values of one column, missing entries included as `None`.
    pub fn values(&self, field: NumericField) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(move |r| r.numeric(field))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn numeric_coercion_ignores_non_numbers() {
        assert_eq!(text(" 85.5 ").as_f64(), Some(85.5));
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(text("缺考").as_f64(), None);
        assert_eq!(text("NaN").as_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn labels_skip_empty_entries() {
        assert_eq!(CellValue::Float(2021001.0).label().as_deref(), Some("2021001"));
        assert_eq!(text("  ").label(), None);
        assert_eq!(CellValue::Float(0.0).label(), None);
        assert_eq!(CellValue::Null.label(), None);
        assert_eq!(text("一等").label().as_deref(), Some("一等"));
    }

    #[test]
    fn duplicate_headers_are_numbered() {
        let table = RawTable::new(
            vec!["助学金".into(), "姓名".into(), "助学金".into(), "助学金".into()],
            Vec::new(),
        );
        assert_eq!(table.columns, vec!["助学金", "姓名", "助学金.1", "助学金.2"]);
    }

    #[test]
    fn fallback_columns_are_resolved_per_table() {
        let table = RawTable::new(
            vec!["姓名".into(), "23-24附加分".into(), "原专业".into(), "助学金.1".into()],
            vec![vec![text("张三"), CellValue::Float(2.5), text("计算机"), text("二等")]],
        );
        let cohort = Cohort::from_table(table);
        let record = &cohort.records[0];
        assert_eq!(record.scores.bonus, Some(2.5));
        assert_eq!(record.major.as_deref(), Some("计算机"));
        assert_eq!(record.grant.as_deref(), Some("二等"));
        assert!(cohort.has_field(NumericField::Bonus));
        assert!(!cohort.has_field(NumericField::Total));
    }

    #[test]
    fn short_rows_default_to_missing() {
        let table = RawTable::new(
            vec!["姓名".into(), "测评总分".into()],
            vec![vec![text("李四")]],
        );
        let cohort = Cohort::from_table(table);
        assert_eq!(cohort.records[0].scores.total, None);
        assert_eq!(cohort.records[0].name.as_deref(), Some("李四"));
    }

    #[test]
    fn assistance_literal_none_means_no_help() {
        let mut record = StudentRecord {
            assistance: Some("无".into()),
            ..Default::default()
        };
        assert!(!record.needs_assistance());
        record.assistance = Some("经济困难".into());
        assert!(record.needs_assistance());
        record.assistance = None;
        assert!(!record.needs_assistance());
    }

    #[test]
    fn assistance_column_keeps_zero_and_false_entries() {
        let table = RawTable::new(
            vec!["学号".into(), "有无需要学院协助解决的困难".into()],
            vec![
                vec![text("S001"), CellValue::Integer(0)],
                vec![text("S002"), CellValue::Bool(false)],
                vec![text("S003"), CellValue::Float(0.0)],
                vec![text("S004"), text(" 无 ")],
                vec![text("S005"), text("无")],
                vec![text("S006"), text("  ")],
                vec![text("S007"), CellValue::Float(f64::NAN)],
                vec![text("S008"), CellValue::Null],
            ],
        );
        let cohort = Cohort::from_table(table);
        let flags: Vec<bool> = cohort.records.iter().map(|r| r.needs_assistance()).collect();
        assert_eq!(
            flags,
            vec![true, true, true, true, false, false, false, false]
        );
        assert_eq!(cohort.records[1].assistance.as_deref(), Some("false"));
    }

    #[test]
    fn picker_label_defaults_unknown_parts() {
        let record = StudentRecord {
            name: Some("王五".into()),
            ..Default::default()
        };
        assert_eq!(record.picker_label(), "王五 - 未知 - 未知");
    }
}
