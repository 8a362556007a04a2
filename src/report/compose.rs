use crate::config::DashboardConfig;
use crate::data::model::{Cohort, StudentRecord};
use crate::data::schema::{NumericField, Semester};
use crate::error::ChartError;

use super::aggregate::{self, CohortSummary, Histogram};
use super::normalize::METRICS;
use super::trend::{Projection, TrendProjector, TrendSeries};

const UNKNOWN: &str = "未知";

// ---------------------------------------------------------------------------
// View-model types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct InfoEntry {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub label: &'static str,
    /// Raw value; `None` when the student has no entry.
    pub actual: Option<f64>,
    /// Position on the 0–100 scale.
    pub normalized: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarProfile {
    pub student: Vec<RadarAxis>,
    pub cohort: Option<Vec<RadarAxis>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpaTrend {
    pub projection: Projection,
    /// Cohort mean for each observed period.
    pub cohort: Option<Vec<f64>>,
    /// Level of the "good" reference line.
    pub reference: f64,
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreHistogram {
    pub column: &'static str,
    pub histogram: Histogram,
    /// The selected student's value, if present.
    pub marker: Option<f64>,
}

/// Categorical flags from presence checks on designated fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusFlags {
    pub needs_assistance: bool,
    pub difficulty: Option<String>,
    pub psych_level: String,
    pub hardship: Vec<(&'static str, Option<String>)>,
    pub awards: Vec<(&'static str, Option<String>)>,
}

impl StatusFlags {
    pub fn has_award(&self) -> bool {
        self.awards.iter().any(|(_, v)| v.is_some())
    }
}

/// Everything the UI renders for one selected student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReport {
    pub title: String,
    pub basic_info: Vec<InfoEntry>,
    pub academic_info: Vec<InfoEntry>,
    pub status: StatusFlags,
    pub radar: Result<RadarProfile, ChartError>,
    pub gpa: Result<GpaTrend, ChartError>,
    /// Mean over the semesters the student has a grade point for.
    pub mean_gpa: Option<f64>,
    /// Detailed scores with missing values shown as 0.
    pub scores: Vec<(&'static str, f64)>,
    /// Absent when the snapshot has no total-score column.
    pub histogram: Option<Result<ScoreHistogram, ChartError>>,
    pub summary: CohortSummary,
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Builds a [`StudentReport`] from the loaded cohort.
pub struct ReportComposer<'a> {
    config: &'a DashboardConfig,
    projector: TrendProjector,
}

impl<'a> ReportComposer<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self {
            config,
            projector: TrendProjector::from_config(config),
        }
    }

    /// Report for the record at `index`, or `None` if it is out of range.
    pub fn compose(&self, cohort: &Cohort, index: usize) -> Option<StudentReport> {
        let record = cohort.records.get(index)?;
        let compare = self.config.compare_with_cohort;

        let radar = radar_profile(record, compare.then_some(cohort));
        let gpa = self.gpa_trend(record, compare.then_some(cohort));
        let histogram = self.total_histogram(record, cohort);

        for (chart, err) in [
            ("radar", radar.as_ref().err()),
            ("gpa", gpa.as_ref().err()),
            ("histogram", histogram.as_ref().and_then(|h| h.as_ref().err())),
        ] {
            if let Some(err) = err {
                log::warn!("Chart {chart} unavailable for record {index}: {err}");
            }
        }

        Some(StudentReport {
            title: format!(
                "{} 的综合分析报告",
                record.name.as_deref().unwrap_or("未知学生")
            ),
            basic_info: basic_info(record),
            academic_info: academic_info(record),
            status: status_flags(record),
            radar,
            gpa,
            mean_gpa: aggregate::mean_of(record.gpa),
            scores: METRICS
                .iter()
                .map(|m| (m.label, record.numeric(m.field).unwrap_or(0.0)))
                .collect(),
            histogram,
            summary: CohortSummary::from_cohort(cohort),
        })
    }

    fn gpa_trend(
        &self,
        record: &StudentRecord,
        cohort: Option<&Cohort>,
    ) -> Result<GpaTrend, ChartError> {
        let series = TrendSeries::from_periods(
            Semester::ALL
                .iter()
                .map(|&s| (s.label(), record.numeric(NumericField::Gpa(s)))),
        );
        let projection = self.projector.project(&series);

        let finite = projection.fitted.iter().all(|v| v.is_finite())
            && projection.projected.value.is_finite();
        if !finite {
            return Err(ChartError::NonFinite("学期绩点趋势"));
        }

        let cohort_means = cohort.map(|cohort| {
            projection
                .observed
                .points
                .iter()
                .map(|p| {
                    Semester::ALL
                        .into_iter()
                        .find(|s| s.label() == p.label)
                        .map(NumericField::Gpa)
                        .filter(|&f| cohort.has_field(f))
                        .map(|f| aggregate::mean(cohort, f))
                        .unwrap_or(self.config.default_cohort_gpa)
                })
                .collect()
        });

        Ok(GpaTrend {
            projection,
            cohort: cohort_means,
            reference: self.config.gpa_reference,
            range: self.config.gpa_range,
        })
    }

    fn total_histogram(
        &self,
        record: &StudentRecord,
        cohort: &Cohort,
    ) -> Option<Result<ScoreHistogram, ChartError>> {
        const COLUMN: &str = "测评总分";
        if !cohort.has_field(NumericField::Total) {
            return None;
        }
        let values: Vec<f64> = cohort.values(NumericField::Total).flatten().collect();
        let result = aggregate::histogram(&values, self.config.histogram_bins)
            .map(|histogram| ScoreHistogram {
                column: COLUMN,
                histogram,
                marker: record.scores.total,
            })
            .ok_or(ChartError::NoData(COLUMN));
        Some(result)
    }
}

fn radar_profile(
    record: &StudentRecord,
    cohort: Option<&Cohort>,
) -> Result<RadarProfile, ChartError> {
    let student: Vec<RadarAxis> = METRICS
        .iter()
        .map(|m| {
            let actual = record.numeric(m.field);
            RadarAxis { label: m.label, actual, normalized: m.normalize(actual) }
        })
        .collect();

    let cohort = cohort.map(|cohort| {
        METRICS
            .iter()
            .map(|m| {
                // Columns absent from the snapshot contribute 0.
                let mean = if cohort.has_field(m.field) {
                    aggregate::mean(cohort, m.field)
                } else {
                    0.0
                };
                RadarAxis {
                    label: m.label,
                    actual: Some(mean),
                    normalized: m.normalize(Some(mean)),
                }
            })
            .collect::<Vec<_>>()
    });

    let all_finite = student
        .iter()
        .chain(cohort.iter().flatten())
        .all(|a| a.normalized.is_finite());
    if !all_finite {
        return Err(ChartError::NonFinite("综合素质雷达图"));
    }

    Ok(RadarProfile { student, cohort })
}

fn entry(label: &'static str, value: &Option<String>) -> InfoEntry {
    InfoEntry {
        label,
        value: value.clone().unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

fn basic_info(record: &StudentRecord) -> Vec<InfoEntry> {
    vec![
        entry("姓名", &record.name),
        entry("学号", &record.student_id),
        entry("班级", &record.class_name),
        entry("性别", &record.gender),
    ]
}

fn academic_info(record: &StudentRecord) -> Vec<InfoEntry> {
    vec![
        entry("专业", &record.major),
        entry("辅导员", &record.counselor),
        entry("政治面貌", &record.political_status),
        entry("民族", &record.ethnicity),
    ]
}

fn status_flags(record: &StudentRecord) -> StatusFlags {
    let needs_assistance = record.needs_assistance();
    StatusFlags {
        needs_assistance,
        difficulty: needs_assistance.then(|| record.difficulty.clone()).flatten(),
        psych_level: record
            .psych_level
            .clone()
            .unwrap_or_else(|| "未评估".to_string()),
        hardship: vec![
            ("第一学年困难等级", record.hardship_year1.clone()),
            ("第二学年困难等级", record.hardship_year2.clone()),
            ("困难保障人群", record.hardship_group.clone()),
        ],
        awards: vec![
            ("人民奖学金", record.scholarship.clone()),
            ("助学金", record.grant.clone()),
            ("获得奖项", record.awards.clone()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::{CellValue, RawTable};
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn small_cohort() -> Cohort {
        let headers = [
            "学号",
            "姓名",
            "德育",
            "测评总分",
            "第一学期绩点",
            "第二学期绩点",
            "有无需要学院协助解决的困难",
            "有何困难",
            "人民奖学金",
        ];
        let rows = vec![
            vec![
                text("S001"),
                text("张三"),
                CellValue::Float(15.0),
                CellValue::Float(80.0),
                CellValue::Float(3.0),
                CellValue::Float(3.5),
                text("无"),
                text("无"),
                text("一等"),
            ],
            vec![
                text("S002"),
                text("李四"),
                CellValue::Float(12.0),
                CellValue::Float(110.0),
                CellValue::Null,
                text("缺考"),
                text("经济困难"),
                text("家庭收入低"),
                CellValue::Null,
            ],
        ];
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Cohort::from_table(RawTable::new(headers, rows))
    }

    #[test]
    fn radar_compares_student_with_cohort_mean() {
        let config = DashboardConfig::default();
        let report = ReportComposer::new(&config).compose(&small_cohort(), 0).unwrap();
        let radar = report.radar.unwrap();

        assert_eq!(radar.student[0].label, "德育");
        assert_eq!(radar.student[0].normalized, 100.0);
        // 智育 column is absent: student 0, cohort 0
        assert_eq!(radar.student[1].actual, None);
        assert_eq!(radar.student[1].normalized, 0.0);

        let cohort = radar.cohort.unwrap();
        assert_eq!(cohort[0].actual, Some(13.5));
        assert_eq!(cohort[0].normalized, 50.0);
        assert_eq!(cohort[1].actual, Some(0.0));
        assert_eq!(cohort[4].actual, Some(95.0));
    }

    #[test]
    fn cohort_overlay_can_be_disabled() {
        let config = DashboardConfig { compare_with_cohort: false, ..Default::default() };
        let report = ReportComposer::new(&config).compose(&small_cohort(), 0).unwrap();
        assert_eq!(report.radar.unwrap().cohort, None);
        assert_eq!(report.gpa.unwrap().cohort, None);
    }

    #[test]
    fn gpa_trend_uses_observed_periods_and_cohort_defaults() {
        let config = DashboardConfig::default();
        let report = ReportComposer::new(&config).compose(&small_cohort(), 0).unwrap();
        let gpa = report.gpa.unwrap();

        assert!(!gpa.projection.placeholder);
        let labels: Vec<&str> = gpa
            .projection
            .observed
            .points
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(labels, vec!["第一学期", "第二学期"]);
        // 第二学期 only has one numeric entry across the cohort
        assert_eq!(gpa.cohort, Some(vec![3.0, 3.5]));
        assert_eq!(report.mean_gpa, Some(3.25));
    }

    #[test]
    fn student_without_grade_points_gets_placeholder_trend() {
        let config = DashboardConfig::default();
        let report = ReportComposer::new(&config).compose(&small_cohort(), 1).unwrap();
        let gpa = report.gpa.unwrap();

        assert!(gpa.projection.placeholder);
        assert_eq!(gpa.projection.observed.values(), vec![3.2, 3.5, 3.1]);
        // 第三学期 column is absent: configured default
        assert_eq!(gpa.cohort, Some(vec![3.0, 3.5, 3.0]));
        assert_eq!(report.mean_gpa, None);
    }

    #[test]
    fn status_flags_follow_presence_checks() {
        let config = DashboardConfig::default();
        let composer = ReportComposer::new(&config);
        let cohort = small_cohort();

        let first = composer.compose(&cohort, 0).unwrap();
        assert!(!first.status.needs_assistance);
        assert_eq!(first.status.difficulty, None);
        assert!(first.status.has_award());
        assert_eq!(first.status.psych_level, "未评估");

        let second = composer.compose(&cohort, 1).unwrap();
        assert!(second.status.needs_assistance);
        assert_eq!(second.status.difficulty.as_deref(), Some("家庭收入低"));
        assert!(!second.status.has_award());

        assert_eq!(
            second.summary,
            CohortSummary {
                total: 2,
                needs_assistance: 1,
                award_holders: 1,
            }
        );
        assert_eq!(second.basic_info[2], InfoEntry { label: "班级", value: "未知".into() });
    }

    #[test]
    fn out_of_range_index_has_no_report() {
        let config = DashboardConfig::default();
        assert!(ReportComposer::new(&config).compose(&small_cohort(), 5).is_none());
    }

    #[test]
    fn histogram_is_skipped_without_total_column() {
        let config = DashboardConfig::default();
        let table = RawTable::new(vec!["姓名".into()], vec![vec![text("张三")]]);
        let cohort = Cohort::from_table(table);
        let report = ReportComposer::new(&config).compose(&cohort, 0).unwrap();
        assert_eq!(report.histogram, None);
    }

    #[test]
    fn histogram_without_numeric_totals_is_a_chart_error() {
        let config = DashboardConfig::default();
        let table = RawTable::new(vec!["测评总分".into()], vec![vec![text("缺考")]]);
        let cohort = Cohort::from_table(table);
        let report = ReportComposer::new(&config).compose(&cohort, 0).unwrap();
        assert_eq!(report.histogram, Some(Err(ChartError::NoData("测评总分"))));
        // other charts are unaffected
        assert!(report.radar.is_ok());
    }

    #[test]
    fn uploaded_workbook_marks_selected_total_on_histogram() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("class.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "学号").unwrap();
        sheet.write_string(0, 1, "测评总分").unwrap();
        sheet.write_string(0, 2, "有无需要学院协助解决的困难").unwrap();
        let totals = [72.0, 85.0, 91.5, 66.0, 78.0, 88.0, 95.0, 70.5, 81.0, 59.0];
        for (i, total) in totals.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, &format!("S{:03}", i)).unwrap();
            sheet.write_number(row, 1, *total).unwrap();
        }
        // S001 holds 85; S000 states "无", S003 asks for help
        sheet.write_string(1, 2, "无").unwrap();
        sheet.write_string(4, 2, "学业困难").unwrap();
        workbook.save(&path).unwrap();

        let cohort = load_file(&path).unwrap();
        assert_eq!(cohort.len(), 10);
        let index = cohort
            .records
            .iter()
            .position(|r| r.student_id.as_deref() == Some("S001"))
            .unwrap();

        let config = DashboardConfig::default();
        let report = ReportComposer::new(&config).compose(&cohort, index).unwrap();
        let hist = report.histogram.unwrap().unwrap();

        let bucketed: usize = hist.histogram.buckets.iter().map(|b| b.count).sum();
        assert_eq!(bucketed, 10);
        assert_eq!(hist.histogram.buckets.len(), config.histogram_bins);
        assert_eq!(hist.marker, Some(85.0));
        assert!(hist
            .histogram
            .buckets
            .iter()
            .any(|b| b.start <= 85.0 && 85.0 <= b.end && b.count > 0));

        assert!(!cohort.records[0].needs_assistance());
        assert!(cohort.records[3].needs_assistance());
        assert_eq!(report.summary.needs_assistance, 1);
    }
}
