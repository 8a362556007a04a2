use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::filtered_indices;
use crate::data::model::{Cohort, StudentRecord};
use crate::report::compose::{ReportComposer, StudentReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Info,
    Academic,
    Evaluation,
    Overview,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Info, Tab::Academic, Tab::Evaluation, Tab::Overview];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Info => "📋 基本信息",
            Tab::Academic => "📈 学业分析",
            Tab::Evaluation => "🎯 综合评价",
            Tab::Overview => "📊 数据概览",
        }
    }
}

/// The full UI state, independent of rendering.
///
/// Every handler recomputes `report` from the loaded snapshot, so the UI only
/// ever reads a finished view-model.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded snapshot (None until the user opens a file).
    pub cohort: Option<Cohort>,

    /// File the snapshot came from.
    pub source: Option<PathBuf>,

    /// Current search term.
    pub search: String,

    /// Indices of records passing the search (cached).
    pub visible_indices: Vec<usize>,

    /// Position of the selected record within `visible_indices`.
    pub cursor: usize,

    pub tab: Tab,

    /// View-model for the selected record.
    pub report: Option<StudentReport>,

    /// Colours for psychological levels of the loaded cohort.
    pub psych_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cohort: None,
            source: None,
            search: String::new(),
            visible_indices: Vec::new(),
            cursor: 0,
            tab: Tab::default(),
            report: None,
            psych_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load a snapshot from disk. On failure the previous snapshot stays.
    pub fn open(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(cohort) => {
                log::info!(
                    "Loaded {} students from {} with columns {:?}",
                    cohort.len(),
                    path.display(),
                    cohort.column_names
                );
                self.set_cohort(cohort, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("文件读取错误: {e:#}"));
            }
        }
    }

    /// Replace the snapshot wholesale and select the first student.
    pub fn set_cohort(&mut self, cohort: Cohort, source: Option<PathBuf>) {
        self.psych_colors = ColorMap::new(
            cohort
                .records
                .iter()
                .filter_map(|r| r.psych_level.as_deref()),
        );
        self.visible_indices = filtered_indices(&cohort, &self.search);
        self.cursor = 0;
        self.status_message = None;
        self.source = source;
        self.cohort = Some(cohort);
        self.refresh_report();
    }

    /// Apply a new search term and select the first match.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        if let Some(cohort) = &self.cohort {
            self.visible_indices = filtered_indices(cohort, &self.search);
        }
        self.cursor = 0;
        self.refresh_report();
    }

    /// Select the record at `position` within the visible list.
    pub fn select(&mut self, position: usize) {
        if position < self.visible_indices.len() {
            self.cursor = position;
            self.refresh_report();
        }
    }

    pub fn can_select_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_select_next(&self) -> bool {
        self.cursor + 1 < self.visible_indices.len()
    }

    pub fn select_previous(&mut self) {
        if self.can_select_previous() {
            self.select(self.cursor - 1);
        }
    }

    pub fn select_next(&mut self) {
        if self.can_select_next() {
            self.select(self.cursor + 1);
        }
    }

    pub fn set_compare_with_cohort(&mut self, enabled: bool) {
        self.config.compare_with_cohort = enabled;
        self.refresh_report();
    }

    pub fn selected_record(&self) -> Option<&StudentRecord> {
        let index = *self.visible_indices.get(self.cursor)?;
        self.cohort.as_ref()?.records.get(index)
    }

    /// Rebuild the view-model for the current selection.
    fn refresh_report(&mut self) {
        self.report = match (&self.cohort, self.visible_indices.get(self.cursor)) {
            (Some(cohort), Some(&index)) => {
                ReportComposer::new(&self.config).compose(cohort, index)
            }
            _ => None,
        };
    }
}
