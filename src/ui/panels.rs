use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – search and student selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📁 数据上传");
    if ui.button("选择Excel文件…").clicked() {
        open_file_dialog(state);
    }
    if let Some(source) = &state.source {
        if let Some(name) = source.file_name() {
            ui.small(name.to_string_lossy().into_owned());
        }
    }
    ui.separator();

    if state.cohort.is_none() {
        ui.label("👆 请先上传Excel文件开始分析");
        return;
    }

    ui.heading("👥 学生选择");

    let mut term = state.search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut term).hint_text("🔍 输入姓名、学号或班级"),
    );
    if response.changed() {
        state.set_search(&term);
        return;
    }

    if state.visible_indices.is_empty() {
        ui.label(
            RichText::new("没有找到匹配的学生数据").color(Color32::from_rgb(217, 119, 6)),
        );
        return;
    }

    let Some(cohort) = &state.cohort else {
        return;
    };
    // Labels are built up front so the click can mutate state afterwards.
    let labels: Vec<String> = state
        .visible_indices
        .iter()
        .map(|&i| cohort.records[i].picker_label())
        .collect();

    let mut picked = None;
    egui::ComboBox::from_id_salt("student_picker")
        .width(ui.available_width())
        .selected_text(labels[state.cursor].as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for (pos, label) in labels.iter().enumerate() {
                if ui.selectable_label(pos == state.cursor, label).clicked() {
                    picked = Some(pos);
                }
            }
        });
    if let Some(pos) = picked {
        state.select(pos);
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(state.can_select_previous(), egui::Button::new("⬅️ 上一个"))
            .clicked()
        {
            state.select_previous();
        }
        if ui
            .add_enabled(state.can_select_next(), egui::Button::new("➡️ 下一个"))
            .clicked()
        {
            state.select_next();
        }
    });

    ui.label(format!(
        "{} / {}",
        state.cursor + 1,
        state.visible_indices.len()
    ));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("文件", |ui: &mut Ui| {
            if ui.button("打开…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(cohort) = &state.cohort {
            ui.label(
                RichText::new(format!("✅ 成功加载 {} 名学生的数据", cohort.len()))
                    .color(Color32::from_rgb(22, 163, 74)),
            );
            ui.separator();
        }

        let mut compare = state.config.compare_with_cohort;
        if ui.checkbox(&mut compare, "对比班级平均").changed() {
            state.set_compare_with_cohort(compare);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Tab strip
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
    ui.separator();
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("选择学生数据文件")
        .add_filter("Supported files", &["xlsx", "xls", "xlsm", "ods", "csv", "json", "parquet"])
        .add_filter("Excel", &["xlsx", "xls", "xlsm"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
