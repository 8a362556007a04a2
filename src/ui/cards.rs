use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::{self, ColorMap};
use crate::report::compose::{InfoEntry, StatusFlags, StudentReport};

// ---------------------------------------------------------------------------
// Info tab – profile and status cards
// ---------------------------------------------------------------------------

/// Two-column layout: identity and assistance on the left, hardship and
/// awards on the right.
pub fn info_tab(ui: &mut Ui, report: &StudentReport, psych_colors: &ColorMap) {
    ui.columns(2, |cols: &mut [Ui]| {
        info_block(&mut cols[0], "📋 基本信息", &report.basic_info);
        cols[0].add_space(8.0);
        info_block(&mut cols[0], "🎓 学籍信息", &report.academic_info);
        cols[0].separator();
        help_status(&mut cols[0], &report.status, psych_colors);

        hardship_block(&mut cols[1], &report.status);
        cols[1].separator();
        awards_block(&mut cols[1], &report.status);
    });
}

fn info_block(ui: &mut Ui, title: &str, entries: &[InfoEntry]) {
    ui.heading(title);
    egui::Grid::new(title)
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for entry in entries {
                ui.strong(entry.label);
                ui.label(&entry.value);
                ui.end_row();
            }
        });
}

fn card(ui: &mut Ui, fill: Color32, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::default()
        .fill(fill)
        .inner_margin(10.0)
        .corner_radius(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

fn help_status(ui: &mut Ui, status: &StatusFlags, psych_colors: &ColorMap) {
    if status.needs_assistance {
        card(ui, color::HELP_NEEDED_BG, |ui: &mut Ui| {
            ui.label(
                RichText::new("🚨 此学生需要帮助")
                    .strong()
                    .color(color::HELP_NEEDED_FG),
            );
        });
        if let Some(detail) = &status.difficulty {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.strong("困难详情:");
                ui.label(detail);
            });
        }
    } else {
        card(ui, color::NO_HELP_BG, |ui: &mut Ui| {
            ui.label(
                RichText::new("✅ 此学生无需特殊帮助")
                    .strong()
                    .color(color::NO_HELP_FG),
            );
        });
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("心理状态:");
        ui.label(
            RichText::new(&status.psych_level).color(psych_colors.color_for(&status.psych_level)),
        );
    });
}

fn hardship_block(ui: &mut Ui, status: &StatusFlags) {
    ui.heading("💝 贫困资助信息");
    for (label, value) in &status.hardship {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(format!("{label}:"));
            ui.label(value.as_deref().unwrap_or("无"));
        });
    }
}

fn awards_block(ui: &mut Ui, status: &StatusFlags) {
    ui.heading("🏆 奖学金获得情况");
    for (label, value) in &status.awards {
        match value {
            Some(value) => card(ui, color::AWARD_BG, |ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("🎖️ {label}: {value}"))
                        .strong()
                        .color(Color32::BLACK),
                );
            }),
            None => {
                ui.horizontal(|ui: &mut Ui| {
                    ui.strong(format!("{label}:"));
                    ui.label("无");
                });
            }
        }
    }
    if !status.has_award() {
        ui.label(RichText::new("该学生暂未获得相关奖学金").italics());
    }
}

// ---------------------------------------------------------------------------
// Metric rows
// ---------------------------------------------------------------------------

/// A row of labelled numbers, like a dashboard metric strip.
pub fn metric_row(ui: &mut Ui, metrics: &[(&str, String)]) {
    if metrics.is_empty() {
        return;
    }
    ui.columns(metrics.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(metrics) {
            col.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(*label).small());
                ui.label(RichText::new(value).size(22.0).strong());
            });
        }
    });
}
