pub mod cards;
pub mod fonts;
pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::{self, RichText, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Central panel: report for the selected student
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.cohort.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("🎓 学生数据分析系统\n\n👆 请在左侧上传Excel文件开始分析");
        });
        return;
    }

    let Some(report) = state.report.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("没有找到匹配的学生数据");
        });
        return;
    };

    ui.heading(format!("📊 {}", report.title));
    panels::tab_bar(ui, state);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Info => cards::info_tab(ui, &report, &state.psych_colors),
            Tab::Academic => {
                match &report.gpa {
                    Ok(trend) => plot::gpa_chart(ui, trend),
                    Err(err) => plot::chart_error(ui, "绩点图表", err),
                }
                if let Some(mean) = report.mean_gpa {
                    cards::metric_row(ui, &[("平均绩点", format!("{mean:.2}"))]);
                }
            }
            Tab::Evaluation => {
                match &report.radar {
                    Ok(profile) => {
                        ui.strong("综合素质雷达图");
                        plot::radar_chart(ui, profile);
                    }
                    Err(err) => plot::chart_error(ui, "雷达图表", err),
                }
                ui.separator();
                ui.label(RichText::new("📊 详细评分").strong());
                let metrics: Vec<(&str, String)> = report
                    .scores
                    .iter()
                    .map(|(label, value)| (*label, format!("{value}")))
                    .collect();
                cards::metric_row(ui, &metrics);
            }
            Tab::Overview => {
                ui.heading("📈 全班数据概览");
                match &report.histogram {
                    Some(Ok(hist)) => plot::score_histogram(ui, hist),
                    Some(Err(err)) => plot::chart_error(ui, "分布直方图", err),
                    None => {}
                }
                let summary = report.summary;
                cards::metric_row(
                    ui,
                    &[
                        ("总学生数", summary.total.to_string()),
                        ("需要帮助学生", summary.needs_assistance.to_string()),
                        ("获奖学生", summary.award_holders.to_string()),
                    ],
                );
                ui.separator();
                table::cohort_table(ui, state);
            }
        });
}
