use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::report::aggregate::mean_of;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Cohort table (overview tab)
// ---------------------------------------------------------------------------

const HEADERS: [&str; 6] = ["学号", "姓名", "班级", "测评总分", "平均绩点", "需要帮助"];

/// Visible students, one per row. Clicking a row selects that student.
pub fn cohort_table(ui: &mut Ui, state: &mut AppState) {
    let Some(cohort) = &state.cohort else {
        return;
    };

    let mut clicked = None;
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .sense(eframe::egui::Sense::click())
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(90.0))
        .columns(Column::auto().at_least(70.0), 2)
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, state.visible_indices.len(), |mut row| {
                let pos = row.index();
                let record = &cohort.records[state.visible_indices[pos]];
                row.set_selected(pos == state.cursor);

                let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
                row.col(|ui: &mut Ui| {
                    ui.label(or_dash(&record.student_id));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(or_dash(&record.name));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(or_dash(&record.class_name));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.scores.total.map_or("-".into(), |v| format!("{v}")));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(mean_of(record.gpa).map_or("-".into(), |v| format!("{v:.2}")));
                });
                row.col(|ui: &mut Ui| {
                    if record.needs_assistance() {
                        ui.label(RichText::new("是").color(Color32::RED));
                    } else {
                        ui.label("否");
                    }
                });

                if row.response().clicked() {
                    clicked = Some(pos);
                }
            });
        });

    if let Some(pos) = clicked {
        state.select(pos);
    }
}
