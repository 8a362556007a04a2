use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text, VLine,
};

use crate::color;
use crate::error::ChartError;
use crate::report::compose::{GpaTrend, RadarAxis, RadarProfile, ScoreHistogram};

/// Inline replacement for a chart that could not be built.
pub fn chart_error(ui: &mut Ui, title: &str, err: &ChartError) {
    ui.label(RichText::new(format!("绘制{title}时出错: {err}")).color(Color32::RED));
}

// ---------------------------------------------------------------------------
// Radar chart
// ---------------------------------------------------------------------------

const RING_STEP: f64 = 20.0;

/// Cartesian position of radius `r` on spoke `i` of `n`, first spoke on top.
fn polar(i: usize, n: usize, r: f64) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
    [r * angle.cos(), r * angle.sin()]
}

fn ring(axes: &[RadarAxis]) -> Vec<[f64; 2]> {
    axes.iter()
        .enumerate()
        .map(|(i, a)| polar(i, axes.len(), a.normalized))
        .collect()
}

pub fn radar_chart(ui: &mut Ui, profile: &RadarProfile) {
    let n = profile.student.len();
    if n == 0 {
        return;
    }

    Plot::new("radar_chart")
        .legend(Legend::default())
        .data_aspect(1.0)
        .height(420.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-130.0)
        .include_x(130.0)
        .include_y(-125.0)
        .include_y(125.0)
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!("{name}\n标准化值: {:.1}%", value.x.hypot(value.y))
            }
        })
        .show(ui, |plot_ui| {
            // Polar grid: rings every 20%, one spoke per axis.
            let grid = Stroke::new(0.5, Color32::GRAY);
            let mut r = RING_STEP;
            while r <= 100.0 {
                let mut points: Vec<[f64; 2]> = (0..n).map(|i| polar(i, n, r)).collect();
                points.push(polar(0, n, r));
                plot_ui.line(Line::new(PlotPoints::from(points)).stroke(grid));
                r += RING_STEP;
            }
            for (i, axis) in profile.student.iter().enumerate() {
                let spoke = vec![[0.0, 0.0], polar(i, n, 100.0)];
                plot_ui.line(Line::new(PlotPoints::from(spoke)).stroke(grid));
                let [x, y] = polar(i, n, 115.0);
                plot_ui.text(
                    Text::new(PlotPoint::new(x, y), axis.label).anchor(Align2::CENTER_CENTER),
                );
            }

            if let Some(cohort) = &profile.cohort {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(ring(cohort)))
                        .name("班级平均")
                        .fill_color(color::fill(color::COHORT))
                        .stroke(Stroke::new(2.0, color::COHORT)),
                );
            }
            plot_ui.polygon(
                Polygon::new(PlotPoints::from(ring(&profile.student)))
                    .name("个人得分")
                    .fill_color(color::fill(color::STUDENT))
                    .stroke(Stroke::new(2.0, color::STUDENT)),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(ring(&profile.student)))
                    .name("个人得分")
                    .radius(3.0)
                    .color(color::STUDENT),
            );
        });
}

// ---------------------------------------------------------------------------
// Grade-point trend
// ---------------------------------------------------------------------------

pub fn gpa_chart(ui: &mut Ui, trend: &GpaTrend) {
    let projection = &trend.projection;
    let observed = projection.observed.values();
    let n = observed.len();
    let labels: Vec<String> = projection.points().into_iter().map(|p| p.label).collect();
    let [y_min, y_max] = trend.range;

    let student_points: Vec<[f64; 2]> = observed
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();
    let mut trend_points: Vec<[f64; 2]> = projection
        .fitted
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();
    let projected = [n as f64, projection.projected.value];
    trend_points.push(projected);

    let (student_name, title) = if projection.placeholder {
        ("个人绩点(示例)", "学期绩点趋势(示例数据)")
    } else {
        ("个人绩点", "学期绩点趋势")
    };
    ui.strong(title);

    Plot::new("gpa_chart")
        .legend(Legend::default())
        .height(360.0)
        .x_axis_label("学期")
        .y_axis_label("绩点")
        .include_x(-0.5)
        .include_x(n as f64 + 0.5)
        .include_y(y_min)
        .include_y(y_max)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(student_points.clone()))
                    .name(student_name)
                    .color(color::GPA)
                    .width(3.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(student_points))
                    .name(student_name)
                    .radius(5.0)
                    .color(color::GPA),
            );

            if let Some(cohort) = &trend.cohort {
                let points: Vec<[f64; 2]> = cohort
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .name("班级平均")
                        .color(color::COHORT)
                        .style(LineStyle::dotted_loose())
                        .width(2.0),
                );
            }

            plot_ui.line(
                Line::new(PlotPoints::from(trend_points))
                    .name("趋势预测")
                    .color(color::TREND)
                    .style(LineStyle::dashed_loose())
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(vec![projected]))
                    .name("预测绩点")
                    .shape(MarkerShape::Asterisk)
                    .radius(8.0)
                    .color(color::TREND),
            );

            // "Good" reference level across the observed semesters.
            let end = n.saturating_sub(1) as f64;
            plot_ui.line(
                Line::new(PlotPoints::from(vec![
                    [0.0, trend.reference],
                    [end, trend.reference],
                ]))
                .color(color::REFERENCE)
                .style(LineStyle::dotted_dense())
                .width(1.0),
            );
            plot_ui.text(
                Text::new(PlotPoint::new(0.0, trend.reference + 0.1), "良好")
                    .color(color::REFERENCE)
                    .anchor(Align2::LEFT_BOTTOM),
            );
        });

    if projection.placeholder {
        ui.label(
            RichText::new("没有足够的绩点数据，使用示例数据展示功能")
                .color(Color32::from_rgb(217, 119, 6)),
        );
    }
}

// ---------------------------------------------------------------------------
// Cohort histogram
// ---------------------------------------------------------------------------

pub fn score_histogram(ui: &mut Ui, hist: &ScoreHistogram) {
    let bars: Vec<Bar> = hist
        .histogram
        .buckets
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(hist.histogram.bin_width)
                .name(format!("{:.1} – {:.1}", b.start, b.end))
        })
        .collect();

    ui.strong(format!("全班{}分布", hist.column));
    Plot::new("score_histogram")
        .legend(Legend::default())
        .height(320.0)
        .x_axis_label(hist.column)
        .y_axis_label("人数")
        .include_y(0.0)
        .include_y(hist.histogram.max_count() as f64 + 1.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("人数").color(color::STUDENT));
            if let Some(marker) = hist.marker {
                plot_ui.vline(
                    VLine::new(marker)
                        .name(format!("当前学生: {marker}"))
                        .color(color::MARKER)
                        .style(LineStyle::dashed_loose())
                        .width(2.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_spoke_points_up_and_turns_clockwise() {
        let [x, y] = polar(0, 5, 100.0);
        assert!(x.abs() < 1e-9 && (y - 100.0).abs() < 1e-9);
        let [x, _] = polar(1, 5, 100.0);
        assert!(x > 0.0);
    }
}
