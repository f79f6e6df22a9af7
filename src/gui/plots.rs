use crate::model::{ContentRow, LengthRow, PlotSeries, QualityRow};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints};

// Tol palette, readable on light and dark themes alike.
const COLOR_G: Color32 = Color32::from_rgb(0x88, 0x22, 0x55);
const COLOR_A: Color32 = Color32::from_rgb(0x33, 0x22, 0x88);
const COLOR_T: Color32 = Color32::from_rgb(0x11, 0x77, 0x33);
const COLOR_C: Color32 = Color32::from_rgb(0xDD, 0xCC, 0x77);

const BOX_FILL: Color32 = Color32::from_rgb(0xFF, 0xD5, 0x4F);
const BAR_FILL: Color32 = Color32::from_rgb(0x33, 0x22, 0x88);

/// Draws `series` into the remaining space of `ui`.
pub fn show(ui: &mut Ui, series: &PlotSeries) {
    match series {
        PlotSeries::Quality(rows) => quality_plot(ui, rows),
        PlotSeries::Content(rows) => content_plot(ui, rows),
        PlotSeries::Lengths(rows) => length_plot(ui, rows),
    }
}

/// Per-position box-and-whisker chart (10th/90th percentile whiskers,
/// quartile box, median bar) with the mean overlaid as a line.
fn quality_plot(ui: &mut Ui, rows: &[QualityRow]) {
    let boxes: Vec<BoxElem> = rows
        .iter()
        .map(|row| {
            BoxElem::new(
                row.base as f64,
                BoxSpread::new(
                    row.p10 as f64,
                    row.lower_quartile as f64,
                    row.median as f64,
                    row.upper_quartile as f64,
                    row.p90 as f64,
                ),
            )
            .box_width(0.7)
            .whisker_width(0.4)
            .fill(BOX_FILL.gamma_multiply(0.6))
        })
        .collect();
    let mean: Vec<[f64; 2]> = rows.iter().map(|row| [row.base as f64, row.mean]).collect();

    Plot::new("per_base_quality")
        .legend(Legend::default())
        .x_axis_label("Position in read (bp)")
        .y_axis_label("Phred quality score")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name("Quality range"));
            plot_ui.line(
                Line::new(PlotPoints::from(mean))
                    .color(COLOR_G)
                    .width(2.0)
                    .name("Mean"),
            );
        });
}

/// Four lines, one per base, as percent of called bases at each position.
fn content_plot(ui: &mut Ui, rows: &[ContentRow]) {
    let series: [(&str, Color32, fn(&ContentRow) -> f64); 4] = [
        ("%G", COLOR_G, |r| r.g),
        ("%A", COLOR_A, |r| r.a),
        ("%T", COLOR_T, |r| r.t),
        ("%C", COLOR_C, |r| r.c),
    ];

    Plot::new("per_base_content")
        .legend(Legend::default())
        .x_axis_label("Position in read (bp)")
        .y_axis_label("Base content (%)")
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            for (name, color, value) in series {
                let points: Vec<[f64; 2]> = rows
                    .iter()
                    .map(|row| [row.base as f64, value(row)])
                    .collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .color(color)
                        .width(2.0)
                        .name(name),
                );
            }
        });
}

/// Histogram of read lengths, one bar per observed length.
fn length_plot(ui: &mut Ui, rows: &[LengthRow]) {
    let bars: Vec<Bar> = rows
        .iter()
        .map(|row| {
            Bar::new(row.length as f64, row.count as f64)
                .width(0.8)
                .fill(BAR_FILL.gamma_multiply(0.8))
        })
        .collect();

    Plot::new("length_distribution")
        .legend(Legend::default())
        .x_axis_label("Sequence length (bp)")
        .y_axis_label("Count")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Reads"));
        });
}
