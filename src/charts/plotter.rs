//! Chart Plotter Module
//! Creates the interactive dashboard charts using egui_plot.

use crate::analysis::{ExtremesRow, GenderTrendRow, RankingRow};
use crate::charts::geo_shapes::{self, PolygonRings};
use crate::charts::palette::{ColorScheme, BAR_COLOR, BOYS_COLOR, GIRLS_COLOR, NO_DATA_COLOR};
use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};
use polars::prelude::*;

const CHART_HEIGHT: f32 = 420.0;
const MAP_HEIGHT: f32 = 600.0;

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bar chart, most given name on top.
    pub fn draw_ranking_chart(ui: &mut egui::Ui, year: i32, rows: &[RankingRow]) {
        let n = rows.len();
        // Rank 0 sits at the top of the chart
        let position = move |rank: usize| (n - rank) as f64;

        let labels: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();
        let max_count = rows.iter().map(|r| r.total_count).max().unwrap_or(0);

        Plot::new(format!("ranking_{}", year))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label("Number of Births")
            .y_axis_label("Name")
            .include_x(0.0)
            .include_x(max_count as f64 * 1.15)
            .include_y(0.0)
            .include_y(n as f64 + 1.0)
            .y_grid_spacer(move |_input| {
                (1..=n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                let rank = n as f64 - mark.value.round();
                if rank >= 0.0 && (rank as usize) < labels.len() && mark.value >= 1.0 {
                    labels[rank as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = rows
                    .iter()
                    .enumerate()
                    .map(|(rank, row)| {
                        Bar::new(position(rank), row.total_count as f64)
                            .name(&row.name)
                            .width(0.8)
                            .fill(BAR_COLOR)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Births"));

                for (rank, row) in rows.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(row.total_count as f64, position(rank)),
                            RichText::new(format!("  {}", row.total_count)).size(10.0),
                        )
                        .anchor(Align2::LEFT_CENTER),
                    );
                }
            });
    }

    /// Choropleth of the most given name count per department.
    ///
    /// `shapes[i]` holds the projected polygons of `rows[i]`. Returns the
    /// index of the hovered department, if any.
    pub fn draw_choropleth(
        ui: &mut egui::Ui,
        rows: &[ExtremesRow],
        shapes: &[Vec<PolygonRings>],
        scheme: ColorScheme,
    ) -> Option<usize> {
        let max_count = rows.iter().map(|r| r.max_count).max().unwrap_or(0);

        let response = Plot::new("department_map")
            .height(MAP_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (row, polygons) in rows.iter().zip(shapes) {
                    let fill = if row.has_data() {
                        scheme.color_for(row.max_count, max_count)
                    } else {
                        NO_DATA_COLOR
                    };
                    for rings in polygons {
                        let Some(outer) = rings.first() else {
                            continue;
                        };
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(outer.clone()))
                                .fill_color(fill)
                                .stroke(Stroke::new(0.8, Color32::WHITE)),
                        );
                    }
                }

                plot_ui.pointer_coordinate().and_then(|pointer| {
                    shapes
                        .iter()
                        .position(|polygons| geo_shapes::contains(polygons, [pointer.x, pointer.y]))
                })
            });

        let hovered = response.inner;
        if let Some(row) = hovered.and_then(|idx| rows.get(idx)) {
            response.response.on_hover_ui_at_pointer(|ui| {
                ui.label(RichText::new(&row.department_name).strong());
                ui.label(format!("Most given: {} ({})", row.max_name, row.max_count));
                ui.label(format!("Least given: {} ({})", row.min_name, row.min_count));
            });
        }

        ui.horizontal(|ui| {
            ui.label(RichText::new("Most given name count:").size(11.0));
            for step in 0..=4 {
                let t = step as f64 / 4.0;
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(24.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 0.0, scheme.color_at(t));
                ui.label(
                    RichText::new(format!("{:.0}", t * max_count as f64)).size(10.0),
                );
            }
        });

        hovered
    }

    /// Percentage of boys and girls per year. Draws an empty frame when
    /// `rows` is empty.
    pub fn draw_gender_chart(ui: &mut egui::Ui, rows: &[GenderTrendRow]) {
        let girls: Vec<[f64; 2]> = rows
            .iter()
            .map(|r| [r.year as f64, r.pct_girls])
            .collect();
        let boys: Vec<[f64; 2]> = rows.iter().map(|r| [r.year as f64, r.pct_boys]).collect();

        Plot::new("gender_trend")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Year")
            .y_axis_label("Percentage (%)")
            .include_y(0.0)
            .include_y(100.0)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (label, color, points) in [("Girls", GIRLS_COLOR, girls), ("Boys", BOYS_COLOR, boys)]
                {
                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(label),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(3.0)
                            .color(color)
                            .name(label),
                    );
                }
            });
    }

    /// Draw a DataFrame as a striped grid.
    pub fn draw_frame_table(ui: &mut egui::Ui, id: &str, df: &DataFrame) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for column in df.get_columns() {
                            ui.label(RichText::new(column.name().as_str()).strong().size(11.0));
                        }
                        ui.end_row();

                        for i in 0..df.height() {
                            for column in df.get_columns() {
                                let text = match column.get(i) {
                                    Ok(AnyValue::Float64(v)) => format!("{:.1}", v),
                                    Ok(AnyValue::Null) | Err(_) => "-".to_string(),
                                    Ok(v) => v.to_string().trim_matches('"').to_string(),
                                };
                                ui.label(RichText::new(text).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
