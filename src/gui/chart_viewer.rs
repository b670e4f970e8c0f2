//! Chart Viewer Widget
//! Central scrollable panel showing the page selected in the control panel.

use crate::analysis::{DepartmentFilter, ExtremesRow, GenderTrendRow, RankingRow};
use crate::charts::geo_shapes::PolygonRings;
use crate::charts::{ChartPlotter, ColorScheme};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::DataFrame;

const HOME_TEXT: &str = "This dashboard provides three interactive visualizations for exploring \
French baby name data:";

const HOME_ITEMS: [(&str, &str); 3] = [
    (
        "Top Names Over Time",
        "Explore the most popular baby names in France over the years using an interactive year slider.",
    ),
    (
        "Regional Name Map",
        "Discover which names are most popular in different French departments using an interactive map.",
    ),
    (
        "Name Gender Distribution",
        "Analyze how the gender distribution for specific names has changed over time in different regions.",
    ),
];

/// Computed content of the current page.
#[derive(Debug, Clone, Default)]
pub enum PageView {
    #[default]
    Home,
    TopNames {
        year: i32,
        top_n: usize,
        rows: Vec<RankingRow>,
    },
    RegionalMap {
        rows: Vec<ExtremesRow>,
        /// Projected polygons, parallel to `rows`.
        shapes: Vec<Vec<PolygonRings>>,
    },
    GenderDistribution {
        name: String,
        department: DepartmentFilter,
        rows: Vec<GenderTrendRow>,
        table: Option<DataFrame>,
    },
}

impl PageView {
    /// Chart title of the gender page.
    pub fn gender_title(name: &str, department: &DepartmentFilter) -> String {
        let place = match department {
            DepartmentFilter::All => "France",
            DepartmentFilter::Named(dept) => dept.as_str(),
        };
        format!(
            "Percentage of Boys and Girls Named {} Over Time in {}",
            name, place
        )
    }
}

/// Scrollable page display.
#[derive(Default)]
pub struct ChartViewer {
    view: PageView,
    scheme: ColorScheme,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn set_view(&mut self, view: PageView) {
        self.view = view;
    }

    pub fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match &self.view {
                PageView::Home => Self::show_home(ui),
                PageView::TopNames { year, top_n, rows } => {
                    Self::page_header(
                        ui,
                        "Top Baby Names Over Time",
                        &format!(
                            "Use the slider to explore the top {} baby names for each year",
                            top_n
                        ),
                    );
                    Self::card(ui, &format!("Top {} Baby Names in {}", top_n, year), |ui| {
                        if rows.is_empty() {
                            ui.label(format!("No births recorded in {}.", year));
                        }
                        ChartPlotter::draw_ranking_chart(ui, *year, rows);
                    });
                }
                PageView::RegionalMap { rows, shapes } => {
                    Self::page_header(
                        ui,
                        "Regional Name Popularity Map",
                        "Hover over departments to see the most and least used names",
                    );
                    let scheme = self.scheme;
                    Self::card(ui, "Most Popular Baby Names by Department", |ui| {
                        ChartPlotter::draw_choropleth(ui, rows, shapes, scheme);
                    });
                }
                PageView::GenderDistribution {
                    name,
                    department,
                    rows,
                    table,
                } => {
                    Self::page_header(
                        ui,
                        "Name Gender Distribution Over Time",
                        "Select a name and a department to see the share of boys and girls",
                    );
                    Self::card(ui, &PageView::gender_title(name, department), |ui| {
                        if rows.is_empty() {
                            ui.label(
                                RichText::new(format!(
                                    "No data available for name '{}' in the selected department.",
                                    name
                                ))
                                .color(Color32::from_rgb(243, 156, 18)),
                            );
                        }
                        ChartPlotter::draw_gender_chart(ui, rows);
                    });

                    ui.add_space(10.0);
                    if let Some(table) = table {
                        ui.label(RichText::new("Yearly counts").size(14.0).strong());
                        ChartPlotter::draw_frame_table(ui, "gender_table", table);
                    }
                }
            });
    }

    fn show_home(ui: &mut egui::Ui) {
        Self::page_header(ui, "French Baby Names Visualization Dashboard", HOME_TEXT);
        for (idx, (title, text)) in HOME_ITEMS.iter().enumerate() {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(format!("{}. {}:", idx + 1, title)).strong());
                ui.label(*text);
            });
            ui.add_space(6.0);
        }
        ui.add_space(6.0);
        ui.label("Use the sidebar to navigate between visualizations.");
    }

    fn page_header(ui: &mut egui::Ui, title: &str, subtitle: &str) {
        ui.label(RichText::new(title).size(24.0).strong());
        ui.label(RichText::new(subtitle).size(13.0).color(Color32::GRAY));
        ui.add_space(12.0);
    }

    /// Framed card with a title, as around every chart.
    fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(18.0).strong());
                ui.add_space(8.0);
                add_contents(ui);
            });
    }
}
