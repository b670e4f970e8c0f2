//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::analysis::{
    ExtremesRow, GenderTrendAggregator, RankingAggregator, RegionalExtremesAggregator, TopNames,
};
use crate::charts::geo_shapes::{self, PolygonRings};
use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{BaseTables, DataCache};
use crate::gui::chart_viewer::PageView;
use crate::gui::control_panel::Page;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use anyhow::{Context, Result};
use egui::{Color32, RichText, SidePanel};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How often the source files are checked for changes.
const STALE_CHECK_INTERVAL: Duration = Duration::from_secs(2);

const EXPORT_SIZE: (u32, u32) = (1200, 800);

const LOADER_STOPPED: &str = "The data loader stopped unexpectedly. See the log for details.";

/// Table loading result from background thread
enum LoadResult {
    Complete {
        tables: Arc<BaseTables>,
        top_names: TopNames,
        names: Vec<String>,
    },
    Error(String),
}

/// Extremes rows with their projected shapes, computed once per load.
struct RegionalMap {
    rows: Vec<ExtremesRow>,
    shapes: Vec<Vec<PolygonRings>>,
}

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    cache: Arc<DataCache>,
    tables: Option<Arc<BaseTables>>,
    top_names: TopNames,
    regional_map: Option<RegionalMap>,
    load_error: Option<String>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async table loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
    last_stale_check: Instant,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, cache: Arc<DataCache>) -> Self {
        let mut app = Self::with_cache(config, cache);
        app.start_load(false);
        app
    }

    /// App state without a window; nothing is loaded yet.
    fn with_cache(config: AppConfig, cache: Arc<DataCache>) -> Self {
        let control_panel = ControlPanel::new(&config.dashboard);
        Self {
            config,
            cache,
            tables: None,
            top_names: TopNames::default(),
            regional_map: None,
            load_error: None,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
            last_stale_check: Instant::now(),
        }
    }

    /// Load the base tables and the per-year ranking in a background thread.
    fn start_load(&mut self, force: bool) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_status("Loading data...");

        let cache = Arc::clone(&self.cache);
        let top_n = self.config.dashboard.top_n;

        thread::spawn(move || {
            let loaded = if force {
                cache.reload()
            } else {
                cache.get_or_load()
            };
            let tables = match loaded {
                Ok(tables) => tables,
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                    return;
                }
            };

            let top_names = match RankingAggregator::top_names_by_year(&tables.names, top_n) {
                Ok(top_names) => top_names,
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                    return;
                }
            };

            match tables.names.distinct_names() {
                Ok(names) => {
                    let _ = tx.send(LoadResult::Complete {
                        tables,
                        top_names,
                        names,
                    });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for table loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete {
                tables,
                top_names,
                names,
            }) => {
                // Empty rankings fall back to the raw table bounds
                let year_range = top_names
                    .year_range()
                    .or_else(|| tables.names.year_bounds().ok().flatten());
                if tables.names.is_empty() || tables.departments.is_empty() {
                    log::warn!(
                        "Loaded {} name records and {} departments; pages will be empty",
                        tables.names.len(),
                        tables.departments.len()
                    );
                }
                self.control_panel.update_choices(
                    year_range,
                    names,
                    tables.departments.sorted_names(),
                );
                self.control_panel.set_status(&format!(
                    "Loaded {} records, {} departments",
                    tables.names.len(),
                    tables.departments.len()
                ));
                self.control_panel.source_changed = false;
                self.tables = Some(tables);
                self.top_names = top_names;
                self.regional_map = None;
                self.load_error = None;
                self.is_loading = false;
                self.refresh_view();
            }
            Ok(LoadResult::Error(error)) => {
                log::error!("Failed to load data: {}", error);
                self.control_panel.set_status("Error: data could not be loaded");
                self.tables = None;
                self.load_error = Some(error);
                self.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                log::error!("Data loader stopped without a result");
                self.control_panel.set_status("Error: data could not be loaded");
                self.tables = None;
                self.load_error = Some(LOADER_STOPPED.to_string());
                self.is_loading = false;
            }
        }
    }

    /// Recompute the current page from the selection.
    fn refresh_view(&mut self) {
        let Some(tables) = self.tables.clone() else {
            return;
        };
        let selection = self.control_panel.selection.clone();
        self.chart_viewer.set_scheme(selection.scheme);

        let view = match selection.page {
            Page::Home => PageView::Home,
            Page::TopNames => PageView::TopNames {
                year: selection.year,
                top_n: self.top_names.top_n(),
                rows: self.top_names.for_year(selection.year).to_vec(),
            },
            Page::RegionalMap => {
                if self.regional_map.is_none() {
                    match RegionalExtremesAggregator::extremes_by_department(
                        &tables.names,
                        &tables.departments,
                    ) {
                        Ok(rows) => {
                            let shapes = rows
                                .iter()
                                .map(|row| geo_shapes::polygons(&row.geometry))
                                .collect();
                            self.regional_map = Some(RegionalMap { rows, shapes });
                        }
                        Err(e) => {
                            log::error!("Regional extremes failed: {}", e);
                            self.control_panel.set_status(&format!("Error: {}", e));
                            return;
                        }
                    }
                }
                match &self.regional_map {
                    Some(map) => PageView::RegionalMap {
                        rows: map.rows.clone(),
                        shapes: map.shapes.clone(),
                    },
                    None => return,
                }
            }
            Page::GenderDistribution => {
                let rows = match GenderTrendAggregator::gender_trend(
                    &tables.names,
                    &tables.departments,
                    &selection.name,
                    &selection.department,
                ) {
                    Ok(rows) => rows,
                    Err(e) => {
                        log::error!("Gender trend failed: {}", e);
                        self.control_panel.set_status(&format!("Error: {}", e));
                        return;
                    }
                };
                let table = GenderTrendAggregator::trend_table(&rows)
                    .map_err(|e| log::error!("Failed to build trend table: {}", e))
                    .ok();
                PageView::GenderDistribution {
                    name: selection.name,
                    department: selection.department,
                    rows,
                    table,
                }
            }
        };

        self.chart_viewer.set_view(view);
    }

    /// Handle chart export - render the current chart to a PNG file
    fn handle_export_chart(&mut self) {
        let default_name = match self.chart_viewer.view() {
            PageView::TopNames { year, .. } => format!("top_names_{}.png", year),
            PageView::GenderDistribution { name, .. } => format!("gender_{}.png", name),
            _ => {
                self.control_panel.set_status("No chart to export on this page");
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&default_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match self.export_chart(&path) {
            Ok(()) => {
                log::info!("Exported chart to {}", path.display());
                self.control_panel
                    .set_status(&format!("Exported chart to {}", path.display()));
            }
            Err(e) => {
                log::error!("Chart export failed: {:#}", e);
                self.control_panel.set_status(&format!("Error: {:#}", e));
            }
        }
    }

    fn export_chart(&self, path: &Path) -> Result<()> {
        let rendered = match self.chart_viewer.view() {
            PageView::TopNames { year, rows, .. } => {
                StaticChartRenderer::render_ranking_png(path, *year, rows, EXPORT_SIZE)
            }
            PageView::GenderDistribution {
                name,
                department,
                rows,
                ..
            } => StaticChartRenderer::render_gender_trend_png(
                path,
                &PageView::gender_title(name, department),
                rows,
                EXPORT_SIZE,
            ),
            _ => Ok(()),
        };
        rendered.with_context(|| format!("Failed to render {}", path.display()))
    }

    /// Handle table export - write the gender trend table as CSV
    fn handle_export_table(&mut self) {
        let PageView::GenderDistribution { name, rows, .. } = self.chart_viewer.view() else {
            self.control_panel.set_status("No table to export on this page");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("gender_{}.csv", name))
            .save_file()
        else {
            return; // User cancelled
        };

        match GenderTrendAggregator::write_trend_csv(rows, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported table to {}", path.display()));
            }
            Err(e) => {
                log::error!("Table export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn check_sources(&mut self) {
        if self.is_loading || self.last_stale_check.elapsed() < STALE_CHECK_INTERVAL {
            return;
        }
        self.last_stale_check = Instant::now();
        if !self.control_panel.source_changed && self.cache.is_stale() {
            log::info!("Source files changed on disk");
            self.control_panel.source_changed = true;
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_sources();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(STALE_CHECK_INTERVAL);
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectionChanged => self.refresh_view(),
                        ControlPanelAction::PaletteChanged => self
                            .chart_viewer
                            .set_scheme(self.control_panel.selection.scheme),
                        ControlPanelAction::ReloadData => self.start_load(true),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::ExportTable => self.handle_export_table(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.load_error {
                ui.label(
                    RichText::new("Error loading data")
                        .size(22.0)
                        .strong()
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                ui.add_space(8.0);
                ui.label(error);
                ui.add_space(8.0);
                let sources = self.cache.sources();
                ui.label(
                    RichText::new(format!(
                        "Names file: {}\nDepartments file: {}",
                        sources.names_path.display(),
                        sources.geo_path.display()
                    ))
                    .color(Color32::GRAY),
                );
                ui.add_space(8.0);
                ui.label("Fix the data files and press \"Reload data\".");
                return;
            }

            if self.tables.is_none() {
                let stage = if self.cache.is_loaded() {
                    "Ranking names..."
                } else {
                    "Reading source files..."
                };
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.spinner();
                    ui.label(RichText::new(stage).color(Color32::GRAY));
                });
                return;
            }

            self.chart_viewer.show(ui);
        });
    }
}
