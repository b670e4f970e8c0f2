//! Control Panel Widget
//! Left side panel with page navigation and the selection controls.

use crate::analysis::{DepartmentFilter, ALL_DEPARTMENTS};
use crate::charts::ColorScheme;
use crate::config::DashboardSettings;
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// Names listed in the name dropdown at once.
const MAX_LISTED_NAMES: usize = 200;

/// Dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    TopNames,
    RegionalMap,
    GenderDistribution,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Home,
        Page::TopNames,
        Page::RegionalMap,
        Page::GenderDistribution,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::TopNames => "Top Names Over Time",
            Page::RegionalMap => "Regional Name Map",
            Page::GenderDistribution => "Name Gender Distribution",
        }
    }
}

/// Everything the user picked in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub page: Page,
    pub year: i32,
    pub scheme: ColorScheme,
    pub name: String,
    pub department: DepartmentFilter,
}

/// Left side control panel with navigation and selection widgets.
pub struct ControlPanel {
    pub selection: Selection,
    year_range: (i32, i32),
    names: Vec<String>,
    departments: Vec<String>,
    name_query: String,
    pub status: String,
    pub data_loaded: bool,
    pub source_changed: bool,
}

impl ControlPanel {
    pub fn new(settings: &DashboardSettings) -> Self {
        Self {
            selection: Selection {
                page: Page::Home,
                year: settings.default_year,
                scheme: ColorScheme::parse(&settings.palette).unwrap_or_else(|| {
                    log::warn!("Unknown palette '{}', using blues", settings.palette);
                    ColorScheme::default()
                }),
                name: settings.default_name.clone(),
                department: DepartmentFilter::All,
            },
            year_range: (settings.default_year, settings.default_year),
            names: Vec::new(),
            departments: Vec::new(),
            name_query: String::new(),
            status: "Ready".to_string(),
            data_loaded: false,
            source_changed: false,
        }
    }

    /// Refresh the selectable values after the base tables (re)loaded.
    pub fn update_choices(
        &mut self,
        year_range: Option<(i32, i32)>,
        names: Vec<String>,
        departments: Vec<String>,
    ) {
        if let Some((min, max)) = year_range {
            self.year_range = (min, max);
            self.selection.year = self.selection.year.clamp(min, max);
        }

        // Keep the current name if it still exists, matching its case to the data
        self.selection.name = names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(&self.selection.name))
            .or_else(|| names.first())
            .cloned()
            .unwrap_or_default();

        if let DepartmentFilter::Named(current) = &self.selection.department {
            if !departments.iter().any(|d| d.eq_ignore_ascii_case(current)) {
                self.selection.department = DepartmentFilter::All;
            }
        }

        self.names = names;
        self.departments = departments;
        self.data_loaded = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("👶 Prénoms de France")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Births by year, department and gender")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        // ===== Navigation =====
        ui.label(RichText::new("🧭 Navigation").size(14.0).strong());
        ui.add_space(5.0);
        for page in Page::ALL {
            if ui
                .radio_value(&mut self.selection.page, page, page.label())
                .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }
        }

        ui.add_space(10.0);
        ui.separator();

        if self.data_loaded {
            match self.selection.page {
                Page::Home => {}
                Page::TopNames => self.show_year_controls(ui, &mut action),
                Page::RegionalMap => self.show_map_controls(ui, &mut action),
                Page::GenderDistribution => self.show_gender_controls(ui, &mut action),
            }
        }

        ui.add_space(15.0);
        ui.separator();

        // ===== Data source =====
        ui.label(RichText::new("📁 Data").size(14.0).strong());
        ui.add_space(5.0);
        if self.source_changed {
            ui.label(
                RichText::new("Source files changed on disk")
                    .size(11.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
        }
        if ui.button("🔄 Reload data").clicked() {
            action = ControlPanelAction::ReloadData;
        }

        ui.add_space(10.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn show_year_controls(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.label(RichText::new("📅 Year").size(14.0).strong());
        ui.add_space(5.0);
        let (min, max) = self.year_range;
        if ui
            .add(egui::Slider::new(&mut self.selection.year, min..=max).text("Year"))
            .changed()
        {
            *action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(8.0);
        if ui.button("🖼 Export chart (PNG)").clicked() {
            *action = ControlPanelAction::ExportChart;
        }
    }

    fn show_map_controls(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.label(RichText::new("🎨 Color Scheme").size(14.0).strong());
        ui.add_space(5.0);
        ComboBox::from_id_salt("color_scheme")
            .width(150.0)
            .selected_text(self.selection.scheme.id())
            .show_ui(ui, |ui| {
                for scheme in ColorScheme::ALL {
                    if ui
                        .selectable_value(&mut self.selection.scheme, scheme, scheme.id())
                        .changed()
                    {
                        *action = ControlPanelAction::PaletteChanged;
                    }
                }
            });
    }

    fn show_gender_controls(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        let label_width = 90.0;
        let combo_width = 170.0;

        ui.label(RichText::new("🔧 Selection").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Search:"));
            ui.add(egui::TextEdit::singleline(&mut self.name_query).desired_width(combo_width));
        });

        let query = self.name_query.to_uppercase();
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Name:"));
            ComboBox::from_id_salt("name")
                .width(combo_width)
                .selected_text(&self.selection.name)
                .show_ui(ui, |ui| {
                    ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                        let matching = self
                            .names
                            .iter()
                            .filter(|n| query.is_empty() || n.to_uppercase().contains(&query))
                            .take(MAX_LISTED_NAMES);
                        for name in matching {
                            if ui
                                .selectable_label(self.selection.name == *name, name)
                                .clicked()
                            {
                                self.selection.name = name.clone();
                                *action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Department:"));
            ComboBox::from_id_salt("department")
                .width(combo_width)
                .selected_text(self.selection.department.label())
                .show_ui(ui, |ui| {
                    ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                        let choices =
                            std::iter::once(ALL_DEPARTMENTS).chain(self.departments.iter().map(String::as_str));
                        for choice in choices {
                            if ui
                                .selectable_label(self.selection.department.label() == choice, choice)
                                .clicked()
                            {
                                self.selection.department = DepartmentFilter::parse(choice);
                                *action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
                });
        });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("🖼 Export chart").clicked() {
                *action = ControlPanelAction::ExportChart;
            }
            if ui.button("📄 Export table (CSV)").clicked() {
                *action = ControlPanelAction::ExportTable;
            }
        });
    }

    /// Set the status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    PaletteChanged,
    ReloadData,
    ExportChart,
    ExportTable,
}
