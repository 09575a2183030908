//! Control Panel Widget
//! Left side panel with the data source, pickers and export controls.

use crate::data::RegionFilter;
use crate::view::DashboardView;
use egui::{Color32, ComboBox, RichText};
use std::path::Path;

/// Picker choices carried between render passes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
    pub region: RegionFilter,
    pub representative: Option<String>,
}

/// Left side control panel.
pub struct ControlPanel {
    pub selection: Selection,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the choices the view actually used (after fallbacks).
    pub fn sync_with(&mut self, view: &DashboardView) {
        if let Some(region) = &view.region {
            self.selection.region = region.selected.clone();
        }
        if let Some(rep) = &view.representative {
            self.selection.representative = rep.selected.clone();
        }
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        data_path: &Path,
        view: Option<&DashboardView>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Dashboard de Vendedores")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Archivo").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = data_path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| data_path.display().to_string());
                    ui.label(RichText::new(name).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🔄 Recargar").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Pickers =====
        let label_width = 90.0;
        let combo_width = 170.0;

        if let Some(region) = view.and_then(|v| v.region.as_ref()) {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Región:"));
                ComboBox::from_id_salt("region_choice")
                    .width(combo_width)
                    .selected_text(self.selection.region.label())
                    .show_ui(ui, |ui| {
                        for option in &region.options {
                            let selected = self.selection.region.label() == option;
                            if ui.selectable_label(selected, option).clicked() && !selected {
                                self.selection.region = RegionFilter::from_choice(option);
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
            });
            ui.add_space(5.0);
        }

        if let Some(rep) = view.and_then(|v| v.representative.as_ref()) {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Vendedor:"));
                let current = self.selection.representative.clone().unwrap_or_default();
                ComboBox::from_id_salt("representative_choice")
                    .width(combo_width)
                    .selected_text(&current)
                    .show_ui(ui, |ui| {
                        for option in &rep.options {
                            let selected = current == *option;
                            if ui.selectable_label(selected, option).clicked() && !selected {
                                self.selection.representative = Some(option.clone());
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        let can_export = view.is_some_and(|v| v.charts.as_ref().is_some_and(|c| !c.is_empty()));
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(can_export, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Exportar gráficas").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Reload,
    SelectionChanged,
    ExportCharts,
}
