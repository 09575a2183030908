//! Dashboard Viewer Widget
//! Central scrollable page: tables, charts and the representative detail,
//! drawn top to bottom and cut off at the first halt.

use crate::charts::{BarMetric, ChartPlotter, SalesChartData, PIE_TITLE};
use crate::gui::table_widget::{show_metrics, show_summary, show_table};
use crate::view::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Renders a [`DashboardView`].
#[derive(Default)]
pub struct DashboardViewer;

impl DashboardViewer {
    pub fn new() -> Self {
        Self
    }

    /// Error-only page for a failed load.
    pub fn show_error(&self, ui: &mut egui::Ui, message: &str) {
        Self::title(ui);
        Self::error_label(ui, message);
    }

    pub fn show(&self, ui: &mut egui::Ui, view: &DashboardView) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::title(ui);

                // Full table
                Self::section(ui, "Datos de Vendedores");
                show_table(ui, "full_table", &view.full_table);
                ui.add_space(5.0);
                ui.label(format!("Columnas disponibles: {}", view.columns.join(", ")));

                let Some(region) = &view.region else {
                    Self::halt(ui, view);
                    return;
                };

                ui.add_space(CARD_SPACING);
                ui.horizontal(|ui| {
                    ui.label("Mostrando datos para:");
                    ui.label(RichText::new(region.selected.label()).strong());
                });
                show_table(ui, "filtered_table", &region.table);
                ui.add_space(8.0);
                show_summary(ui, &region.summary);

                let Some(charts) = &view.charts else {
                    Self::halt(ui, view);
                    return;
                };

                Self::section(ui, "📈 Gráficas");
                Self::draw_charts(ui, charts);

                let Some(rep) = &view.representative else {
                    Self::halt(ui, view);
                    return;
                };

                Self::section(ui, "🔍 Buscar un Vendedor Específico");
                match &rep.selected {
                    Some(name) => {
                        ui.horizontal(|ui| {
                            ui.label("Datos de");
                            ui.label(RichText::new(name).strong());
                        });
                        show_table(ui, "representative_table", &rep.table);
                        ui.add_space(8.0);
                        match &rep.metrics {
                            Some(metrics) => show_metrics(ui, metrics),
                            None => {
                                ui.label(
                                    RichText::new("Sin datos para este vendedor")
                                        .color(Color32::GRAY),
                                );
                            }
                        }
                    }
                    None => {
                        ui.label(RichText::new("No hay vendedores").color(Color32::GRAY));
                    }
                }
            });
    }

    fn draw_charts(ui: &mut egui::Ui, charts: &SalesChartData) {
        for metric in [BarMetric::UnitsSold, BarMetric::TotalSales] {
            Self::card(ui, metric.title(), |ui| {
                ChartPlotter::draw_bar_chart(ui, charts, metric)
            });
            ui.add_space(CARD_SPACING);
        }
        Self::card(ui, PIE_TITLE, |ui| ChartPlotter::draw_pie_chart(ui, charts));
    }

    fn card(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(15.0).strong());
                ui.add_space(6.0);
                body(ui);
            });
    }

    fn title(ui: &mut egui::Ui) {
        ui.add_space(5.0);
        ui.label(RichText::new("📊 Dashboard de Vendedores").size(26.0).strong());
        ui.add_space(10.0);
    }

    fn section(ui: &mut egui::Ui, text: &str) {
        ui.add_space(CARD_SPACING);
        ui.label(RichText::new(text).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn halt(ui: &mut egui::Ui, view: &DashboardView) {
        if let Some(halt) = &view.halt {
            ui.add_space(CARD_SPACING);
            Self::error_label(ui, &halt.to_string());
        }
    }

    fn error_label(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .rounding(5.0)
            .stroke(egui::Stroke::new(1.5, ERROR_COLOR))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(message).size(14.0).color(ERROR_COLOR));
            });
    }
}
