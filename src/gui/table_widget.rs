//! Table and metric widgets.

use crate::format::format_currency;
use crate::stats::RegionSummary;
use crate::view::{MetricsView, TableView};
use egui::{Color32, RichText, ScrollArea};

const TABLE_MAX_HEIGHT: f32 = 260.0;

/// Scrollable striped grid for a table.
pub fn show_table(ui: &mut egui::Ui, id: &str, table: &TableView) {
    if table.is_empty() {
        ui.label(RichText::new("Sin filas").color(Color32::GRAY));
        return;
    }

    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ScrollArea::both()
                .id_salt(id)
                .max_height(TABLE_MAX_HEIGHT)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    egui::Grid::new(ui.make_persistent_id(id))
                        .striped(true)
                        .min_col_width(60.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            for header in &table.headers {
                                ui.label(RichText::new(header).strong().size(12.0));
                            }
                            ui.end_row();

                            for row in &table.rows {
                                for cell in row {
                                    ui.label(RichText::new(cell).size(12.0));
                                }
                                ui.end_row();
                            }
                        });
                });
        });
}

/// Per-region aggregates.
pub fn show_summary(ui: &mut egui::Ui, rows: &[RegionSummary]) {
    if rows.is_empty() {
        return;
    }

    egui::Grid::new(ui.make_persistent_id("region_summary"))
        .striped(true)
        .min_col_width(70.0)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for header in ["Región", "Vendedores", "Unidades", "Ventas", "Media", "Mediana", "Desv."] {
                ui.label(RichText::new(header).strong().size(12.0));
            }
            ui.end_row();

            for row in rows {
                ui.label(RichText::new(&row.region).size(12.0));
                ui.label(row.representatives.to_string());
                ui.label(format!("{:.0}", row.units_total));
                ui.label(format_currency(row.sales_total));
                ui.label(format_currency(row.sales_mean));
                ui.label(format_currency(row.sales_median));
                ui.label(format_currency(row.sales_std));
                ui.end_row();
            }
        });
}

/// The two representative metrics side by side.
pub fn show_metrics(ui: &mut egui::Ui, metrics: &MetricsView) {
    ui.horizontal(|ui| {
        metric(ui, "Unidades Vendidas", &metrics.units_sold);
        ui.add_space(40.0);
        metric(ui, "Ventas Totales", &metrics.total_sales);
    });
}

fn metric(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
        ui.label(RichText::new(value).size(30.0).strong());
    });
}
