//! Chart Plotter Module
//! Chart series for the dashboard and their interactive egui_plot rendering.

use crate::data::columns::{CHART_COLUMNS, COL_REPRESENTATIVE, COL_SALES, COL_UNITS};
use crate::data::{DataProcessor, ProcessorError};
use crate::format::{format_currency, format_share, format_units};
use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, PlotPoints, Polygon, Text};
use polars::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Label used for rows without a display name.
pub const UNNAMED_LABEL: &str = "(sin nombre)";

pub const UNITS_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const SALES_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(96, 125, 139),  // Blue Grey
    Color32::from_rgb(205, 220, 57),  // Lime
    Color32::from_rgb(0, 188, 212),   // Cyan
];

/// Which bar chart to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarMetric {
    UnitsSold,
    TotalSales,
}

impl BarMetric {
    pub fn title(self) -> &'static str {
        match self {
            BarMetric::UnitsSold => "Unidades Vendidas por Vendedor",
            BarMetric::TotalSales => "Ventas Totales por Vendedor",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            BarMetric::UnitsSold => "Unidades",
            BarMetric::TotalSales => "Ventas",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            BarMetric::UnitsSold => UNITS_COLOR,
            BarMetric::TotalSales => SALES_COLOR,
        }
    }

    /// Value as shown in the bar hover, formatted like the metrics.
    pub fn format_value(self, value: f64) -> String {
        match self {
            BarMetric::UnitsSold => format_units(value),
            BarMetric::TotalSales => format_currency(value),
        }
    }
}

/// Pie chart title.
pub const PIE_TITLE: &str = "Porcentaje de Ventas";

/// One wedge of the sales-share pie.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    /// Radians, counter-clockwise from the positive x axis
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Series shared by the bar and pie charts, one entry per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesChartData {
    pub labels: Vec<String>,
    pub units: Vec<f64>,
    pub sales: Vec<f64>,
}

impl SalesChartData {
    /// Extract chart series from the filtered table. Null numbers plot as 0.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, ProcessorError> {
        DataProcessor::require_columns(df, &CHART_COLUMNS)?;

        let labels = DataProcessor::text_values(df, COL_REPRESENTATIVE)?
            .into_iter()
            .map(|v| v.unwrap_or_else(|| UNNAMED_LABEL.to_string()))
            .collect();
        let units = DataProcessor::numeric_values(df, COL_UNITS)?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();
        let sales = DataProcessor::numeric_values(df, COL_SALES)?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();

        Ok(Self { labels, units, sales })
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn values(&self, metric: BarMetric) -> &[f64] {
        match metric {
            BarMetric::UnitsSold => &self.units,
            BarMetric::TotalSales => &self.sales,
        }
    }

    /// Sales share per representative. Starts at 90° and runs
    /// counter-clockwise; non-positive sales get no wedge.
    pub fn pie_slices(&self) -> Vec<PieSlice> {
        let total: f64 = self.sales.iter().filter(|v| **v > 0.0).sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut angle = FRAC_PI_2;
        self.labels
            .iter()
            .zip(&self.sales)
            .filter(|(_, value)| **value > 0.0)
            .map(|(label, &value)| {
                let fraction = value / total;
                let start_angle = angle;
                angle += fraction * TAU;
                PieSlice {
                    label: label.clone(),
                    value,
                    fraction,
                    start_angle,
                    end_angle: angle,
                }
            })
            .collect()
    }
}

/// Points along a wedge outline: center, then the arc from start to end.
pub fn wedge_outline(slice: &PieSlice, radius: f64, segments_per_turn: usize) -> Vec<[f64; 2]> {
    let sweep = slice.end_angle - slice.start_angle;
    let steps = ((sweep / TAU) * segments_per_turn as f64).ceil().max(1.0) as usize;

    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let theta = slice.start_angle + sweep * i as f64 / steps as f64;
        points.push([radius * theta.cos(), radius * theta.sin()]);
    }
    points
}

/// Draws the dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color of the i-th pie wedge.
    pub fn slice_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Bar chart, one bar per representative.
    pub fn draw_bar_chart(ui: &mut egui::Ui, data: &SalesChartData, metric: BarMetric) {
        let labels = data.labels.clone();
        let values = data.values(metric);

        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let hover = format!("{}: {}", data.labels[i], metric.format_value(v));
                Bar::new(i as f64, v).width(0.6).name(hover)
            })
            .collect();

        Plot::new(format!("bar_{:?}", metric))
            .height(280.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label(metric.axis_label())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(metric.color()));
            });
    }

    /// Sales-share pie with percentage labels; the plot keeps a 1:1 aspect.
    pub fn draw_pie_chart(ui: &mut egui::Ui, data: &SalesChartData) {
        let slices = data.pie_slices();
        if slices.is_empty() {
            ui.label(RichText::new("Sin ventas para graficar").color(Color32::GRAY));
            return;
        }

        Plot::new("pie_sales_share")
            .height(320.0)
            .data_aspect(1.0)
            .show_axes([false, false])
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.6)
            .include_x(1.6)
            .include_y(-1.3)
            .include_y(1.3)
            .show(ui, |plot_ui| {
                for (i, slice) in slices.iter().enumerate() {
                    let color = Self::slice_color(i);
                    let outline = wedge_outline(slice, 1.0, 120);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(outline))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&slice.label),
                    );

                    let mid = slice.mid_angle();
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                            RichText::new(format_share(slice.fraction)).color(Color32::WHITE),
                        )
                        .anchor(Align2::CENTER_CENTER),
                    );

                    let anchor = if mid.cos() >= 0.0 {
                        Align2::LEFT_CENTER
                    } else {
                        Align2::RIGHT_CENTER
                    };
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(1.1 * mid.cos(), 1.1 * mid.sin()),
                            RichText::new(&slice.label),
                        )
                        .anchor(anchor),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> SalesChartData {
        SalesChartData {
            labels: vec!["Ana Perez".into(), "Luis Gomez".into(), "Eva Ruiz".into()],
            units: vec![10.0, 20.0, 0.0],
            sales: vec![100.0, 300.0, 0.0],
        }
    }

    #[test]
    fn hover_values_match_metric_formatting() {
        assert_eq!(BarMetric::UnitsSold.format_value(10.0), "10");
        assert_eq!(BarMetric::UnitsSold.format_value(10.5), "10");
        assert_eq!(BarMetric::TotalSales.format_value(1234.5), "$1,234.50");
    }

    #[test]
    fn series_follow_row_order_with_nulls_as_zero() {
        let df = df!(
            "vendedor" => [Some("Ana Perez"), None],
            "unidades_vendidas" => [Some(10i64), None],
            "ventas_totales" => [100.0, 300.0]
        )
        .unwrap();

        let data = SalesChartData::from_dataframe(&df).unwrap();
        assert_eq!(data.labels, vec!["Ana Perez", UNNAMED_LABEL]);
        assert_eq!(data.units, vec![10.0, 0.0]);
        assert_eq!(data.sales, vec![100.0, 300.0]);
    }

    #[test]
    fn pie_fractions_cover_positive_sales() {
        let slices = data().pie_slices();

        assert_eq!(slices.len(), 2);
        assert!((slices[0].fraction - 0.25).abs() < 1e-12);
        assert!((slices[1].fraction - 0.75).abs() < 1e-12);
        assert_eq!(format_share(slices[0].fraction), "25.0%");
    }

    #[test]
    fn pie_starts_at_ninety_degrees_and_closes_the_circle() {
        let slices = data().pie_slices();

        assert!((slices[0].start_angle - FRAC_PI_2).abs() < 1e-12);
        assert!((slices[0].end_angle - slices[1].start_angle).abs() < 1e-12);
        assert!((slices[1].end_angle - (FRAC_PI_2 + TAU)).abs() < 1e-9);
    }

    #[test]
    fn pie_is_empty_without_sales() {
        let data = SalesChartData {
            labels: vec!["Ana Perez".into()],
            units: vec![1.0],
            sales: vec![0.0],
        };
        assert!(data.pie_slices().is_empty());
    }

    #[test]
    fn wedge_outline_starts_at_center_and_stays_on_radius() {
        let slices = data().pie_slices();
        let outline = wedge_outline(&slices[0], 2.0, 64);

        assert_eq!(outline[0], [0.0, 0.0]);
        for point in &outline[1..] {
            let r = (point[0].powi(2) + point[1].powi(2)).sqrt();
            assert!((r - 2.0).abs() < 1e-9);
        }
        // first arc point is straight up
        assert!(outline[1][0].abs() < 1e-9);
        assert!((outline[1][1] - 2.0).abs() < 1e-9);
    }
}
