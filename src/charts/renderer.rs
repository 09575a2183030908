//! Static Chart Renderer
//! Renders the three dashboard charts to PNG with plotters.
//!
//! Layout per image:
//! - Bar charts: caption, one bar per representative, names rotated on the x axis
//! - Pie chart: caption, circular pie with percentage labels inside each wedge
//!   and representative names outside

use crate::charts::plotter::{wedge_outline, BarMetric, ChartPlotter, SalesChartData, PIE_TITLE};
use crate::format::format_share;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use rayon::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const FONT: &str = "sans-serif";

/// Largest accepted image side in pixels.
pub const MAX_CHART_SIDE: u32 = 8192;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
    #[error("Pixel buffer does not match image size")]
    Buffer,
    #[error("Invalid chart size {width}x{height} (each side must be 1..={max})", max = MAX_CHART_SIDE)]
    InvalidSize { width: u32, height: u32 },
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// The three exported charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    UnitsBar,
    SalesBar,
    SalesPie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::UnitsBar, ChartKind::SalesBar, ChartKind::SalesPie];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::UnitsBar => "unidades_vendidas.png",
            ChartKind::SalesBar => "ventas_totales.png",
            ChartKind::SalesPie => "porcentaje_ventas.png",
        }
    }
}

fn rgb(color: egui::Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart as PNG bytes.
    pub fn render_png(
        data: &SalesChartData,
        kind: ChartKind,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; Self::buffer_len(width, height)?];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match kind {
                ChartKind::UnitsBar => Self::draw_bar_chart(&root, data, BarMetric::UnitsSold)?,
                ChartKind::SalesBar => Self::draw_bar_chart(&root, data, BarMetric::TotalSales)?,
                ChartKind::SalesPie => Self::draw_pie_chart(&root, data)?,
            }

            root.present().map_err(draw_err)?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// RGB buffer size, rejecting empty or oversized images.
    fn buffer_len(width: u32, height: u32) -> Result<usize, RenderError> {
        let invalid = RenderError::InvalidSize { width, height };
        if !(1..=MAX_CHART_SIDE).contains(&width) || !(1..=MAX_CHART_SIDE).contains(&height) {
            return Err(invalid);
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(invalid)
    }

    /// Render all three charts in parallel and write them into `dir`.
    pub fn export_all(
        data: &SalesChartData,
        dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir)?;

        let rendered = ChartKind::ALL
            .par_iter()
            .map(|&kind| Self::render_png(data, kind, width, height).map(|png| (kind, png)))
            .collect::<Result<Vec<_>, RenderError>>()?;

        let mut written = Vec::with_capacity(rendered.len());
        for (kind, png) in rendered {
            let path = dir.join(kind.file_name());
            fs::write(&path, png)?;
            written.push(path);
        }

        info!("Exported {} charts to {}", written.len(), dir.display());
        Ok(written)
    }

    fn draw_bar_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &SalesChartData,
        metric: BarMetric,
    ) -> Result<(), RenderError> {
        let values = data.values(metric);
        let n = values.len();
        if n == 0 {
            return Self::draw_empty(root, metric.title());
        }

        let max = values.iter().copied().fold(0.0, f64::max);
        let min = values.iter().copied().fold(0.0, f64::min);
        let top = if max > 0.0 { max * 1.1 } else { 1.0 };
        let bottom = if min < 0.0 { min * 1.1 } else { 0.0 };

        let longest = data.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let label_area = (longest as u32 * 8 + 20).clamp(60, 240);

        let mut chart = ChartBuilder::on(root)
            .caption(metric.title(), (FONT, 28))
            .margin(20)
            .x_label_area_size(label_area)
            .y_label_area_size(90)
            .build_cartesian_2d((0usize..n).into_segmented(), bottom..top)
            .map_err(draw_err)?;

        let labels = &data.labels;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style((FONT, 14).into_font().transform(FontTransform::Rotate90))
            .y_desc(metric.axis_label())
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(rgb(metric.color()).filled())
                    .margin(10)
                    .data(values.iter().enumerate().map(|(i, &v)| (i, v))),
            )
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_pie_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &SalesChartData,
    ) -> Result<(), RenderError> {
        let slices = data.pie_slices();
        if slices.is_empty() {
            return Self::draw_empty(root, PIE_TITLE);
        }

        let area = root.titled(PIE_TITLE, (FONT, 28)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
        let radius = w.min(h) as f64 * 0.35;
        let to_pixel = |x: f64, y: f64| ((cx + x).round() as i32, (cy - y).round() as i32);

        let centered = Pos::new(HPos::Center, VPos::Center);
        let share_style = TextStyle::from((FONT, 18).into_font()).color(&WHITE).pos(centered);

        for (i, slice) in slices.iter().enumerate() {
            let color = rgb(ChartPlotter::slice_color(i));
            let outline: Vec<(i32, i32)> = wedge_outline(slice, radius, 240)
                .into_iter()
                .map(|[x, y]| to_pixel(x, y))
                .collect();
            area.draw(&Polygon::new(outline, color.filled())).map_err(draw_err)?;

            let mid = slice.mid_angle();
            area.draw(&Text::new(
                format_share(slice.fraction),
                to_pixel(0.6 * radius * mid.cos(), 0.6 * radius * mid.sin()),
                share_style.clone(),
            ))
            .map_err(draw_err)?;

            let h_pos = if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right };
            let label_style = TextStyle::from((FONT, 16).into_font())
                .color(&BLACK)
                .pos(Pos::new(h_pos, VPos::Center));
            area.draw(&Text::new(
                slice.label.clone(),
                to_pixel(1.1 * radius * mid.cos(), 1.1 * radius * mid.sin()),
                label_style,
            ))
            .map_err(draw_err)?;
        }

        Ok(())
    }

    fn draw_empty<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
    ) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, 28)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let grey = BLACK.mix(0.5);
        let style = TextStyle::from((FONT, 20).into_font())
            .color(&grey)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new("Sin datos", ((w / 2) as i32, (h / 2) as i32), style))
            .map_err(draw_err)?;
        Ok(())
    }
}
