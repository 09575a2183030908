//! Charts module - Chart series, interactive plots and static PNG export

mod plotter;
mod renderer;

pub use plotter::{
    wedge_outline, BarMetric, ChartPlotter, PieSlice, SalesChartData, PIE_TITLE, UNNAMED_LABEL,
};
pub use renderer::{ChartKind, RenderError, StaticChartRenderer};
