//! Dashboard View Model
//! Stateless `(table, region, representative) -> DashboardView` step that the
//! GUI renders on every pass. Sections are filled in order and the first
//! failed guard stops the pass.

use crate::charts::SalesChartData;
use crate::data::columns::{CHART_COLUMNS, COL_REGION};
use crate::data::{DataProcessor, ProcessorError, RegionFilter};
use crate::format::{format_currency, format_units};
use crate::stats::{RegionSummary, SummaryCalculator};
use polars::prelude::*;
use std::fmt;
use tracing::{error, warn};

/// Plain-text rendering of a DataFrame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let headers = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = (0..df.height())
            .map(|i| {
                df.get_columns()
                    .iter()
                    .map(|col| col.get(i).map(|v| cell_text(&v)).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

/// Guard failure that ends the render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardHalt {
    MissingRegionColumn,
    MissingChartColumn(String),
}

impl fmt::Display for DashboardHalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardHalt::MissingRegionColumn => {
                write!(f, "No se encontró la columna '{}' en el archivo.", COL_REGION)
            }
            DashboardHalt::MissingChartColumn(column) => {
                write!(f, "Falta la columna '{}' en el archivo Excel.", column)
            }
        }
    }
}

/// Region picker state plus the filtered rows.
#[derive(Debug, Clone)]
pub struct RegionSection {
    pub options: Vec<String>,
    pub selected: RegionFilter,
    pub table: TableView,
    pub summary: Vec<RegionSummary>,
}

/// Formatted metric strings.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsView {
    pub units_sold: String,
    pub total_sales: String,
}

/// Representative picker state, the matching rows and their metrics.
#[derive(Debug, Clone)]
pub struct RepresentativeSection {
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub table: TableView,
    /// `None` when the selection matched no row
    pub metrics: Option<MetricsView>,
}

/// Everything the GUI shows for one render pass.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub columns: Vec<String>,
    pub full_table: TableView,
    pub region: Option<RegionSection>,
    pub charts: Option<SalesChartData>,
    pub representative: Option<RepresentativeSection>,
    pub halt: Option<DashboardHalt>,
}

impl DashboardView {
    /// Build the view for a loaded table and the current picker choices.
    ///
    /// A region that is no longer present falls back to `todas`; a missing or
    /// stale representative choice falls back to the first option.
    pub fn build(
        table: &DataFrame,
        region: &RegionFilter,
        representative: Option<&str>,
    ) -> Result<Self, ProcessorError> {
        let full_table = TableView::from_dataframe(table);
        let mut view = Self {
            columns: full_table.headers.clone(),
            full_table,
            region: None,
            charts: None,
            representative: None,
            halt: None,
        };

        if DataProcessor::require_columns(table, &[COL_REGION]).is_err() {
            return Ok(view.halted(DashboardHalt::MissingRegionColumn));
        }

        let options = DataProcessor::region_options(table)?;
        let selected = if options.iter().any(|o| o == region.label()) {
            region.clone()
        } else {
            warn!("Region '{}' not in data, showing all regions", region);
            RegionFilter::All
        };

        let filtered = DataProcessor::filter_by_region(table, &selected)?;
        view.region = Some(RegionSection {
            options,
            selected,
            table: TableView::from_dataframe(&filtered),
            summary: Self::summary_for(&filtered)?,
        });

        if let Err(ProcessorError::MissingColumn(column)) =
            DataProcessor::require_columns(&filtered, &CHART_COLUMNS)
        {
            return Ok(view.halted(DashboardHalt::MissingChartColumn(column)));
        }
        view.charts = Some(SalesChartData::from_dataframe(&filtered)?);

        let options = DataProcessor::representatives(table)?;
        let selected = match representative {
            Some(name) if options.iter().any(|o| o == name) => Some(name.to_string()),
            _ => options.first().cloned(),
        };

        let (rows, metrics) = match &selected {
            Some(name) => {
                let rows = DataProcessor::select_representative(table, name)?;
                let metrics =
                    DataProcessor::representative_metrics(&rows)?.map(|m| MetricsView {
                        units_sold: format_units(m.units_sold),
                        total_sales: format_currency(m.total_sales),
                    });
                (TableView::from_dataframe(&rows), metrics)
            }
            None => (TableView::default(), None),
        };

        view.representative = Some(RepresentativeSection {
            options,
            selected,
            table: rows,
            metrics,
        });

        Ok(view)
    }

    fn halted(mut self, halt: DashboardHalt) -> Self {
        error!("{}", halt);
        self.halt = Some(halt);
        self
    }

    /// Summary needs the unit/sales columns too; without them it is left empty
    /// and the chart guard reports the missing column.
    fn summary_for(filtered: &DataFrame) -> Result<Vec<RegionSummary>, ProcessorError> {
        match SummaryCalculator::by_region(filtered) {
            Ok(rows) => Ok(rows),
            Err(ProcessorError::MissingColumn(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
