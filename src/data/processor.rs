//! Data Processor Module
//! Region filtering, representative selection and required-column checks.

use crate::data::columns::{COL_REGION, COL_REPRESENTATIVE, COL_SALES, COL_UNITS};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Label of the "all regions" choice in the region picker.
pub const ALL_REGIONS: &str = "todas";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Falta la columna '{0}' en el archivo.")]
    MissingColumn(String),
}

/// Region choice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    /// Every row
    #[default]
    All,
    /// Rows whose region equals this value exactly
    Region(String),
}

impl RegionFilter {
    /// Map a picker label back to a filter.
    pub fn from_choice(choice: &str) -> Self {
        if choice == ALL_REGIONS {
            RegionFilter::All
        } else {
            RegionFilter::Region(choice.to_string())
        }
    }

    /// Picker label for this filter.
    pub fn label(&self) -> &str {
        match self {
            RegionFilter::All => ALL_REGIONS,
            RegionFilter::Region(region) => region,
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metric values of one representative row.
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentativeMetrics {
    pub units_sold: f64,
    pub total_sales: f64,
}

/// Filtering and selection over the normalized sales table.
pub struct DataProcessor;

impl DataProcessor {
    /// Fail with the first column of `required` that the table lacks.
    pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), ProcessorError> {
        match required.iter().find(|name| df.column(name).is_err()) {
            Some(missing) => Err(ProcessorError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Column values as text (null stays `None`), for exact-match comparisons.
    pub fn text_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let as_text = Self::text_column(df, column)?;
        let values = as_text
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(values)
    }

    /// Column values as `f64` (null or unparsable stays `None`).
    pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let column = df
            .column(column)
            .map_err(|_| ProcessorError::MissingColumn(column.to_string()))?;
        let as_f64 = column.cast(&DataType::Float64)?;
        Ok(as_f64.f64()?.into_iter().collect())
    }

    /// Distinct non-null values in order of first appearance.
    pub fn distinct_values(df: &DataFrame, column: &str) -> Result<Vec<String>, ProcessorError> {
        let unique = Self::text_column(df, column)?.drop_nulls().unique_stable()?;
        let values = unique
            .str()?
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect();
        Ok(values)
    }

    /// Distinct regions present in the table.
    pub fn regions(df: &DataFrame) -> Result<Vec<String>, ProcessorError> {
        Self::distinct_values(df, COL_REGION)
    }

    /// Region picker options: `todas` followed by every distinct region.
    pub fn region_options(df: &DataFrame) -> Result<Vec<String>, ProcessorError> {
        let mut options = vec![ALL_REGIONS.to_string()];
        options.extend(Self::regions(df)?);
        Ok(options)
    }

    /// Rows matching the region filter, order preserved.
    pub fn filter_by_region(
        df: &DataFrame,
        filter: &RegionFilter,
    ) -> Result<DataFrame, ProcessorError> {
        Self::require_columns(df, &[COL_REGION])?;

        match filter {
            RegionFilter::All => Ok(df.clone()),
            RegionFilter::Region(region) => {
                let filtered = Self::filter_equal(df, COL_REGION, region)?;
                debug!("Region '{}': {} of {} rows", region, filtered.height(), df.height());
                Ok(filtered)
            }
        }
    }

    /// Distinct display names present in the table.
    pub fn representatives(df: &DataFrame) -> Result<Vec<String>, ProcessorError> {
        Self::distinct_values(df, COL_REPRESENTATIVE)
    }

    /// Every row whose display name equals `name`; may be empty.
    pub fn select_representative(df: &DataFrame, name: &str) -> Result<DataFrame, ProcessorError> {
        Self::filter_equal(df, COL_REPRESENTATIVE, name)
    }

    /// Metrics of the first row of a selection, `None` when the selection is empty.
    pub fn representative_metrics(
        rows: &DataFrame,
    ) -> Result<Option<RepresentativeMetrics>, ProcessorError> {
        Self::require_columns(rows, &[COL_UNITS, COL_SALES])?;
        if rows.height() == 0 {
            return Ok(None);
        }

        let units = Self::numeric_values(rows, COL_UNITS)?;
        let sales = Self::numeric_values(rows, COL_SALES)?;

        Ok(Some(RepresentativeMetrics {
            units_sold: units.first().copied().flatten().unwrap_or(f64::NAN),
            total_sales: sales.first().copied().flatten().unwrap_or(f64::NAN),
        }))
    }

    fn filter_equal(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame, ProcessorError> {
        let mask = Self::text_column(df, column)?.str()?.equal(value);
        Ok(df.filter(&mask)?)
    }

    /// The column cast to text, so matching compares what the user sees.
    fn text_column(df: &DataFrame, column: &str) -> Result<Column, ProcessorError> {
        let column = df
            .column(column)
            .map_err(|_| ProcessorError::MissingColumn(column.to_string()))?;
        Ok(column.cast(&DataType::String)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "vendedor" => ["Ana Perez", "Luis Gomez", "Eva Ruiz", "Ana Perez"],
            "region" => ["North", "South", "North", "East"],
            "unidades_vendidas" => [10i64, 20, 5, 7],
            "ventas_totales" => [100.0, 300.0, 50.0, 70.0]
        )
        .unwrap()
    }

    fn names(df: &DataFrame) -> Vec<Option<String>> {
        DataProcessor::text_values(df, COL_REPRESENTATIVE).unwrap()
    }

    #[test]
    fn all_returns_table_unchanged() {
        let df = sample();
        let filtered = DataProcessor::filter_by_region(&df, &RegionFilter::All).unwrap();
        assert!(filtered.equals(&df));
    }

    #[test]
    fn region_filter_keeps_only_matching_rows_in_order() {
        let df = sample();
        let filtered =
            DataProcessor::filter_by_region(&df, &RegionFilter::from_choice("North")).unwrap();

        assert_eq!(filtered.height(), 2);
        assert_eq!(
            names(&filtered),
            vec![Some("Ana Perez".to_string()), Some("Eva Ruiz".to_string())]
        );
    }

    #[test]
    fn unknown_region_yields_empty_table() {
        let filtered =
            DataProcessor::filter_by_region(&sample(), &RegionFilter::from_choice("West")).unwrap();
        assert_eq!(filtered.height(), 0);
    }

    #[test]
    fn region_filter_requires_region_column() {
        let df = df!("vendedor" => ["Ana Perez"]).unwrap();
        let err = DataProcessor::filter_by_region(&df, &RegionFilter::All).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref c) if c == "region"));
    }

    #[test]
    fn region_options_start_with_todas_in_first_seen_order() {
        assert_eq!(
            DataProcessor::region_options(&sample()).unwrap(),
            vec!["todas", "North", "South", "East"]
        );
    }

    #[test]
    fn todas_label_round_trips() {
        assert_eq!(RegionFilter::from_choice("todas"), RegionFilter::All);
        assert_eq!(RegionFilter::All.label(), "todas");
        assert_eq!(RegionFilter::from_choice("South").to_string(), "South");
    }

    #[test]
    fn representatives_are_distinct() {
        assert_eq!(
            DataProcessor::representatives(&sample()).unwrap(),
            vec!["Ana Perez", "Luis Gomez", "Eva Ruiz"]
        );
    }

    #[test]
    fn duplicate_names_select_every_row_and_metrics_use_the_first() {
        let rows = DataProcessor::select_representative(&sample(), "Ana Perez").unwrap();
        assert_eq!(rows.height(), 2);

        let metrics = DataProcessor::representative_metrics(&rows).unwrap().unwrap();
        assert_eq!(metrics.units_sold, 10.0);
        assert_eq!(metrics.total_sales, 100.0);
    }

    #[test]
    fn empty_selection_has_no_metrics() {
        let rows = DataProcessor::select_representative(&sample(), "Nadie").unwrap();
        assert_eq!(rows.height(), 0);
        assert_eq!(DataProcessor::representative_metrics(&rows).unwrap(), None);
    }

    #[test]
    fn require_columns_names_first_missing() {
        let err = DataProcessor::require_columns(&sample(), &["vendedor", "porcentaje_ventas", "x"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Falta la columna 'porcentaje_ventas' en el archivo.");
    }

    #[test]
    fn distinct_values_skip_nulls_and_keep_first_seen_order() {
        let df = df!("region" => [Some("South"), None, Some("North"), Some("South")]).unwrap();
        assert_eq!(
            DataProcessor::distinct_values(&df, "region").unwrap(),
            vec!["South", "North"]
        );
    }

    #[test]
    fn matching_compares_numeric_columns_as_text() {
        let df = df!(
            "region" => [1i64, 2, 1],
            "vendedor" => ["Ana Perez", "Luis Gomez", "Eva Ruiz"]
        )
        .unwrap();

        assert_eq!(DataProcessor::regions(&df).unwrap(), vec!["1", "2"]);
        let filtered =
            DataProcessor::filter_by_region(&df, &RegionFilter::from_choice("1")).unwrap();
        assert_eq!(
            names(&filtered),
            vec![Some("Ana Perez".to_string()), Some("Eva Ruiz".to_string())]
        );
    }

    #[test]
    fn null_region_never_matches() {
        let df = df!(
            "region" => [None, Some("North")],
            "vendedor" => ["Ana Perez", "Luis Gomez"]
        )
        .unwrap();
        let filtered =
            DataProcessor::filter_by_region(&df, &RegionFilter::from_choice("North")).unwrap();
        assert_eq!(names(&filtered), vec![Some("Luis Gomez".to_string())]);
    }
}
