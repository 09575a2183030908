//! Sales Summary Module
//! Per-region aggregates shown under the filtered table.

use crate::data::columns::{COL_REGION, COL_SALES, COL_UNITS};
use crate::data::{DataProcessor, ProcessorError};
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::{Data, Median, Statistics};

/// Label of the row aggregating every region.
pub const OVERALL_LABEL: &str = "Total";

/// Aggregates for one region (or the whole view).
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub region: String,
    pub representatives: usize,
    pub units_total: f64,
    pub sales_total: f64,
    pub sales_mean: f64,
    pub sales_median: f64,
    /// Sample standard deviation, NaN below two rows
    pub sales_std: f64,
}

impl RegionSummary {
    fn from_values(region: &str, units: &[f64], sales: &[f64]) -> Self {
        if sales.is_empty() {
            return Self {
                region: region.to_string(),
                representatives: units.len(),
                units_total: units.iter().sum(),
                sales_total: 0.0,
                sales_mean: f64::NAN,
                sales_median: f64::NAN,
                sales_std: f64::NAN,
            };
        }

        Self {
            region: region.to_string(),
            representatives: units.len().max(sales.len()),
            units_total: units.iter().sum(),
            sales_total: sales.iter().sum(),
            sales_mean: sales.mean(),
            sales_median: Data::new(sales.to_vec()).median(),
            sales_std: sales.std_dev(),
        }
    }
}

/// Computes summary tables from the sales table.
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// One row per region (first-seen order) followed by the overall row.
    pub fn by_region(df: &DataFrame) -> Result<Vec<RegionSummary>, ProcessorError> {
        DataProcessor::require_columns(df, &[COL_REGION, COL_UNITS, COL_SALES])?;

        let regions = DataProcessor::text_values(df, COL_REGION)?;
        let units = DataProcessor::numeric_values(df, COL_UNITS)?;
        let sales = DataProcessor::numeric_values(df, COL_SALES)?;
        let order = DataProcessor::regions(df)?;

        let mut rows: Vec<RegionSummary> = order
            .par_iter()
            .map(|region| {
                let in_region = |i: &usize| regions[*i].as_deref() == Some(region.as_str());
                let region_units: Vec<f64> = (0..units.len())
                    .filter(in_region)
                    .map(|i| units[i].unwrap_or(0.0))
                    .collect();
                let region_sales: Vec<f64> = (0..sales.len())
                    .filter(in_region)
                    .filter_map(|i| sales[i])
                    .collect();
                RegionSummary::from_values(region, &region_units, &region_sales)
            })
            .collect();

        let all_units: Vec<f64> = units.iter().map(|v| v.unwrap_or(0.0)).collect();
        let all_sales: Vec<f64> = sales.iter().flatten().copied().collect();
        rows.push(RegionSummary::from_values(OVERALL_LABEL, &all_units, &all_sales));

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "region" => ["North", "South", "North", "North"],
            "unidades_vendidas" => [10i64, 20, 5, 15],
            "ventas_totales" => [100.0, 300.0, 50.0, 150.0]
        )
        .unwrap()
    }

    #[test]
    fn regions_keep_first_seen_order_and_end_with_total() {
        let rows = SummaryCalculator::by_region(&sample()).unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(labels, vec!["North", "South", "Total"]);
    }

    #[test]
    fn region_aggregates() {
        let rows = SummaryCalculator::by_region(&sample()).unwrap();
        let north = &rows[0];

        assert_eq!(north.representatives, 3);
        assert_eq!(north.units_total, 30.0);
        assert_eq!(north.sales_total, 300.0);
        assert!((north.sales_mean - 100.0).abs() < 1e-9);
        assert!((north.sales_median - 100.0).abs() < 1e-9);
        assert!((north.sales_std - 50.0).abs() < 1e-9);
    }

    #[test]
    fn single_row_region_has_undefined_std() {
        let rows = SummaryCalculator::by_region(&sample()).unwrap();
        let south = &rows[1];
        assert_eq!(south.representatives, 1);
        assert_eq!(south.sales_total, 300.0);
        assert!(south.sales_std.is_nan());
    }

    #[test]
    fn total_row_covers_every_row() {
        let rows = SummaryCalculator::by_region(&sample()).unwrap();
        let total = rows.last().unwrap();
        assert_eq!(total.representatives, 4);
        assert_eq!(total.units_total, 50.0);
        assert_eq!(total.sales_total, 600.0);
    }

    #[test]
    fn empty_table_yields_only_total() {
        let df = sample().head(Some(0));
        let rows = SummaryCalculator::by_region(&df).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].representatives, 0);
        assert!(rows[0].sales_mean.is_nan());
    }
}
