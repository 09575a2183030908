//! Column Normalization Module
//! Canonical column names and the header clean-up applied after loading.

use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const COL_FIRST_NAME: &str = "nombre";
pub const COL_LAST_NAME: &str = "apellido";
/// Synthesized display name (`nombre apellido`)
pub const COL_REPRESENTATIVE: &str = "vendedor";
pub const COL_REGION: &str = "region";
pub const COL_UNITS: &str = "unidades_vendidas";
pub const COL_SALES: &str = "ventas_totales";
pub const COL_SALES_PCT: &str = "porcentaje_ventas";

/// Source header (already normalized) → canonical name.
pub const CANONICAL_RENAMES: [(&str, &str); 4] = [
    ("región", COL_REGION),
    ("unidades_vendidas", COL_UNITS),
    ("ventas_totales", COL_SALES),
    ("porcentaje_de_ventas", COL_SALES_PCT),
];

/// Columns the charts need, checked in this order.
pub const CHART_COLUMNS: [&str; 3] = [COL_REPRESENTATIVE, COL_UNITS, COL_SALES];

/// Trim, lower-case and replace every space with `_`.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Apply header normalization, display-name synthesis and canonical renames.
pub fn normalize(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let names = dedup_headers(
        df.get_column_names()
            .iter()
            .map(|name| normalize_header(name.as_str())),
    );
    df.set_column_names(names)?;

    let has_names = df.column(COL_FIRST_NAME).is_ok() && df.column(COL_LAST_NAME).is_ok();
    if has_names {
        let display = display_names(&df)?;
        df.with_column(Column::new(COL_REPRESENTATIVE.into(), display))?;
    } else {
        debug!("No '{}'/'{}' pair, skipping display name", COL_FIRST_NAME, COL_LAST_NAME);
    }

    for (source, target) in CANONICAL_RENAMES {
        if source == target || df.column(source).is_err() {
            continue;
        }
        if df.column(target).is_ok() {
            warn!("Both '{}' and '{}' present, keeping '{}'", source, target, target);
            continue;
        }
        df.rename(source, target.into())?;
    }

    Ok(df)
}

/// Headers that collide after normalization get `_2`, `_3`, ... suffixes;
/// the first occurrence keeps the plain name.
fn dedup_headers(headers: impl Iterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut taken = HashSet::new();
    for header in headers {
        let mut candidate = header.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{}_{}", header, n);
            n += 1;
        }
        if candidate != header {
            warn!("Duplicate column '{}' renamed to '{}'", header, candidate);
        }
        taken.insert(candidate.clone());
        names.push(candidate);
    }
    names
}

/// `nombre + " " + apellido`, null when either part is null.
fn display_names(df: &DataFrame) -> PolarsResult<Vec<Option<String>>> {
    let first = df.column(COL_FIRST_NAME)?.cast(&DataType::String)?;
    let last = df.column(COL_LAST_NAME)?.cast(&DataType::String)?;

    let names = first
        .str()?
        .into_iter()
        .zip(last.str()?.into_iter())
        .map(|(first, last)| match (first, last) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        })
        .collect();

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn headers_are_trimmed_lowercased_and_underscored() {
        assert_eq!(normalize_header("  Unidades Vendidas "), "unidades_vendidas");
        assert_eq!(normalize_header("Porcentaje de Ventas"), "porcentaje_de_ventas");
        assert_eq!(normalize_header("REGIÓN"), "región");
    }

    #[test]
    fn normalize_renames_to_canonical_columns() {
        let df = df!(
            "Nombre" => ["Ana", "Luis"],
            "Apellido" => ["Perez", "Gomez"],
            "Región" => ["North", "South"],
            "Unidades Vendidas" => [10i64, 20],
            "Ventas Totales" => [100.0, 300.0],
            "Porcentaje de Ventas" => [50.0, 50.0]
        )
        .unwrap();

        let df = normalize(df).unwrap();

        assert_eq!(
            column_names(&df),
            vec![
                "nombre",
                "apellido",
                "region",
                "unidades_vendidas",
                "ventas_totales",
                "porcentaje_ventas",
                "vendedor",
            ]
        );
    }

    #[test]
    fn display_name_joins_first_and_last_with_one_space() {
        let df = df!(
            "nombre" => ["Ana", "Luis"],
            "apellido" => ["Perez", "Gomez"]
        )
        .unwrap();

        let df = normalize(df).unwrap();
        let names: Vec<Option<&str>> = df
            .column(COL_REPRESENTATIVE)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec![Some("Ana Perez"), Some("Luis Gomez")]);
    }

    #[test]
    fn display_name_is_null_when_a_part_is_missing() {
        let df = df!(
            "nombre" => [Some("Ana"), None],
            "apellido" => [None, Some("Gomez")]
        )
        .unwrap();

        let df = normalize(df).unwrap();
        assert_eq!(df.column(COL_REPRESENTATIVE).unwrap().null_count(), 2);
    }

    #[test]
    fn display_name_absent_without_both_columns() {
        let df = df!("nombre" => ["Ana"], "region" => ["North"]).unwrap();
        let df = normalize(df).unwrap();
        assert!(df.column(COL_REPRESENTATIVE).is_err());
    }

    #[test]
    fn plain_region_header_is_accepted() {
        let df = df!("Region" => ["North"]).unwrap();
        let df = normalize(df).unwrap();
        assert!(df.column(COL_REGION).is_ok());
    }

    #[test]
    fn rename_skipped_when_target_exists() {
        let df = df!("región" => ["Norte"], "region" => ["North"]).unwrap();
        let df = normalize(df).unwrap();
        assert_eq!(column_names(&df), vec!["región", "region"]);
    }

    #[test]
    fn colliding_headers_get_numbered_suffixes() {
        let df = df!(
            "Region" => ["North"],
            "region " => ["South"],
            "REGION" => ["East"]
        )
        .unwrap();

        let df = normalize(df).unwrap();
        assert_eq!(column_names(&df), vec!["region", "region_2", "region_3"]);
        assert_eq!(
            df.column(COL_REGION).unwrap().str().unwrap().get(0),
            Some("North")
        );
    }
}
