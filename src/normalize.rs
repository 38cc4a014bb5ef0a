//! Record normalization: raw snapshot frame in, canonical record frame out.
//!
//! The scraper emits heterogeneous columns (numbers as text with thousands
//! separators, optional columns, two spellings of the category field). This
//! module resolves the category alias, fills the country column, and coerces
//! every numeric field to a number. Coercion never fails; unparseable cells
//! become zero so a dirty snapshot still renders.

use polars::prelude::*;

use crate::error::DashError;
use crate::locale::DEFAULT_COUNTRY;
use crate::schema::{raw, record};

/// Parse a loosely formatted number: trims whitespace, strips thousands
/// separators, and falls back to zero on anything unparseable.
///
/// Invariant: the result is always a finite value >= 0.
pub fn coerce_number(text: &str) -> f64 {
    let cleaned: String = text.trim().chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value.max(0.0),
        _ => 0.0,
    }
}

/// Build the canonical record frame from a raw snapshot.
///
/// Fatal only when neither category column spelling is present. Missing
/// optional columns are materialized with defaults: the country column
/// defaults every record to [`DEFAULT_COUNTRY`], text columns to the empty
/// string, numeric columns to zero.
///
/// The input frame is not mutated; the result owns fresh columns in a fixed
/// order (category, country, rank, product_name, price, rating,
/// review_count, sales_count, sales_text, image_url, product_url).
pub fn normalize(snapshot: &DataFrame) -> Result<DataFrame, DashError> {
    let category_source = [raw::CATEGORY, raw::CATEGORY_ALIAS]
        .into_iter()
        .find(|name| snapshot.column(name).is_ok())
        .ok_or_else(|| {
            DashError::MissingColumn(format!("{} (or {})", raw::CATEGORY, raw::CATEGORY_ALIAS))
        })?;

    let columns = vec![
        text_column(snapshot, category_source, record::CATEGORY, "")?,
        text_column(snapshot, raw::COUNTRY, record::COUNTRY, DEFAULT_COUNTRY)?,
        int_column(snapshot, raw::RANK, record::RANK)?,
        text_column(snapshot, raw::PRODUCT_NAME, record::PRODUCT_NAME, "")?,
        float_column(snapshot, raw::PRICE, record::PRICE)?,
        float_column(snapshot, raw::RATING, record::RATING)?,
        int_column(snapshot, raw::REVIEW_COUNT, record::REVIEW_COUNT)?,
        int_column(snapshot, raw::SALES_COUNT, record::SALES_COUNT)?,
        text_column(snapshot, raw::SALES_TEXT, record::SALES_TEXT, "")?,
        text_column(snapshot, raw::IMAGE_URL, record::IMAGE_URL, "")?,
        text_column(snapshot, raw::PRODUCT_URL, record::PRODUCT_URL, "")?,
    ];

    Ok(DataFrame::new(columns)?)
}

// ── Column builders ─────────────────────────────────────────────────────────

/// Stringified view of a column, zero-filled through [`coerce_number`].
/// `None` when the source column is absent from the snapshot.
fn numeric_values(snapshot: &DataFrame, source: &str) -> Result<Option<Vec<f64>>, DashError> {
    let Ok(column) = snapshot.column(source) else {
        return Ok(None);
    };
    let cast = column.as_materialized_series().cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|cell| cell.map_or(0.0, coerce_number))
        .collect();
    Ok(Some(values))
}

fn float_column(snapshot: &DataFrame, source: &str, name: &str) -> Result<Column, DashError> {
    let values =
        numeric_values(snapshot, source)?.unwrap_or_else(|| vec![0.0; snapshot.height()]);
    Ok(Series::new(name.into(), values).into())
}

fn int_column(snapshot: &DataFrame, source: &str, name: &str) -> Result<Column, DashError> {
    let values: Vec<i64> = numeric_values(snapshot, source)?
        .map(|values| values.into_iter().map(|v| v as i64).collect())
        .unwrap_or_else(|| vec![0; snapshot.height()]);
    Ok(Series::new(name.into(), values).into())
}

fn text_column(
    snapshot: &DataFrame,
    source: &str,
    name: &str,
    default: &str,
) -> Result<Column, DashError> {
    let values: Vec<String> = match snapshot.column(source) {
        Ok(column) => {
            let cast = column.as_materialized_series().cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|cell| cell.map(str::trim).unwrap_or(default).to_string())
                .collect()
        }
        Err(_) => vec![default.to_string(); snapshot.height()],
    };
    Ok(Series::new(name.into(), values).into())
}
