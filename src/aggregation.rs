//! Category-level aggregation over the normalized record frame.

use polars::prelude::*;

use crate::error::DashError;
use crate::schema::{record, summary};

/// Window for the per-category "top sellers" sum.
pub const TOP_SALES_WINDOW: usize = 10;

/// One summary row, extracted from the aggregate frame for typed consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub product_count: i64,
    pub total_sales: i64,
    pub total_comments: i64,
    /// Sum of sales over the (at most) ten best-selling members.
    pub top10_sales: i64,
}

/// Top-line totals over the surviving categories, for the metric cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallTotals {
    pub category_count: usize,
    /// Records belonging to a surviving category.
    pub product_count: usize,
    pub total_sales: i64,
    pub total_comments: i64,
    pub top10_sales: i64,
}

/// Restrict the record frame to one country, or pass it through whole.
pub(crate) fn country_scope(records: &DataFrame, country: Option<&str>) -> LazyFrame {
    let lazy = records.clone().lazy();
    match country {
        Some(country) => lazy.filter(col(record::COUNTRY).eq(lit(country))),
        None => lazy,
    }
}

/// Group records by category and reduce each group to a summary row.
///
/// With a country given, records from other countries are dropped first;
/// categories left with zero members do not appear in the result. Group
/// order follows first appearance in the record frame; callers that need a
/// display order sort afterwards (see [`crate::select_categories`]).
pub fn aggregate(records: &DataFrame, country: Option<&str>) -> Result<DataFrame, DashError> {
    let top10 = col(record::SALES_COUNT)
        .sort(SortOptions::default().with_order_descending(true))
        .head(Some(TOP_SALES_WINDOW))
        .sum()
        .alias(summary::TOP10_SALES);

    let frame = country_scope(records, country)
        .group_by_stable([col(record::CATEGORY)])
        .agg([
            len().cast(DataType::Int64).alias(summary::PRODUCT_COUNT),
            col(record::SALES_COUNT).sum().alias(summary::TOTAL_SALES),
            col(record::REVIEW_COUNT).sum().alias(summary::TOTAL_COMMENTS),
            top10,
        ])
        .collect()?;

    Ok(frame)
}

/// Extract a summary frame into typed rows, preserving its order.
pub fn summary_rows(summaries: &DataFrame) -> Result<Vec<CategorySummary>, DashError> {
    let category = summaries.column(record::CATEGORY)?.str()?;
    let product_count = summaries.column(summary::PRODUCT_COUNT)?.i64()?;
    let total_sales = summaries.column(summary::TOTAL_SALES)?.i64()?;
    let total_comments = summaries.column(summary::TOTAL_COMMENTS)?.i64()?;
    let top10_sales = summaries.column(summary::TOP10_SALES)?.i64()?;

    let rows = (0..summaries.height())
        .map(|i| CategorySummary {
            category: category.get(i).unwrap_or("").to_string(),
            product_count: product_count.get(i).unwrap_or(0),
            total_sales: total_sales.get(i).unwrap_or(0),
            total_comments: total_comments.get(i).unwrap_or(0),
            top10_sales: top10_sales.get(i).unwrap_or(0),
        })
        .collect();

    Ok(rows)
}

/// Reduce the surviving categories to the metric-card totals.
///
/// `product_count` counts the member records of surviving categories in the
/// country scope, not summary rows, so it matches what the drill-down can
/// actually show.
pub fn overall_totals(
    records: &DataFrame,
    valid: &DataFrame,
    country: Option<&str>,
) -> Result<OverallTotals, DashError> {
    let categories = valid
        .column(record::CATEGORY)?
        .as_materialized_series()
        .clone();

    let members = country_scope(records, country)
        .filter(col(record::CATEGORY).is_in(lit(categories), false))
        .collect()?;

    Ok(OverallTotals {
        category_count: valid.height(),
        product_count: members.height(),
        total_sales: valid.column(summary::TOTAL_SALES)?.i64()?.sum().unwrap_or(0),
        total_comments: valid
            .column(summary::TOTAL_COMMENTS)?
            .i64()?
            .sum()
            .unwrap_or(0),
        top10_sales: valid.column(summary::TOP10_SALES)?.i64()?.sum().unwrap_or(0),
    })
}
