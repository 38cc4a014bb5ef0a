//! Threshold filtering and display ordering over the summary frame.

use polars::prelude::*;

use crate::error::DashError;
use crate::schema::{record, summary};

/// Sort key for the surviving categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    BySales,
    ByComments,
}

impl SortMode {
    fn key(self) -> &'static str {
        match self {
            SortMode::BySales => summary::TOTAL_SALES,
            SortMode::ByComments => summary::TOTAL_COMMENTS,
        }
    }
}

/// Per-view parameters. Owned by the session boundary and passed by
/// reference into every query; the core keeps no mutable view state.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub min_products: u32,
    pub min_sales: i64,
    pub sort_mode: SortMode,
    /// `None` means the implicit single-country mode over the whole snapshot.
    pub country: Option<String>,
    /// Last picked category; revalidated by [`resolve_selection`] after
    /// every filter pass.
    pub selected_category: Option<String>,
}

/// Keep categories meeting both minimum thresholds, ordered descending by
/// the sort key. Equal keys order ascending by category name so the matrix
/// layout is reproducible. Empty output is a normal result.
pub fn select_categories(
    summaries: &DataFrame,
    filter: &FilterState,
) -> Result<DataFrame, DashError> {
    let frame = summaries
        .clone()
        .lazy()
        .filter(
            col(summary::PRODUCT_COUNT)
                .gt_eq(lit(filter.min_products))
                .and(col(summary::TOTAL_SALES).gt_eq(lit(filter.min_sales))),
        )
        .sort_by_exprs(
            [col(filter.sort_mode.key()), col(record::CATEGORY)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;
    Ok(frame)
}

/// Surviving category names in display order.
pub fn category_names(valid: &DataFrame) -> Result<Vec<String>, DashError> {
    let categories = valid.column(record::CATEGORY)?.str()?;
    Ok(categories.into_iter().flatten().map(str::to_string).collect())
}

/// Revalidate a picked category against the surviving set: keep it while it
/// still appears, otherwise fall back to the first surviving category, or
/// `None` when nothing survived.
pub fn resolve_selection(
    valid: &DataFrame,
    selected: Option<&str>,
) -> Result<Option<String>, DashError> {
    let categories = valid.column(record::CATEGORY)?.str()?;
    if let Some(selected) = selected {
        if categories.into_iter().flatten().any(|c| c == selected) {
            return Ok(Some(selected.to_string()));
        }
    }
    Ok(categories.into_iter().next().flatten().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (category, product_count, total_sales, total_comments) summary rows.
    fn summaries(rows: &[(&str, i64, i64, i64)]) -> DataFrame {
        df!(
            record::CATEGORY => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            summary::PRODUCT_COUNT => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            summary::TOTAL_SALES => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            summary::TOTAL_COMMENTS => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
            summary::TOP10_SALES => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        )
        .unwrap()
    }

    fn filter(min_products: u32, min_sales: i64, sort_mode: SortMode) -> FilterState {
        FilterState {
            min_products,
            min_sales,
            sort_mode,
            ..FilterState::default()
        }
    }

    #[test]
    fn product_threshold_drops_small_categories() {
        let frame = summaries(&[("Kitchen", 12, 560, 40), ("Decor", 5, 900, 10)]);

        let valid = select_categories(&frame, &filter(10, 0, SortMode::BySales)).unwrap();
        assert_eq!(category_names(&valid).unwrap(), vec!["Kitchen"]);
    }

    #[test]
    fn both_thresholds_must_hold() {
        let frame = summaries(&[("Kitchen", 12, 560, 40), ("Storage", 15, 100, 10)]);

        let valid = select_categories(&frame, &filter(10, 200, SortMode::BySales)).unwrap();
        assert_eq!(category_names(&valid).unwrap(), vec!["Kitchen"]);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let frame = summaries(&[("Kitchen", 10, 200, 1)]);

        let valid = select_categories(&frame, &filter(10, 200, SortMode::BySales)).unwrap();
        assert_eq!(valid.height(), 1);
    }

    #[test]
    fn tightening_thresholds_never_grows_the_valid_set() {
        let frame = summaries(&[
            ("Kitchen", 12, 560, 40),
            ("Decor", 5, 900, 10),
            ("Storage", 15, 100, 10),
            ("Bath", 2, 30, 2),
        ]);

        let loose = category_names(&select_categories(&frame, &filter(0, 0, SortMode::BySales)).unwrap())
            .unwrap();
        for (p, s) in [(3u32, 50i64), (10, 200), (20, 1000)] {
            let tight =
                category_names(&select_categories(&frame, &filter(p, s, SortMode::BySales)).unwrap())
                    .unwrap();
            assert!(tight.len() <= loose.len());
            assert!(tight.iter().all(|c| loose.contains(c)));
        }
    }

    #[test]
    fn sales_mode_orders_by_total_sales_descending() {
        let frame = summaries(&[
            ("Decor", 5, 900, 10),
            ("Kitchen", 12, 560, 40),
            ("Storage", 15, 1000, 5),
        ]);

        let valid = select_categories(&frame, &filter(0, 0, SortMode::BySales)).unwrap();
        assert_eq!(
            category_names(&valid).unwrap(),
            vec!["Storage", "Decor", "Kitchen"]
        );
    }

    #[test]
    fn comments_mode_orders_by_total_comments_descending() {
        let frame = summaries(&[
            ("Decor", 5, 900, 10),
            ("Kitchen", 12, 560, 40),
            ("Storage", 15, 1000, 5),
        ]);

        let valid = select_categories(&frame, &filter(0, 0, SortMode::ByComments)).unwrap();
        assert_eq!(
            category_names(&valid).unwrap(),
            vec!["Kitchen", "Decor", "Storage"]
        );
    }

    #[test]
    fn equal_sort_keys_break_ties_by_category_name() {
        let frame = summaries(&[("Zinc", 3, 500, 1), ("Alum", 3, 500, 1), ("Mid", 3, 500, 1)]);

        let valid = select_categories(&frame, &filter(0, 0, SortMode::BySales)).unwrap();
        assert_eq!(
            category_names(&valid).unwrap(),
            vec!["Alum", "Mid", "Zinc"]
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let frame = summaries(&[]);

        let valid = select_categories(&frame, &filter(0, 0, SortMode::BySales)).unwrap();
        assert_eq!(valid.height(), 0);
        assert_eq!(resolve_selection(&valid, Some("Kitchen")).unwrap(), None);
    }

    #[test]
    fn selection_survives_while_category_remains_valid() {
        let frame = summaries(&[("Kitchen", 12, 560, 40), ("Decor", 5, 900, 10)]);
        let valid = select_categories(&frame, &filter(0, 0, SortMode::BySales)).unwrap();

        let kept = resolve_selection(&valid, Some("Kitchen")).unwrap();
        assert_eq!(kept.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn evicted_selection_falls_back_to_first_valid_category() {
        let frame = summaries(&[("Kitchen", 12, 560, 40), ("Decor", 5, 900, 10)]);
        let valid = select_categories(&frame, &filter(10, 0, SortMode::BySales)).unwrap();

        let fallback = resolve_selection(&valid, Some("Decor")).unwrap();
        assert_eq!(fallback.as_deref(), Some("Kitchen"));
    }
}
