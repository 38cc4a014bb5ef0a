//! Drill-down: the member records of one category, in leaderboard order.

use polars::prelude::*;

use crate::aggregation::country_scope;
use crate::error::DashError;
use crate::schema::record;

/// Records of `category` in the active country scope, rank ascending
/// (stable, so equal ranks keep snapshot order), with a `heat_ratio`
/// column appended.
///
/// The heat ratio divides each record's sales by the maximum sales across
/// the whole country scope, not just the selected category, clamped to
/// [0, 1]; a zero maximum defines the ratio as zero. An unknown category
/// yields an empty frame, which is a normal "nothing to show" state.
pub fn select_detail(
    records: &DataFrame,
    category: &str,
    country: Option<&str>,
) -> Result<DataFrame, DashError> {
    let scoped = country_scope(records, country).collect()?;
    let max_sales = scoped.column(record::SALES_COUNT)?.i64()?.max().unwrap_or(0);

    let heat = if max_sales > 0 {
        let ratio = col(record::SALES_COUNT).cast(DataType::Float64) / lit(max_sales as f64);
        when(ratio.clone().gt(lit(1.0)))
            .then(lit(1.0))
            .otherwise(ratio)
    } else {
        lit(0.0)
    };

    let frame = scoped
        .lazy()
        .filter(col(record::CATEGORY).eq(lit(category)))
        .sort(
            [record::RANK],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .with_columns([heat.alias(record::HEAT_RATIO)])
        .collect()?;

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (category, country, rank, sales) rows in snapshot order.
    fn records(rows: &[(&str, &str, i64, i64)]) -> DataFrame {
        df!(
            record::CATEGORY => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            record::COUNTRY => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            record::RANK => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            record::SALES_COUNT => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn members_come_back_rank_ascending() {
        let frame = records(&[
            ("Kitchen", "阿联酋", 3, 50),
            ("Kitchen", "阿联酋", 1, 100),
            ("Decor", "阿联酋", 1, 80),
            ("Kitchen", "阿联酋", 2, 70),
        ]);

        let detail = select_detail(&frame, "Kitchen", None).unwrap();
        let ranks: Vec<i64> = detail
            .column(record::RANK)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn equal_ranks_keep_snapshot_order() {
        let frame = records(&[
            ("Kitchen", "阿联酋", 1, 11),
            ("Kitchen", "阿联酋", 1, 22),
            ("Kitchen", "阿联酋", 1, 33),
        ]);

        let detail = select_detail(&frame, "Kitchen", None).unwrap();
        let sales: Vec<i64> = detail
            .column(record::SALES_COUNT)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(sales, vec![11, 22, 33]);
    }

    #[test]
    fn unknown_category_yields_an_empty_frame() {
        let frame = records(&[("Kitchen", "阿联酋", 1, 100)]);

        let detail = select_detail(&frame, "Garden", None).unwrap();
        assert_eq!(detail.height(), 0);
        assert!(detail.column(record::HEAT_RATIO).is_ok());
    }

    #[test]
    fn heat_ratio_is_scaled_by_the_country_wide_maximum() {
        // Maximum sales live in another category on purpose.
        let frame = records(&[
            ("Kitchen", "阿联酋", 1, 2500),
            ("Decor", "阿联酋", 1, 5000),
        ]);

        let detail = select_detail(&frame, "Kitchen", None).unwrap();
        let heat = detail.column(record::HEAT_RATIO).unwrap().f64().unwrap();
        assert_eq!(heat.get(0), Some(0.5));
    }

    #[test]
    fn heat_ratio_is_zero_when_every_sale_is_zero() {
        let frame = records(&[("Kitchen", "阿联酋", 1, 0), ("Kitchen", "阿联酋", 2, 0)]);

        let detail = select_detail(&frame, "Kitchen", None).unwrap();
        let heat = detail.column(record::HEAT_RATIO).unwrap().f64().unwrap();
        assert!(heat.into_iter().flatten().all(|v| v == 0.0));
    }

    #[test]
    fn country_scope_limits_both_members_and_the_maximum() {
        let frame = records(&[
            ("Kitchen", "阿联酋", 1, 50),
            ("Kitchen", "阿联酋", 2, 100),
            ("Kitchen", "沙特", 1, 1000),
        ]);

        let detail = select_detail(&frame, "Kitchen", Some("阿联酋")).unwrap();
        assert_eq!(detail.height(), 2);
        let heat = detail.column(record::HEAT_RATIO).unwrap().f64().unwrap();
        assert_eq!(heat.get(0), Some(0.5));
        assert_eq!(heat.get(1), Some(1.0));
    }
}
