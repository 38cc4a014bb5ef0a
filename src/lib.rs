//! noon-dashkit: the data core behind the Noon leaderboard dashboards.
//!
//! Loads a scraped product-ranking snapshot (one marketplace category
//! leaderboard per country), cleans it into a canonical record frame,
//! aggregates per-category statistics, and answers the view queries the
//! presentation layer renders from: the category matrix, the metric cards,
//! and the per-category drill-down.

mod aggregation;
mod detail;
mod error;
mod filter;
mod locale;
mod model;
mod normalize;
pub mod schema;

#[cfg(feature = "python")]
mod python;

pub use aggregation::{
    aggregate, overall_totals, summary_rows, CategorySummary, OverallTotals, TOP_SALES_WINDOW,
};
pub use detail::select_detail;
pub use error::DashError;
pub use filter::{category_names, resolve_selection, select_categories, FilterState, SortMode};
pub use locale::{currency_for, DEFAULT_COUNTRY};
pub use model::DashModel;
pub use normalize::{coerce_number, normalize};
