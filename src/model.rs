//! Session model: owns the normalized snapshot and answers the view queries.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;

use polars::prelude::*;

use crate::aggregation::{self, CategorySummary, OverallTotals};
use crate::detail;
use crate::error::DashError;
use crate::filter::{self, FilterState};
use crate::normalize::normalize;
use crate::schema::record;

/// One loaded snapshot plus the queries the presentation layer renders from.
///
/// The normalized record frame is the only cached state; every query
/// recomputes aggregation and filtering from the current [`FilterState`], so
/// the model holds no per-view mutable state.
pub struct DashModel {
    base_path: PathBuf,
    records: Option<DataFrame>,
}

impl DashModel {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            records: None,
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load the parquet snapshot and normalize it.
    pub fn load_parquet(&mut self, filename: &str) -> Result<&DataFrame, DashError> {
        let path = self.base_path.join(filename);
        let raw = ParquetReader::new(File::open(path)?).finish()?;
        self.install(raw)
    }

    /// Load a CSV snapshot with every column read as text; the normalizer
    /// owns all numeric coercion.
    pub fn load_csv(&mut self, filename: &str) -> Result<&DataFrame, DashError> {
        let path = self.base_path.join(filename);
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0)) // all columns as String
            .try_into_reader_with_file_path(Some(path))?
            .finish()?;
        self.install(raw)
    }

    /// Normalize a snapshot frame the caller already loaded.
    pub fn load_frame(&mut self, raw: DataFrame) -> Result<&DataFrame, DashError> {
        self.install(raw)
    }

    fn install(&mut self, mut raw: DataFrame) -> Result<&DataFrame, DashError> {
        // Trim whitespace from column names before alias resolution.
        let trimmed: Vec<String> = raw
            .get_column_names_str()
            .iter()
            .map(|c| c.trim().to_string())
            .collect();
        raw.set_column_names(trimmed.as_slice())?;

        self.records = Some(normalize(&raw)?);
        Ok(self.records.as_ref().unwrap())
    }

    /// The normalized record frame for the session.
    pub fn records(&self) -> Result<&DataFrame, DashError> {
        self.records
            .as_ref()
            .ok_or_else(|| DashError::NotLoaded("records".into()))
    }

    // ── View queries ────────────────────────────────────────────────────────

    /// Surviving categories with their summary columns, in display order.
    /// Drives the category matrix.
    pub fn valid_category_frame(&self, state: &FilterState) -> Result<DataFrame, DashError> {
        let summaries = aggregation::aggregate(self.records()?, state.country.as_deref())?;
        filter::select_categories(&summaries, state)
    }

    /// Typed rows of [`Self::valid_category_frame`].
    pub fn valid_categories(&self, state: &FilterState) -> Result<Vec<CategorySummary>, DashError> {
        aggregation::summary_rows(&self.valid_category_frame(state)?)
    }

    /// Top-line totals over the surviving categories. Drives the metric cards.
    pub fn overall_totals(&self, state: &FilterState) -> Result<OverallTotals, DashError> {
        let valid = self.valid_category_frame(state)?;
        aggregation::overall_totals(self.records()?, &valid, state.country.as_deref())
    }

    /// Drill-down rows for one category, rank ascending, with heat ratios.
    pub fn category_detail(&self, category: &str, state: &FilterState) -> Result<DataFrame, DashError> {
        detail::select_detail(self.records()?, category, state.country.as_deref())
    }

    /// Revalidate the state's picked category against the current valid set.
    pub fn resolve_selection(&self, state: &FilterState) -> Result<Option<String>, DashError> {
        let valid = self.valid_category_frame(state)?;
        filter::resolve_selection(&valid, state.selected_category.as_deref())
    }

    /// Countries present in the snapshot, sorted for stable display.
    pub fn list_countries(&self) -> Result<Vec<String>, DashError> {
        let countries = self.records()?.column(record::COUNTRY)?.str()?;
        let unique: BTreeSet<&str> = countries.into_iter().flatten().collect();
        Ok(unique.into_iter().map(str::to_string).collect())
    }
}
