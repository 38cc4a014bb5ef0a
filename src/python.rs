//! Python bindings: the dashboard core as an extension module.
//!
//! The Streamlit layer owns widgets and navigation; everything data-shaped
//! comes through here as polars DataFrames or plain values.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use pyo3_polars::PyDataFrame;

use crate::filter::{FilterState, SortMode};
use crate::locale;
use crate::model::DashModel;
use crate::schema::{record, sort_by, summary};

fn parse_sort_mode(token: &str) -> PyResult<SortMode> {
    match token {
        sort_by::SALES => Ok(SortMode::BySales),
        sort_by::COMMENTS => Ok(SortMode::ByComments),
        _ => Err(PyValueError::new_err(format!(
            "Invalid sort_by: '{token}'. Must be '{}' or '{}'",
            sort_by::SALES,
            sort_by::COMMENTS
        ))),
    }
}

fn view_state(
    min_products: u32,
    min_sales: i64,
    sort_by: &str,
    country: Option<String>,
    selected_category: Option<String>,
) -> PyResult<FilterState> {
    Ok(FilterState {
        min_products,
        min_sales,
        sort_mode: parse_sort_mode(sort_by)?,
        country,
        selected_category,
    })
}

#[pyclass(name = "DashModel")]
pub struct PyDashModel {
    inner: DashModel,
}

#[pymethods]
impl PyDashModel {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            inner: DashModel::new(base_path),
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load the parquet snapshot (default `noon_data.parquet`) and return
    /// the normalized record frame.
    #[pyo3(signature = (filename=None))]
    fn load_parquet(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let records = self
            .inner
            .load_parquet(filename.unwrap_or("noon_data.parquet"))?;
        Ok(PyDataFrame(records.clone()))
    }

    /// Load a CSV snapshot; every column is read as text and coerced by the
    /// normalizer.
    fn load_csv(&mut self, filename: &str) -> PyResult<PyDataFrame> {
        let records = self.inner.load_csv(filename)?;
        Ok(PyDataFrame(records.clone()))
    }

    /// Normalize a DataFrame the caller already loaded.
    fn load_frame(&mut self, snapshot: PyDataFrame) -> PyResult<PyDataFrame> {
        let records = self.inner.load_frame(snapshot.0)?;
        Ok(PyDataFrame(records.clone()))
    }

    #[getter]
    fn records_df(&self) -> PyResult<Option<PyDataFrame>> {
        Ok(self.inner.records().ok().cloned().map(PyDataFrame))
    }

    // ── View queries ────────────────────────────────────────────────────────

    /// Surviving categories with summary columns, in display order.
    #[pyo3(signature = (min_products=0, min_sales=0, sort_by="sales", country=None))]
    fn valid_categories(
        &self,
        min_products: u32,
        min_sales: i64,
        sort_by: &str,
        country: Option<String>,
    ) -> PyResult<PyDataFrame> {
        let state = view_state(min_products, min_sales, sort_by, country, None)?;
        Ok(PyDataFrame(self.inner.valid_category_frame(&state)?))
    }

    /// Metric-card totals over the surviving categories.
    #[pyo3(signature = (min_products=0, min_sales=0, sort_by="sales", country=None))]
    fn overall_totals<'py>(
        &self,
        py: Python<'py>,
        min_products: u32,
        min_sales: i64,
        sort_by: &str,
        country: Option<String>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let state = view_state(min_products, min_sales, sort_by, country, None)?;
        let totals = self.inner.overall_totals(&state)?;

        let dict = PyDict::new(py);
        dict.set_item("category_count", totals.category_count)?;
        dict.set_item(summary::PRODUCT_COUNT, totals.product_count)?;
        dict.set_item(summary::TOTAL_SALES, totals.total_sales)?;
        dict.set_item(summary::TOTAL_COMMENTS, totals.total_comments)?;
        dict.set_item(summary::TOP10_SALES, totals.top10_sales)?;
        Ok(dict)
    }

    /// Drill-down rows for one category, rank ascending, with heat ratios.
    #[pyo3(signature = (category, country=None))]
    fn category_detail(&self, category: &str, country: Option<String>) -> PyResult<PyDataFrame> {
        let state = FilterState {
            country,
            ..FilterState::default()
        };
        Ok(PyDataFrame(self.inner.category_detail(category, &state)?))
    }

    /// Keep the picked category while it stays valid, else fall back to the
    /// first valid one, else None.
    #[pyo3(signature = (selected=None, min_products=0, min_sales=0, sort_by="sales", country=None))]
    fn resolve_selection(
        &self,
        selected: Option<String>,
        min_products: u32,
        min_sales: i64,
        sort_by: &str,
        country: Option<String>,
    ) -> PyResult<Option<String>> {
        let state = view_state(min_products, min_sales, sort_by, country, selected)?;
        Ok(self.inner.resolve_selection(&state)?)
    }

    fn list_countries(&self) -> PyResult<Vec<String>> {
        Ok(self.inner.list_countries()?)
    }

    /// Display currency for a country; empty for unknown countries.
    #[staticmethod]
    fn currency_for(country: &str) -> &'static str {
        locale::currency_for(country)
    }
}

/// Export schema constants as Python submodules.
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Record
    let record_mod = PyModule::new(m.py(), "record")?;
    record_mod.add("CATEGORY", record::CATEGORY)?;
    record_mod.add("COUNTRY", record::COUNTRY)?;
    record_mod.add("RANK", record::RANK)?;
    record_mod.add("PRODUCT_NAME", record::PRODUCT_NAME)?;
    record_mod.add("PRICE", record::PRICE)?;
    record_mod.add("RATING", record::RATING)?;
    record_mod.add("REVIEW_COUNT", record::REVIEW_COUNT)?;
    record_mod.add("SALES_COUNT", record::SALES_COUNT)?;
    record_mod.add("SALES_TEXT", record::SALES_TEXT)?;
    record_mod.add("IMAGE_URL", record::IMAGE_URL)?;
    record_mod.add("PRODUCT_URL", record::PRODUCT_URL)?;
    record_mod.add("HEAT_RATIO", record::HEAT_RATIO)?;
    m.add_submodule(&record_mod)?;

    // Summary
    let summary_mod = PyModule::new(m.py(), "summary")?;
    summary_mod.add("PRODUCT_COUNT", summary::PRODUCT_COUNT)?;
    summary_mod.add("TOTAL_SALES", summary::TOTAL_SALES)?;
    summary_mod.add("TOTAL_COMMENTS", summary::TOTAL_COMMENTS)?;
    summary_mod.add("TOP10_SALES", summary::TOP10_SALES)?;
    m.add_submodule(&summary_mod)?;

    // Sort modes
    let sort_mod = PyModule::new(m.py(), "sort_by")?;
    sort_mod.add("SALES", sort_by::SALES)?;
    sort_mod.add("COMMENTS", sort_by::COMMENTS)?;
    m.add_submodule(&sort_mod)?;

    Ok(())
}

#[pymodule]
fn noon_dashkit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDashModel>()?;
    m.add("DEFAULT_COUNTRY", locale::DEFAULT_COUNTRY)?;
    add_schema_exports(m)?;
    Ok(())
}
