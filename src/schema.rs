//! Column-name constants for the noon-dashkit schema.
//! Single source of truth - exported to Python via PyO3.

// ── Raw snapshot columns (scraper field names) ──────────────────────────────
pub mod raw {
    /// Preferred category column; checked first.
    pub const CATEGORY: &str = "类目";
    /// Fallback category column, used when [`CATEGORY`] is absent.
    pub const CATEGORY_ALIAS: &str = "所属类目";

    pub const COUNTRY: &str = "国家";
    pub const RANK: &str = "排名";
    pub const PRODUCT_NAME: &str = "产品名";
    pub const PRICE: &str = "价格";
    pub const RATING: &str = "评分";
    pub const REVIEW_COUNT: &str = "评论数";
    pub const SALES_COUNT: &str = "销量数字";
    pub const SALES_TEXT: &str = "销量描述";
    pub const IMAGE_URL: &str = "原图链接";
    pub const PRODUCT_URL: &str = "商品链接";
}

// ── Normalized record columns ───────────────────────────────────────────────
pub mod record {
    pub const CATEGORY: &str = "category";
    pub const COUNTRY: &str = "country";
    pub const RANK: &str = "rank";
    pub const PRODUCT_NAME: &str = "product_name";
    pub const PRICE: &str = "price";
    pub const RATING: &str = "rating";
    pub const REVIEW_COUNT: &str = "review_count";
    pub const SALES_COUNT: &str = "sales_count";
    pub const SALES_TEXT: &str = "sales_text";
    pub const IMAGE_URL: &str = "image_url";
    pub const PRODUCT_URL: &str = "product_url";

    /// Derived, present only on detail frames.
    pub const HEAT_RATIO: &str = "heat_ratio";
}

// ── Category summary columns ────────────────────────────────────────────────
pub mod summary {
    pub const PRODUCT_COUNT: &str = "product_count";
    pub const TOTAL_SALES: &str = "total_sales";
    pub const TOTAL_COMMENTS: &str = "total_comments";
    pub const TOP10_SALES: &str = "top10_sales";
}

// ── Sort mode tokens ────────────────────────────────────────────────────────
pub mod sort_by {
    pub const SALES: &str = "sales";
    pub const COMMENTS: &str = "comments";
}
