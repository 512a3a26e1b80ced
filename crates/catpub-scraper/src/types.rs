use catpub_core::CategoryPath;

use crate::table::SpecTable;

/// Everything extracted from one category listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    /// One path per breadcrumb trail on the page, without the genre level.
    pub breadcrumbs: Vec<CategoryPath>,
    pub groups: Vec<ProductGroup>,
}

/// A genre heading and the product links listed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGroup {
    pub genre: String,
    pub products: Vec<ProductAnchor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAnchor {
    pub product_id: String,
    /// Detail page path relative to the site root; may be empty.
    pub href: String,
}

/// Fields extracted from one product detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub product_id: String,
    /// Absolute thumbnail URL.
    pub small_image_url: String,
    /// Absolute enlarged image URL.
    pub big_image_url: String,
    pub price: String,
    pub table: SpecTable,
}
