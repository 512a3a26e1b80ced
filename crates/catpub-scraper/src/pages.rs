//! Extraction of category listing pages and product detail pages.
//!
//! The catalog has one fixed layout: a category page carries breadcrumb
//! trails plus genre blocks of product links, and each product link leads to
//! a detail page with images, a price and a specification table.

use catpub_core::{CategoryPath, NEGOTIABLE_PRICE};
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::error::ScraperError;
use crate::table::{collapse_ws, selector, SpecTable};
use crate::types::{CategoryPage, ProductAnchor, ProductGroup, ProductPage};

const BREADCRUMB: &str = "div.nav-title > .layui-breadcrumb";
const GENRE_BLOCK: &str = "div.boxT > .posit-box";
const GENRE_HEADING: &str = "h2 > a";
const PRODUCT_LINK: &str = "div.hang > a";
const PRODUCT_LINK_ID: &str = "div.Product";

const PRODUCT_ID: &str = "cite";
const SMALL_IMAGE: &str = "div.layui-col-md3.detail-img-box > img";
const BIG_IMAGE: &str = "div#magnifier img";
const PRICE: &str = "div.detail-img-box > div > div > span";
const SPEC_TABLE: &str = "div.layui-row > div.layui-col-md4 > div.layui-col-md9 > table";

/// Breadcrumb trails start with a "Home" link, which is not a category.
const BREADCRUMB_SKIP: usize = 1;
/// Breadcrumbs contribute the top two levels; the genre heading is the third.
const BREADCRUMB_LEVELS: usize = 2;

/// Parses a category listing page.
///
/// Genre blocks without a heading are skipped with a warning. Product links
/// keep empty ids or hrefs so the caller decides how to treat them.
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] when the page has no usable breadcrumb.
pub fn parse_category_page(html: &str) -> Result<CategoryPage, ScraperError> {
    let document = Html::parse_document(html);

    let crumb_sel = selector(BREADCRUMB)?;
    let anchor_sel = selector("a")?;

    let mut breadcrumbs = Vec::new();
    for crumb in document.select(&crumb_sel) {
        let names: Vec<String> = crumb
            .select(&anchor_sel)
            .skip(BREADCRUMB_SKIP)
            .take(BREADCRUMB_LEVELS)
            .map(|a| collapse_ws(a.text()))
            .collect();
        match CategoryPath::new(&names) {
            Ok(path) => breadcrumbs.push(path),
            Err(e) => tracing::warn!(?names, error = %e, "ignoring unusable breadcrumb"),
        }
    }

    if breadcrumbs.is_empty() {
        return Err(ScraperError::parse(
            "category page",
            "no breadcrumb with category names",
        ));
    }

    let block_sel = selector(GENRE_BLOCK)?;
    let heading_sel = selector(GENRE_HEADING)?;
    let link_sel = selector(PRODUCT_LINK)?;
    let link_id_sel = selector(PRODUCT_LINK_ID)?;

    let mut groups = Vec::new();
    for block in document.select(&block_sel) {
        let Some(genre) = first_text(block, &heading_sel).filter(|g| !g.is_empty()) else {
            tracing::warn!("genre block without heading; skipping");
            continue;
        };

        let products = block
            .select(&link_sel)
            .map(|a| ProductAnchor {
                product_id: first_text(a, &link_id_sel).unwrap_or_default(),
                href: a.value().attr("href").unwrap_or_default().trim().to_owned(),
            })
            .collect();

        groups.push(ProductGroup { genre, products });
    }

    Ok(CategoryPage {
        breadcrumbs,
        groups,
    })
}

/// Parses a product detail page. Image URLs are resolved against `site_root`.
///
/// A missing price element is treated as a negotiable price.
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] when the product id, either image or the
/// specification table is missing, and [`ScraperError::InvalidUrl`] when an
/// image path cannot be joined onto the site root.
pub fn parse_product_page(html: &str, site_root: &Url) -> Result<ProductPage, ScraperError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let product_id = first_text(root, &selector(PRODUCT_ID)?)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ScraperError::parse("product page", "no product id"))?;

    let small_src = first_attr(root, SMALL_IMAGE, "src")?
        .ok_or_else(|| ScraperError::parse("product page", "no thumbnail image"))?;
    let big_src = first_attr(root, BIG_IMAGE, "src")?
        .ok_or_else(|| ScraperError::parse("product page", "no enlarged image"))?;

    let price = first_text(root, &selector(PRICE)?)
        .map_or_else(|| NEGOTIABLE_PRICE.to_owned(), |raw| normalize_price(&raw));

    let table_sel = selector(SPEC_TABLE)?;
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScraperError::parse("product page", "no specification table"))?;
    let table = SpecTable::parse(&table.html())?;

    Ok(ProductPage {
        product_id,
        small_image_url: resolve_site_url(site_root, &small_src)?,
        big_image_url: resolve_site_url(site_root, &big_src)?,
        price,
        table,
    })
}

/// Strips the `$ ` prefix and any thousands separators from a catalog price.
///
/// Anything that does not start with a digit, does not parse as a number, or
/// is zero becomes [`NEGOTIABLE_PRICE`].
#[must_use]
pub fn normalize_price(raw: &str) -> String {
    let price: String = raw.replace("$ ", "").trim().chars().filter(|&c| c != ',').collect();

    let starts_numeric = price.chars().next().is_some_and(|c| c.is_ascii_digit());
    match price.parse::<f64>() {
        Ok(value) if starts_numeric && value > 0.0 => price,
        Err(_) if starts_numeric => {
            tracing::warn!(raw, "unparseable price; using placeholder");
            NEGOTIABLE_PRICE.to_owned()
        }
        _ => NEGOTIABLE_PRICE.to_owned(),
    }
}

/// Joins a page-relative `href` onto the site root.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if the join fails.
pub fn resolve_site_url(site_root: &Url, href: &str) -> Result<String, ScraperError> {
    site_root
        .join(href.trim())
        .map(|u| u.to_string())
        .map_err(|e| ScraperError::InvalidUrl {
            url: href.to_owned(),
            reason: e.to_string(),
        })
}

fn first_text(scope: ElementRef<'_>, sel: &scraper::Selector) -> Option<String> {
    scope.select(sel).next().map(|el| collapse_ws(el.text()))
}

fn first_attr(
    scope: ElementRef<'_>,
    css: &str,
    attr: &str,
) -> Result<Option<String>, ScraperError> {
    let sel = selector(css)?;
    Ok(scope
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned))
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
