pub mod error;
pub mod fetch;
pub mod pages;
pub mod retry;
pub mod table;
pub mod types;

pub use error::ScraperError;
pub use fetch::{SiteFetcher, BROWSER_UA};
pub use pages::{normalize_price, parse_category_page, parse_product_page, resolve_site_url};
pub use table::{CanonicalSpecTable, SpecRow, SpecTable};
pub use types::{CategoryPage, ProductAnchor, ProductGroup, ProductPage};
