//! Domain types shared by the scraper, the CMS client and the crawler.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Price placeholder used when the catalog shows no usable number.
pub const NEGOTIABLE_PRICE: &str = "Negotiable";

/// Deepest supported category hierarchy.
const MAX_LEVELS: usize = 3;

/// Opaque remote category ids. Ordered so payloads are deterministic.
pub type CategoryIds = BTreeSet<u64>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("category path must have 1 to 3 levels, got {0}")]
    InvalidDepth(usize),

    #[error("category level {level} has an empty name")]
    EmptyName { level: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLevel {
    pub name: String,
}

/// An ordered list of 1 to 3 category names, top level first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPath {
    levels: Vec<CategoryLevel>,
}

impl CategoryPath {
    /// Builds a path from names ordered top level first. Names are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDepth`] for zero or more than three
    /// names and [`CatalogError::EmptyName`] when a name is blank.
    pub fn new<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let levels = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = name.as_ref().trim();
                if name.is_empty() {
                    Err(CatalogError::EmptyName { level: idx + 1 })
                } else {
                    Ok(CategoryLevel {
                        name: name.to_owned(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if levels.is_empty() || levels.len() > MAX_LEVELS {
            return Err(CatalogError::InvalidDepth(levels.len()));
        }

        Ok(Self { levels })
    }

    /// Returns a copy of this path with `name` appended as the new leaf.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CategoryPath::new`].
    pub fn with_child(&self, name: &str) -> Result<Self, CatalogError> {
        Self::new(
            self.levels
                .iter()
                .map(|l| l.name.as_str())
                .chain(std::iter::once(name)),
        )
    }

    #[must_use]
    pub fn levels(&self) -> &[CategoryLevel] {
        &self.levels
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Name of the second level, used in article titles.
    #[must_use]
    pub fn level2(&self) -> Option<&str> {
        self.levels.get(1).map(|l| l.name.as_str())
    }

    #[must_use]
    pub fn leaf(&self) -> &CategoryLevel {
        // `new` guarantees at least one level.
        &self.levels[self.levels.len() - 1]
    }
}

impl std::fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.levels.iter().map(|l| l.name.as_str()).collect();
        write!(f, "{}", names.join(" > "))
    }
}

/// Everything needed to publish one product article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub product_id: String,
    pub title: String,
    pub category_ids: CategoryIds,
    pub small_image_url: String,
    pub big_image_url: String,
    /// A bare number such as `"12.50"` or [`NEGOTIABLE_PRICE`].
    pub price: String,
    pub table1_html: String,
    pub table2_html: String,
    /// `A×B×C`, `A×B`, or empty when unknown.
    pub size: String,
}

/// Answer of the existence lookup for one product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistenceResult {
    Absent,
    /// The product exists but the lookup returned no metadata.
    ExistsBare,
    ExistsWithMeta {
        article_id: u64,
        category_ids: CategoryIds,
    },
}

impl ExistenceResult {
    #[must_use]
    pub fn exists(&self) -> bool {
        !matches!(self, ExistenceResult::Absent)
    }
}
