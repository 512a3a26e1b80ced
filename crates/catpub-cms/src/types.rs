//! Wire shapes for the CMS REST API and the product lookup endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a category create request.
#[derive(Debug, Serialize)]
pub(crate) struct NewCategory<'a> {
    pub name: &'a str,
    pub parent: u64,
}

/// 201 answer to category, media and article creation.
#[derive(Debug, Deserialize)]
pub(crate) struct Created {
    #[serde(deserialize_with = "flexible_id")]
    pub id: u64,
}

/// 400 answer when a category with the same name and parent exists.
#[derive(Debug, Deserialize)]
pub(crate) struct TermExists {
    pub code: String,
    pub data: TermExistsData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermExistsData {
    #[serde(deserialize_with = "flexible_id")]
    pub term_id: u64,
}

/// 201 answer to a media upload.
#[derive(Debug, Deserialize)]
pub(crate) struct MediaCreated {
    #[serde(deserialize_with = "flexible_id")]
    pub id: u64,
    pub source_url: String,
}

/// Answer of `product_Api.php`.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse {
    pub exist: LookupExist,
}

/// `exist` is `false`, a bare `true`, or the stored article's metadata.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LookupExist {
    Flag(bool),
    Found(LookupMeta),
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupMeta {
    #[serde(deserialize_with = "flexible_id")]
    pub article_id: u64,
    #[serde(default)]
    pub categories: Vec<LookupCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupCategory {
    #[serde(deserialize_with = "flexible_id")]
    pub term_id: u64,
}

/// Custom fields stored with a product article.
#[derive(Debug, Serialize)]
pub(crate) struct ArticleMeta<'a> {
    pub product_id: &'a str,
    pub price: &'a str,
    pub structure_pic: u64,
    pub table1: &'a str,
    pub table2: &'a str,
    pub size: &'a str,
}

/// Body of an article create request.
#[derive(Debug, Serialize)]
pub(crate) struct NewArticle<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub status: &'a str,
    pub author: u64,
    /// Comma-joined category ids.
    pub categories: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ArticleMeta<'a>>,
}

/// Body of an article update that only touches categories.
#[derive(Debug, Serialize)]
pub(crate) struct CategoryUpdate {
    pub categories: String,
}

/// Accepts ids sent either as JSON numbers or as numeric strings; the PHP
/// lookup endpoint is not consistent about it.
fn flexible_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
