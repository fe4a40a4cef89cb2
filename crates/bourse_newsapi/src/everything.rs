use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::method::Method;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Relevancy,
    Popularity,
    #[default]
    PublishedAt,
}

#[derive(Serialize, Deserialize, Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct EverythingParams {
    #[serde(rename = "q")]
    pub query: String,

    #[serde(rename = "sortBy")]
    #[builder(default)]
    pub sort_by: SortBy,
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Envelope of an `/v2/everything` answer.
///
/// `articles` is only present when `status` is `"ok"`; errors carry `code` and
/// `message` instead.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EverythingResponse {
    pub status: String,
    #[serde(rename = "totalResults", skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<Article>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Article {
    pub source: Option<ArticleSource>,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

pub struct Everything;

impl Method for Everything {
    const PATH: &'static str = "/v2/everything";

    type Response = EverythingResponse;
    type Params = EverythingParams;
}
