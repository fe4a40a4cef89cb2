use bourse_newsapi::everything::{Article, EverythingResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketDataError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source: Option<String>,
    pub author: Option<String>,
}

impl NewsArticle {
    pub fn from_article(article: &Article) -> Result<Self> {
        let published_at = DateTime::parse_from_rfc3339(article.published_at.trim())
            .map_err(|e| {
                MarketDataError::MalformedPayload(format!(
                    "article '{}' has invalid publishedAt '{}': {e}",
                    article.title, article.published_at
                ))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
            published_at,
            source: article.source.as_ref().and_then(|s| s.name.clone()),
            author: article.author.clone(),
        })
    }
}

/// Articles in feed order. The feed is requested sorted by publication date, so
/// the order is kept as is; duplicates are passed through.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsSnapshot {
    articles: Vec<NewsArticle>,
}

impl NewsSnapshot {
    pub fn from_everything(response: &EverythingResponse) -> Result<Self> {
        let Some(articles) = &response.articles else {
            let reason = response.message.clone().unwrap_or_else(|| {
                format!(
                    "response has no \"articles\" key (status {})",
                    response.status
                )
            });
            return Err(MarketDataError::MalformedPayload(reason));
        };

        let articles = articles
            .iter()
            .map(NewsArticle::from_article)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { articles })
    }

    pub fn articles(&self) -> &[NewsArticle] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn article(title: &str, published_at: &str) -> serde_json::Value {
        json!({
            "source": { "id": null, "name": "Wire" },
            "author": null,
            "title": title,
            "description": null,
            "url": format!("https://news.example/{title}"),
            "urlToImage": null,
            "publishedAt": published_at,
            "content": null
        })
    }

    fn response(value: serde_json::Value) -> EverythingResponse {
        serde_json::from_value(value).expect("envelope should deserialize")
    }

    #[test]
    fn keeps_feed_order_and_duplicates() {
        let payload = response(json!({
            "status": "ok",
            "totalResults": 3,
            "articles": [
                article("b", "2024-01-03T10:00:00Z"),
                article("a", "2024-01-02T08:15:00Z"),
                article("b", "2024-01-03T10:00:00Z")
            ]
        }));

        let snapshot = NewsSnapshot::from_everything(&payload).unwrap();

        let titles: Vec<_> = snapshot.articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "b"]);
        assert_eq!(snapshot.articles()[0], snapshot.articles()[2]);
        assert_eq!(
            snapshot.articles()[1].published_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 8, 15, 0).unwrap()
        );
        assert_eq!(snapshot.articles()[0].source.as_deref(), Some("Wire"));
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let payload = response(json!({
            "status": "ok",
            "articles": [article("a", "2024-01-02T10:00:00+02:00")]
        }));

        let snapshot = NewsSnapshot::from_everything(&payload).unwrap();

        assert_eq!(
            snapshot.articles()[0].published_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_articles_is_malformed() {
        let payload = response(json!({
            "status": "error",
            "code": "apiKeyMissing",
            "message": "Your API key is missing."
        }));

        match NewsSnapshot::from_everything(&payload) {
            Err(MarketDataError::MalformedPayload(message)) => {
                assert_eq!(message, "Your API key is missing.");
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let payload = response(json!({
            "status": "ok",
            "articles": [article("a", "last tuesday")]
        }));

        assert!(matches!(
            NewsSnapshot::from_everything(&payload),
            Err(MarketDataError::MalformedPayload(_))
        ));
    }

    #[test]
    fn empty_feed_is_empty_snapshot() {
        let payload = response(json!({ "status": "ok", "totalResults": 0, "articles": [] }));

        let snapshot = NewsSnapshot::from_everything(&payload).unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
    }
}
