use bourse_newsapi::NewsApiClient;
use bourse_newsapi::everything::{Everything, EverythingParams, SortBy};
use serde_json::json;
use tokio::test;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> NewsApiClient {
    NewsApiClient::new("news-key")
        .expect("Failed to build client")
        .with_base_url(server.uri())
}

#[test]
pub async fn fetch_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "NVDA"))
        .and(query_param("sortBy", "publishedAt"))
        .and(query_param("apiKey", "news-key"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": { "id": null, "name": "Wire" },
                    "author": null,
                    "title": "Chipmaker beats estimates",
                    "description": "Quarterly revenue rose.",
                    "url": "https://news.example/a",
                    "urlToImage": null,
                    "publishedAt": "2024-01-03T14:30:00Z",
                    "content": null
                },
                {
                    "source": { "id": "daily", "name": "Daily" },
                    "author": "J. Doe",
                    "title": "Shares slip",
                    "description": null,
                    "url": "https://news.example/b",
                    "urlToImage": "https://news.example/b.png",
                    "publishedAt": "2024-01-02T09:00:00Z",
                    "content": "..."
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .call::<Everything>(EverythingParams::builder().query("NVDA").build())
        .await
        .expect("Failed to fetch news");

    assert_eq!(response.status, "ok");
    assert_eq!(response.total_results, Some(2));

    let articles = response.articles.expect("articles missing");
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "Chipmaker beats estimates");
    assert_eq!(articles[1].description, None);
    assert_eq!(articles[1].author.as_deref(), Some("J. Doe"));
}

#[test]
pub async fn optional_params_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("pageSize", "5"))
        .and(query_param("language", "en"))
        .and(query_param("sortBy", "relevancy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 0,
            "articles": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = EverythingParams::builder()
        .query("AAPL")
        .sort_by(SortBy::Relevancy)
        .page_size(5)
        .language("en".to_string())
        .build();

    let response = client
        .call::<Everything>(params)
        .await
        .expect("Failed to fetch news");

    assert_eq!(response.articles.map(|a| a.len()), Some(0));
}

#[test]
pub async fn unauthorized_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .call::<Everything>(EverythingParams::builder().query("MSFT").build())
        .await
        .expect_err("401 must surface as an error");

    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
}

#[test]
pub async fn error_envelope_decodes_without_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "rateLimited",
            "message": "You have made too many requests recently."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .call::<Everything>(EverythingParams::builder().query("MSFT").build())
        .await
        .expect("Envelope should decode");

    assert!(response.articles.is_none());
    assert_eq!(response.code.as_deref(), Some("rateLimited"));
}
