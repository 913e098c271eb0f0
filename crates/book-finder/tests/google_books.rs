use book_finder::api::{OrderBy, SearchBackend, SearchRequest};
use book_finder::{CategoryDiscoverer, GoogleBooksClient, PageOutcome, SearchSession};
use serde_json::{json, Value};
use shared::{Config, FinderError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GoogleBooksClient {
    let mut config = Config::default();
    config.api.base_url = format!("{}/books/v1/volumes", server.uri());
    config.api.timeout_secs = 5;
    GoogleBooksClient::new(&config.api, "test-key").expect("client")
}

fn volumes(prefix: &str, count: usize, language: &str) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|n| {
            json!({
                "id": format!("{}-{}", prefix, n),
                "volumeInfo": {
                    "title": format!("Book {} {}", prefix, n),
                    "authors": ["Someone"],
                    "language": language,
                    "categories": ["Fiction"]
                }
            })
        })
        .collect();
    json!({ "kind": "books#volumes", "totalItems": 1000, "items": items })
}

fn request() -> SearchRequest {
    SearchRequest {
        term: "Ciencia OR Historia".to_string(),
        print_type: "books".to_string(),
        order_by: OrderBy::Newest,
        max_results: 40,
        start_index: 40,
        lang_restrict: Some("es".to_string()),
    }
}

#[tokio::test]
async fn client_sends_expected_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "Ciencia OR Historia"))
        .and(query_param("printType", "books"))
        .and(query_param("orderBy", "newest"))
        .and(query_param("maxResults", "40"))
        .and(query_param("startIndex", "40"))
        .and(query_param("key", "test-key"))
        .and(query_param("langRestrict", "es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volumes("a", 3, "es")))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server).search(&request()).await.expect("search ok");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, "a-0");
    assert_eq!(items[0].categories(), ["Fiction".to_string()]);
}

#[tokio::test]
async fn client_treats_missing_items_as_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"kind": "books#volumes", "totalItems": 0})),
        )
        .mount(&server)
        .await;

    let items = client_for(&server).search(&request()).await.expect("search ok");
    assert!(items.is_empty());
}

#[tokio::test]
async fn client_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).search(&request()).await.unwrap_err();
    assert!(matches!(err, FinderError::Transport(_)));
}

#[tokio::test]
async fn client_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).search(&request()).await.unwrap_err();
    assert!(matches!(err, FinderError::Transport(_)));
}

#[tokio::test]
async fn session_paginates_until_underfilled_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("startIndex", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volumes("p0", 40, "es")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("startIndex", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volumes("p1", 12, "es")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = SearchSession::from_config(&Config::default());
    session.toggle_category("science");

    session.search(&client).await;
    let outcome = session.load_more(&client, true).await;
    assert_eq!(
        outcome,
        Some(PageOutcome::Appended {
            accepted: 12,
            exhausted: true
        })
    );

    assert!(session.load_more(&client, true).await.is_none());
    assert_eq!(session.items().len(), 52);
    assert_eq!(session.results().next_offset(), 80);
}

#[tokio::test]
async fn discovery_runs_alongside_first_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("orderBy", "relevance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "1", "volumeInfo": {"title": "a", "language": "es", "categories": ["Poetry", "Fiction"]}},
                {"id": "2", "volumeInfo": {"title": "b", "language": "en", "categories": ["Fiction"]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("orderBy", "newest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volumes("s", 5, "es")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = SearchSession::from_config(&Config::default());
    let discoverer = CategoryDiscoverer::new("libros", 40);

    let (ranked, first_page) = tokio::join!(discoverer.discover(&client), session.search(&client));
    assert!(matches!(first_page, Some(PageOutcome::Appended { accepted: 5, .. })));

    assert!(session.apply_discovery(ranked));
    let labels: Vec<_> = session
        .catalog()
        .options()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, ["Fiction", "Poetry"]);
    assert_eq!(session.items().len(), 5);
}

#[tokio::test]
async fn failed_page_keeps_results_and_retries_same_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("startIndex", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volumes("p0", 40, "es")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("startIndex", "40"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("startIndex", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volumes("p1", 3, "es")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = SearchSession::from_config(&Config::default());

    session.search(&client).await;
    assert_eq!(session.load_more(&client, true).await, Some(PageOutcome::Failed));
    assert!(session.results().last_error().is_some());
    assert_eq!(session.items().len(), 40);

    let retried = session.load_more(&client, true).await;
    assert!(matches!(retried, Some(PageOutcome::Appended { accepted: 3, .. })));
    assert_eq!(session.results().last_error(), None);
    assert_eq!(session.items().len(), 43);
}
