//! Integration tests for the paginated search client, backed by a local
//! mock server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use typeahead_net::search::{Pagination, SearchClient};
use typeahead_net::{SearchError, SearchResults, UserItem};

fn client_for(server: &MockServer) -> SearchClient {
    SearchClient::builder().base_url(server.uri()).build()
}

fn user_json(login: &str, id: u64) -> serde_json::Value {
    json!({
        "login": login,
        "id": id,
        "avatar_url": format!("https://avatars.test/{id}"),
        "html_url": format!("https://github.test/{login}"),
        "type": "User",
        "score": 1.0,
    })
}

fn page(total_count: u64, users: &[serde_json::Value]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "total_count": total_count,
        "incomplete_results": false,
        "items": users,
    }))
}

#[tokio::test]
async fn test_single_page_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", "octo in:login"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(page(2, &[user_json("octocat", 1), user_json("octodog", 2)]))
        .expect(1)
        .mount(&server)
        .await;

    let results: SearchResults<UserItem> = client_for(&server)
        .search_users("octo")
        .qualifier("in", "login")
        .send()
        .await
        .unwrap();

    assert_eq!(results.total_count, 2);
    assert_eq!(results.items.len(), 2);
    assert_eq!(results.items[0].login, "octocat");
    assert_eq!(results.items[1].account_type, "User");
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(page(0, &[]))
        .expect(1)
        .mount(&server)
        .await;

    SearchClient::builder()
        .base_url(server.uri())
        .bearer_auth("t0ken")
        .build()
        .search_users("octo")
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_multi_page_accumulation() {
    let server = MockServer::start().await;

    // The first request carries no page parameter; the follow-up asks for
    // page 2 explicitly.
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("per_page", "2"))
        .and(query_param_is_missing("page"))
        .respond_with(page(4, &[user_json("a", 1), user_json("b", 2)]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("per_page", "2"))
        .and(query_param("page", "2"))
        .respond_with(page(4, &[user_json("c", 3), user_json("d", 4)]))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .search_users("octo")
        .pagination(Pagination::per_page(2).with_fetch_multiple_pages(2))
        .send()
        .await
        .unwrap();

    assert_eq!(results.total_count, 4);
    let logins: Vec<&str> = results.items.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_pagination_stops_when_results_exhausted() {
    let server = MockServer::start().await;

    // total_count equals the fetched count, so no second page is requested
    // even though three pages were asked for.
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(page(2, &[user_json("a", 1), user_json("b", 2)]))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .search_users("octo")
        .pagination(Pagination::per_page(2).with_fetch_multiple_pages(3))
        .send()
        .await
        .unwrap();

    assert_eq!(results.items.len(), 2);
}

#[tokio::test]
async fn test_exact_ceiling_stops_pagination() {
    let server = MockServer::start().await;

    // per_page 500 at page 2 lands exactly on the 1000-result window edge;
    // asking for more pages must not produce another request.
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("per_page", "500"))
        .and(query_param("page", "2"))
        .respond_with(page(5000, &[user_json("edge", 1)]))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .search_users("octo")
        .pagination(
            Pagination::per_page(500)
                .with_page(2)
                .with_fetch_multiple_pages(3),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(results.items.len(), 1);
}

#[tokio::test]
async fn test_overshooting_page_is_shrunk_to_window_remainder() {
    let server = MockServer::start().await;

    // 700 per page: page 2 would cover results 701..1400, past the window.
    // The follow-up is re-aimed at the remaining 400-result slice.
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("per_page", "700"))
        .and(query_param_is_missing("page"))
        .respond_with(page(5000, &[user_json("first", 1)]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("per_page", "400"))
        .and(query_param("page", "2"))
        .respond_with(page(5000, &[user_json("second", 2)]))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .search_users("octo")
        .pagination(Pagination::per_page(700).with_fetch_multiple_pages(2))
        .send()
        .await
        .unwrap();

    assert_eq!(results.items.len(), 2);
}

#[tokio::test]
async fn test_zero_fetch_multiple_pages_acts_as_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("per_page", "30"))
        .respond_with(page(100, &[user_json("a", 1)]))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .search_users("octo")
        .pagination(Pagination::per_page(30).with_fetch_multiple_pages(0))
        .send()
        .await
        .unwrap();

    assert_eq!(results.items.len(), 1);
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded",
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search_users("octo")
        .send()
        .await
        .unwrap_err();

    match err {
        SearchError::HttpStatus { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message.as_deref(), Some("API rate limit exceeded"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_failure_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(page(0, &[]))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search_users("a AND b AND c AND d AND e AND f AND g")
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));

    let err = client_for(&server)
        .search_users("q".repeat(257))
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));
}

#[tokio::test]
async fn test_page_observer_sees_each_accumulation_step() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param_is_missing("page"))
        .respond_with(page(3, &[user_json("a", 1), user_json("b", 2)]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("page", "2"))
        .respond_with(page(3, &[user_json("c", 3)]))
        .mount(&server)
        .await;

    let observed = Arc::new(AtomicUsize::new(0));
    let sizes = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let observed_in_callback = Arc::clone(&observed);
    let sizes_in_callback = Arc::clone(&sizes);

    let results = client_for(&server)
        .search_users("octo")
        .pagination(Pagination::per_page(2).with_fetch_multiple_pages(2))
        .on_page(move |snapshot| {
            observed_in_callback.fetch_add(1, Ordering::SeqCst);
            sizes_in_callback.lock().push(snapshot.items.len());
        })
        .send()
        .await
        .unwrap();

    assert_eq!(observed.load(Ordering::SeqCst), 2);
    assert_eq!(*sizes.lock(), vec![2, 3]);
    assert_eq!(results.items.len(), 3);
}
