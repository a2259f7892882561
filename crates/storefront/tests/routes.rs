//! Router tests against a mock marketplace API.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use ecomgo_storefront::{
    app,
    config::{MarketplaceConfig, StorefrontConfig},
    state::AppState,
};
use mockito::Matcher;
use tower::ServiceExt;
use url::Url;

fn config(server: &mockito::ServerGuard) -> StorefrontConfig {
    let api_url = Url::parse(&format!("{}/", server.url())).unwrap();
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        marketplace: MarketplaceConfig::new(api_url),
        top_rated_count: 5,
        recommended_count: 5,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn router(server: &mockito::ServerGuard) -> Router {
    app(AppState::new(config(server)).unwrap())
}

fn product_json(id: usize, name: &str, category: &str) -> serde_json::Value {
    serde_json::json!({
        "product_id": id,
        "name": name,
        "description": "Made to last",
        "image_file": format!("{id}.png"),
        "price": 10.0,
        "discount": 0.0,
        "owner": "maker",
        "category": category,
    })
}

async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(router: &Router, uri: &str, form: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(request.body(Body::from(form.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn session_cookie(response: &Response) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let server = mockito::Server::new_async().await;
    let response = get(&router(&server), "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_reports_marketplace_outage() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/get_most_rated_products")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let response = get(&router(&server), "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_short_username_is_rejected_without_calling_the_marketplace() {
    let mut server = mockito::Server::new_async().await;
    let api = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let response = post_form(
        &router(&server),
        "/account/login",
        "username=al&password=hunter2",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .contains("Username must contain at least 3 characters.")
    );
    api.assert_async().await;
}

#[tokio::test]
async fn test_account_page_redirects_when_logged_out() {
    let server = mockito::Server::new_async().await;
    let response = get(&router(&server), "/account", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");
}

#[tokio::test]
async fn test_wrong_credentials_show_login_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/log_in_account")
        .with_body(r#""Invalid credentials""#)
        .create_async()
        .await;

    let response = post_form(
        &router(&server),
        "/account/login",
        "username=alice&password=wrong",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains(
        "Either your inputted credentials are incorrect or the account does not exist."
    ));
}

#[tokio::test]
async fn test_login_then_account_page_shows_cart() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/log_in_account")
        .match_body(Matcher::Json(serde_json::json!({
            "username": "alice",
            "password": "hunter2",
        })))
        .with_body(
            serde_json::json!({
                "bio": "Collector of lamps",
                "cart": [product_json(3, "Desk Lamp", "furniture")],
            })
            .to_string(),
        )
        .create_async()
        .await;

    let router = router(&server);
    let response = post_form(
        &router,
        "/account/login",
        "username=alice&password=hunter2",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account");
    login.assert_async().await;

    let cookie = session_cookie(&response);
    let response = get(&router, "/account", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Collector of lamps"));
    assert!(body.contains("Desk Lamp"));
    assert!(body.contains("Remove from cart"));
    assert!(body.contains("$10.00"));
}

#[tokio::test]
async fn test_catalog_filters_and_paginates() {
    let mut server = mockito::Server::new_async().await;
    let products: Vec<_> = (1..=23)
        .map(|id| {
            let category = if id % 2 == 0 { "clothes" } else { "electronics" };
            product_json(id, &format!("Item {id:02}"), category)
        })
        .collect();
    server
        .mock("GET", "/get_all_products")
        .with_body(serde_json::Value::Array(products).to_string())
        .create_async()
        .await;

    let router = router(&server);

    // 23 products: pages of 10, 10, 3.
    let body = body_text(get(&router, "/products?page=3", None).await).await;
    assert!(body.contains("Item 21"));
    assert!(body.contains("Item 23"));
    assert!(!body.contains("Item 20"));

    // 11 clothes: pages of 10 and 1; page 9 clamps to the last page.
    let body = body_text(get(&router, "/products?category=Clothes&page=9", None).await).await;
    assert!(body.contains("Item 22"));
    assert!(!body.contains("Item 21"));
    assert!(!body.contains("Item 02"));
}

#[tokio::test]
async fn test_catalog_page_resets_when_inputs_change() {
    let mut server = mockito::Server::new_async().await;
    let products: Vec<_> = (1..=15)
        .map(|id| product_json(id, &format!("Item {id:02}"), "clothes"))
        .collect();
    server
        .mock("GET", "/get_all_products")
        .with_body(serde_json::Value::Array(products).to_string())
        .create_async()
        .await;

    // A page link carrying a token from other inputs lands on page 1.
    let body = body_text(
        get(
            &router(&server),
            "/products?page=2&rf=0000000000000000",
            None,
        )
        .await,
    )
    .await;
    assert!(body.contains("Item 01"));
    assert!(!body.contains("Item 15"));
}

#[tokio::test]
async fn test_empty_search_shows_no_results() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search_products")
        .match_query(Matcher::UrlEncoded(
            "search_query".into(),
            "unicorn".into(),
        ))
        .with_body("[]")
        .create_async()
        .await;

    let response = get(&router(&server), "/products?search_query=unicorn", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No results."));
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/get_most_rated_products")
        .match_query(Matcher::UrlEncoded("k".into(), "5".into()))
        .with_body(serde_json::json!([product_json(4, "Popular Mug", "accessories")]).to_string())
        .create_async()
        .await;

    let response = get(&router(&server), "/no/such/page", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_text(response).await;
    assert!(body.contains("Page not found"));
    assert!(body.contains("Popular Mug"));
}

#[tokio::test]
async fn test_missing_product_renders_not_found_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/get_product_using_id")
        .match_query(Matcher::UrlEncoded("product_id".into(), "99".into()))
        .with_body(r#""Product does not exist""#)
        .create_async()
        .await;
    server
        .mock("GET", "/get_most_rated_products")
        .match_query(Matcher::Any)
        .with_body("[]")
        .create_async()
        .await;

    let response = get(&router(&server), "/products/99", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn test_contact_form_validation() {
    let server = mockito::Server::new_async().await;
    let router = router(&server);

    let response = post_form(&router, "/about/contact_us", "email=ann%40example.com&feedback=", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Sorry, but you must include a feedback."));

    let response = post_form(
        &router,
        "/about/contact_us",
        "email=ann%40example.com&feedback=Love+it",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(
        "Thank you for contacting us! We will respond to you shortly via e-mail."
    ));
}

#[tokio::test]
async fn test_chat_falls_back_when_chatbot_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chatbot")
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/get_all_products")
        .with_body("[]")
        .create_async()
        .await;

    let router = router(&server);
    let response = post_form(&router, "/chat", "message=Where+is+my+order&redirect_to=%2Fproducts", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products#chat");

    let cookie = session_cookie(&response);
    let body = body_text(get(&router, "/products", Some(&cookie)).await).await;
    assert!(body.contains("Where is my order"));
    assert!(body.contains("Sorry, something went wrong. Please try again later."));
}

#[tokio::test]
async fn test_chat_rejects_overlong_message() {
    let mut server = mockito::Server::new_async().await;
    let chatbot = server
        .mock("POST", "/chatbot")
        .expect(0)
        .create_async()
        .await;

    let message = "a".repeat(101);
    let response = post_form(
        &router(&server),
        "/chat",
        &format!("message={message}&redirect_to=%2F"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/#chat");
    chatbot.assert_async().await;
}

#[tokio::test]
async fn test_cart_add_requires_login() {
    let server = mockito::Server::new_async().await;
    let response = post_form(
        &router(&server),
        "/cart/add",
        "product_id=3&redirect_to=%2Fproducts",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");
}

#[tokio::test]
async fn test_failed_search_keeps_shown_products() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/get_all_products")
        .with_body(serde_json::json!([product_json(1, "Shown Lamp", "furniture")]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/search_products")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let router = router(&server);
    let response = get(&router, "/products", None).await;
    let cookie = session_cookie(&response);
    assert!(body_text(response).await.contains("Shown Lamp"));

    let body = body_text(get(&router, "/products?search_query=lamp", Some(&cookie)).await).await;
    assert!(body.contains("Shown Lamp"));
    assert!(!body.contains("No results."));
    assert!(body.contains("Showing the last results we have."));
}

#[tokio::test]
async fn test_login_without_cart_fetches_it() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/log_in_account")
        .with_body(r#"{"bio": "Lamp fan"}"#)
        .create_async()
        .await;
    let cart = server
        .mock("POST", "/get_cart")
        .match_body(Matcher::Json(serde_json::json!({
            "username": "alice",
            "password": "hunter2",
        })))
        .with_body(serde_json::json!([product_json(3, "Desk Lamp", "furniture")]).to_string())
        .expect(1)
        .create_async()
        .await;

    let router = router(&server);
    let response = post_form(
        &router,
        "/account/login",
        "username=alice&password=hunter2",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    cart.assert_async().await;

    let cookie = session_cookie(&response);
    let body = body_text(get(&router, "/account", Some(&cookie)).await).await;
    assert!(body.contains("Lamp fan"));
    assert!(body.contains("Desk Lamp"));
}

/// Log in as alice with an empty cart and return the session cookie.
async fn log_in(server: &mut mockito::ServerGuard, router: &Router) -> String {
    server
        .mock("POST", "/log_in_account")
        .with_body(r#"{"bio": "", "cart": []}"#)
        .create_async()
        .await;

    let response = post_form(
        router,
        "/account/login",
        "username=alice&password=hunter2",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response)
}

#[tokio::test]
async fn test_cart_add_then_remove() {
    let mut server = mockito::Server::new_async().await;
    let router = router(&server);
    let cookie = log_in(&mut server, &router).await;

    server
        .mock("GET", "/get_product_using_id")
        .match_query(Matcher::UrlEncoded("product_id".into(), "3".into()))
        .with_body(product_json(3, "Desk Lamp", "furniture").to_string())
        .create_async()
        .await;
    let added = server
        .mock("PATCH", "/add_product_to_cart")
        .match_query(Matcher::UrlEncoded("product_id".into(), "3".into()))
        .with_body("true")
        .expect(1)
        .create_async()
        .await;
    let removed = server
        .mock("DELETE", "/remove_product_from_cart")
        .match_query(Matcher::UrlEncoded("product_id".into(), "3".into()))
        .with_body("true")
        .expect(1)
        .create_async()
        .await;

    // Adding twice only tells the marketplace once.
    for _ in 0..2 {
        let response = post_form(
            &router,
            "/cart/add",
            "product_id=3&redirect_to=%2Fproducts%2F3",
            Some(&cookie),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/products/3");
    }
    added.assert_async().await;

    let body = body_text(get(&router, "/account", Some(&cookie)).await).await;
    assert!(body.contains("Desk Lamp"));
    assert!(body.contains("Remove from cart"));

    // Removing twice likewise.
    for _ in 0..2 {
        let response = post_form(
            &router,
            "/cart/remove",
            "product_id=3&redirect_to=%2Faccount",
            Some(&cookie),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/account");
    }
    removed.assert_async().await;

    let body = body_text(get(&router, "/account", Some(&cookie)).await).await;
    assert!(!body.contains("Desk Lamp"));
}

#[tokio::test]
async fn test_cart_redirect_stays_on_site() {
    let mut server = mockito::Server::new_async().await;
    let router = router(&server);
    let cookie = log_in(&mut server, &router).await;

    let response = post_form(
        &router,
        "/cart/remove",
        "product_id=3&redirect_to=%2F%2Fevil.example",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_review_actions() {
    let mut server = mockito::Server::new_async().await;
    let router = router(&server);
    let cookie = log_in(&mut server, &router).await;

    let added = server
        .mock("PATCH", "/add_product_review")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("product_id".into(), "5".into()),
            Matcher::UrlEncoded("review".into(), "Great lamp".into()),
        ]))
        .with_body("true")
        .expect(1)
        .create_async()
        .await;
    let updated = server
        .mock("PATCH", "/update_product_review")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("product_id".into(), "5".into()),
            Matcher::UrlEncoded("review_idx".into(), "0".into()),
            Matcher::UrlEncoded("new_review".into(), "Still great".into()),
        ]))
        .with_body("true")
        .expect(1)
        .create_async()
        .await;
    let deleted = server
        .mock("DELETE", "/remove_product_review")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("product_id".into(), "5".into()),
            Matcher::UrlEncoded("review_idx".into(), "0".into()),
        ]))
        .with_body("true")
        .expect(1)
        .create_async()
        .await;

    // Blank text never reaches the marketplace.
    let response = post_form(&router, "/products/5/reviews", "review=+++", Some(&cookie)).await;
    assert_eq!(location(&response), "/products/5?add_review=1&empty_review=1");
    let response = post_form(&router, "/products/5/reviews/0", "review=", Some(&cookie)).await;
    assert_eq!(location(&response), "/products/5?edit_review=0&empty_review=1");

    let response = post_form(
        &router,
        "/products/5/reviews",
        "review=Great+lamp",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products/5");

    let response = post_form(
        &router,
        "/products/5/reviews/0",
        "review=Still+great",
        Some(&cookie),
    )
    .await;
    assert_eq!(location(&response), "/products/5");

    let response = post_form(&router, "/products/5/reviews/0/delete", "", Some(&cookie)).await;
    assert_eq!(location(&response), "/products/5");

    added.assert_async().await;
    updated.assert_async().await;
    deleted.assert_async().await;
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let server = mockito::Server::new_async().await;
    let response = get(&router(&server), "/static/css/main.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(".product-grid"));
}
