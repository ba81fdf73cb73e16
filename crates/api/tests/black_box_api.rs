use cartkit_api::config::ApiConfig;
use reqwest::{StatusCode, header};
use serde_json::Value;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = cartkit_api::app::build_app(&ApiConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One shopper: keeps its session cookie and never follows redirects.
fn shopper() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn summary_json(client: &reqwest::Client, server: &TestServer) -> Value {
    let res = client
        .get(server.url("/cart"))
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn add_item(client: &reqwest::Client, server: &TestServer, sku: &str, price: u64, quantity: u32) {
    let res = client
        .post(server.url("/cart/items"))
        .form(&[
            ("sku", sku.to_string()),
            ("unit_price", price.to_string()),
            ("quantity", quantity.to_string()),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

fn first_item_id(ctx: &Value) -> String {
    ctx["cart"]["items"][0]["id"].as_str().unwrap().to_string()
}

fn flash_messages(ctx: &Value) -> Vec<String> {
    ctx["flashes"]
        .as_array()
        .map(|f| {
            f.iter()
                .filter_map(|v| v["message"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn().await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn first_visit_sets_session_cookie_and_renders_empty_cart() {
    let server = TestServer::spawn().await;
    let client = shopper();

    let res = client.get(server.url("/cart")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("cart_session="));

    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = res.text().await.unwrap();
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn added_items_show_up_in_the_summary() {
    let server = TestServer::spawn().await;
    let client = shopper();

    add_item(&client, &server, "mug", 450, 2).await;
    add_item(&client, &server, "mug", 450, 1).await;

    let ctx = summary_json(&client, &server).await;
    assert_eq!(ctx["cart"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(ctx["cart"]["items"][0]["quantity"], 3);
    assert_eq!(ctx["cart"]["total"], 1350);
    assert_eq!(ctx["form"]["submitted"], false);
}

#[tokio::test]
async fn sessions_do_not_share_carts() {
    let server = TestServer::spawn().await;
    let alice = shopper();
    let bob = shopper();

    add_item(&alice, &server, "mug", 450, 1).await;

    let ctx = summary_json(&bob, &server).await;
    assert!(ctx["cart"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn valid_save_updates_quantities_and_flashes_once() {
    let server = TestServer::spawn().await;
    let client = shopper();

    add_item(&client, &server, "mug", 450, 1).await;
    let id = first_item_id(&summary_json(&client, &server).await);

    let res = client
        .post(server.url("/cart"))
        .header(header::ACCEPT, "application/json")
        .form(&[(format!("items[{id}][quantity]"), "4".to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let ctx: Value = res.json().await.unwrap();
    assert_eq!(ctx["cart"]["total"], 1800);
    assert_eq!(ctx["form"]["valid"], true);
    assert_eq!(flash_messages(&ctx), vec!["Your cart has been updated."]);

    // Persisted, and the flash is gone once shown.
    let ctx = summary_json(&client, &server).await;
    assert_eq!(ctx["cart"]["items"][0]["quantity"], 4);
    assert!(flash_messages(&ctx).is_empty());
}

#[tokio::test]
async fn invalid_save_reports_errors_and_keeps_the_cart() {
    let server = TestServer::spawn().await;
    let client = shopper();

    add_item(&client, &server, "mug", 450, 2).await;
    let id = first_item_id(&summary_json(&client, &server).await);

    let res = client
        .post(server.url("/cart"))
        .header(header::ACCEPT, "application/json")
        .form(&[(format!("items[{id}][quantity]"), "0".to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let ctx: Value = res.json().await.unwrap();
    assert_eq!(ctx["form"]["submitted"], true);
    assert_eq!(ctx["form"]["valid"], false);
    assert_eq!(
        ctx["form"]["fields"][0]["errors"][0],
        "This value should be 1 or more."
    );
    assert!(flash_messages(&ctx).is_empty());

    let ctx = summary_json(&client, &server).await;
    assert_eq!(ctx["cart"]["items"][0]["quantity"], 2);
    assert_eq!(ctx["cart"]["total"], 900);
}

#[tokio::test]
async fn clear_redirects_to_summary_with_an_empty_cart() {
    let server = TestServer::spawn().await;
    let client = shopper();

    add_item(&client, &server, "mug", 450, 2).await;

    let res = client.post(server.url("/cart/clear")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/cart");

    let ctx = summary_json(&client, &server).await;
    assert!(ctx["cart"]["items"].as_array().unwrap().is_empty());
    assert_eq!(flash_messages(&ctx), vec!["Your cart has been cleared."]);
}

#[tokio::test]
async fn removing_an_item_recalculates_totals() {
    let server = TestServer::spawn().await;
    let client = shopper();

    add_item(&client, &server, "mug", 450, 1).await;
    add_item(&client, &server, "tee", 1500, 1).await;
    let id = first_item_id(&summary_json(&client, &server).await);

    let res = client
        .post(server.url(&format!("/cart/items/{id}/remove")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let ctx = summary_json(&client, &server).await;
    assert_eq!(ctx["cart"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(ctx["cart"]["total"], 1500);

    let res = client
        .post(server.url(&format!("/cart/items/{id}/remove")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
