//! Integration tests for Routine Advisor.
//!
//! Each test starts its own advisor server on an ephemeral port with an
//! in-memory session store, next to a stub chat-completion proxy that
//! answers with a canned response and counts the calls it receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p routine-advisor-integration-tests
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use reqwest::Client;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;
use url::Url;

use routine_advisor::config::{AdvisorConfig, CatalogSource, ProxyConfig, SentryConfig};
use routine_advisor::middleware::create_session_layer;
use routine_advisor::state::AppState;
use routine_advisor_core::{Catalog, Product, ProductId};

/// What the stub proxy answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    /// `200 OK` with a JSON body.
    Json(Value),
    /// A JSON body with a non-success status.
    Status(StatusCode, Value),
    /// `200 OK` with a body that is not JSON.
    Text(&'static str),
}

struct StubInner {
    reply: StubReply,
    calls: AtomicUsize,
    requests: Mutex<Vec<Value>>,
}

/// A stand-in for the chat-completion proxy.
#[derive(Clone)]
pub struct StubProxy {
    url: Url,
    inner: Arc<StubInner>,
}

impl StubProxy {
    /// Serve the stub on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(reply: StubReply) -> Self {
        let inner = Arc::new(StubInner {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/", post(complete))
            .with_state(Arc::clone(&inner));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub proxy");
        let addr = listener.local_addr().expect("stub proxy address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            url: Url::parse(&format!("http://{addr}/")).expect("stub proxy url"),
            inner,
        }
    }

    /// Number of completion requests received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Request bodies received, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the request log lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.inner.requests.lock().expect("request log").clone()
    }
}

async fn complete(State(stub): State<Arc<StubInner>>, Json(body): Json<Value>) -> Response {
    stub.calls.fetch_add(1, Ordering::SeqCst);
    stub.requests.lock().expect("request log").push(body);

    match &stub.reply {
        StubReply::Json(value) => Json(value.clone()).into_response(),
        StubReply::Status(status, value) => (*status, Json(value.clone())).into_response(),
        StubReply::Text(text) => (*text).into_response(),
    }
}

/// URL of a local port with nothing listening on it.
///
/// # Panics
///
/// Panics if a probe listener cannot be bound.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("unreachable url")
}

fn product(id: i64, category: &str, name: &str, brand: &str, description: &str) -> Product {
    Product {
        id: ProductId::new(id),
        category: category.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        image: format!("https://cdn.example.com/{id}.png"),
        description: description.to_string(),
    }
}

/// Catalog served by every test server.
///
/// # Panics
///
/// Panics if the fixture contains duplicate ids.
#[must_use]
pub fn test_catalog() -> Catalog {
    Catalog::new(vec![
        product(
            1,
            "cleanser",
            "Hydrating Facial Cleanser",
            "CeraVe",
            "Gentle non-foaming cleanser.",
        ),
        product(
            2,
            "serum",
            "Revitalift Hyaluronic Serum",
            "L'Oréal Paris",
            "Plumping serum.",
        ),
        product(
            3,
            "moisturizer",
            "Toleriane Double Repair",
            "La Roche-Posay",
            "Barrier moisturizer.",
        ),
        product(
            4,
            "cleanser",
            "Micellar Cleansing Water",
            "Garnier",
            "No-rinse micellar water.",
        ),
    ])
    .expect("test catalog")
}

fn test_config(proxy_url: Url) -> AdvisorConfig {
    AdvisorConfig {
        database_url: "sqlite::memory:".to_string(),
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        catalog: CatalogSource::parse("products.json"),
        selection_ttl: Duration::from_secs(24 * 60 * 60),
        proxy: ProxyConfig {
            url: proxy_url,
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(5),
        },
        sentry: SentryConfig::default(),
    }
}

/// A running advisor server plus a cookie-keeping browser stand-in.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub proxy: Option<StubProxy>,
}

impl TestContext {
    /// Start an advisor backed by a stub proxy answering with `reply`.
    pub async fn new(reply: StubReply) -> Self {
        let proxy = StubProxy::spawn(reply).await;
        let mut ctx = Self::serve(proxy.url.clone()).await;
        ctx.proxy = Some(proxy);
        ctx
    }

    /// Start an advisor whose proxy is unreachable.
    pub async fn with_proxy_down() -> Self {
        Self::serve(unreachable_url().await).await
    }

    async fn serve(proxy_url: Url) -> Self {
        let config = test_config(proxy_url);
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state =
            AppState::new(config, test_catalog(), None).expect("Failed to build app state");
        let app = routine_advisor::app(state, session_layer);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind advisor");
        let addr = listener.local_addr().expect("advisor address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            proxy: None,
        }
    }

    /// Absolute URL for a path on the advisor.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The stub proxy.
    ///
    /// # Panics
    ///
    /// Panics if this context was started with the proxy down.
    #[must_use]
    pub fn proxy(&self) -> &StubProxy {
        self.proxy.as_ref().expect("context has no stub proxy")
    }

    /// `GET` a path and return the response.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// `POST` a form (as HTMX would) and return the response.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Click a product card while `category` is the active filter.
    pub async fn toggle(&self, id: i64, category: &str) -> String {
        let response = self
            .post_form(
                &format!("/selection/{id}/toggle"),
                &[("category", category)],
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        response.text().await.expect("toggle body")
    }

    /// Click a sidebar remove button while `category` is the active filter.
    pub async fn remove(&self, id: i64, category: &str) -> String {
        let response = self
            .post_form(
                &format!("/selection/{id}/remove"),
                &[("category", category)],
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        response.text().await.expect("remove body")
    }

    /// Ids listed in the sidebar, in display order.
    pub async fn sidebar_ids(&self) -> Vec<i64> {
        let html = self
            .get("/selection")
            .await
            .text()
            .await
            .expect("sidebar body");
        remove_button_ids(&html)
    }
}

/// Product ids of the sidebar remove buttons found in `html`.
#[must_use]
pub fn remove_button_ids(html: &str) -> Vec<i64> {
    html.split("hx-post=\"/selection/")
        .skip(1)
        .filter_map(|rest| {
            let (id, tail) = rest.split_once('/')?;
            if tail.starts_with("remove\"") {
                id.parse().ok()
            } else {
                None
            }
        })
        .collect()
}

/// Whether the card for `id` in a grid fragment is highlighted.
#[must_use]
pub fn card_is_selected(html: &str, id: i64) -> bool {
    html.contains(&format!(
        "class=\"product-card selected\" id=\"product-{id}\""
    ))
}

/// Whether a grid fragment contains a card for `id`.
#[must_use]
pub fn card_is_shown(html: &str, id: i64) -> bool {
    html.contains(&format!("id=\"product-{id}\""))
}
