//! Integration tests for Warung.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p warung-integration-tests
//! ```
//!
//! No backend is needed. Flows that place orders run against
//! [`FakeBackend`]; network behavior is exercised against an origin that
//! refuses connections ([`OFFLINE_BASE_URL`]) and against [`StubServer`], a
//! local HTTP listener with canned replies.
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to order placement, payment page, cancellation
//! - `offline_backend` - Services and session when the backend is unreachable
//! - `http_backend` - Requests and persisted state against canned responses
//! - `cart_properties` - Cart invariants under random edits

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use warung_client::models::{CreateOrderRequest, MenuItem, Order, OrderPlacement, Payment, Store};
use warung_client::services::OrderGateway;
use warung_client::storage::{FileStore, KeyValueStore};
use warung_client::{ApiClient, ClientConfig, ClientError, Result};
use warung_core::{OrderId, OrderStatus, PaymentStatus, Price};

/// Nothing listens on the discard port.
pub const OFFLINE_BASE_URL: &str = "http://127.0.0.1:9/api/v1";

// =============================================================================
// Fixtures
// =============================================================================

/// An available menu.
#[must_use]
pub fn menu(id: &str, name: &str, price: i64) -> MenuItem {
    decode(json!({
        "id": id,
        "name": name,
        "price": price,
        "is_available": true,
    }))
}

/// An open store.
#[must_use]
pub fn store(id: &str, name: &str) -> Store {
    decode(json!({
        "id": id,
        "name": name,
        "address": "Jl. Merdeka 1",
        "is_open": true,
    }))
}

/// API client for the unreachable origin, persisting into `dir`.
///
/// # Panics
///
/// Panics if the fixed base URL does not parse.
#[must_use]
pub fn offline_api(dir: &Path) -> (ApiClient, Arc<FileStore>) {
    let store = Arc::new(FileStore::new(dir));
    let shared: Arc<dyn KeyValueStore> = store.clone();
    #[allow(clippy::unwrap_used)]
    let config = ClientConfig::for_base_url(OFFLINE_BASE_URL).unwrap();
    (ApiClient::new(&config, shared), store)
}

#[allow(clippy::unwrap_used)]
fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// Fake order backend
// =============================================================================

/// How the fake backend answers `create_order`.
#[derive(Debug, Clone)]
pub enum PaymentMode {
    /// Cash, no payment page.
    Cash,
    /// An online channel with a checkout page.
    Online { url: String },
    /// An online channel whose checkout page is missing.
    OnlineWithoutUrl,
    /// The order endpoint fails.
    Unavailable,
}

/// In-memory order backend priced from a menu list.
pub struct FakeBackend {
    menu: Vec<MenuItem>,
    mode: PaymentMode,
    orders: Mutex<Vec<Order>>,
    requests: Mutex<Vec<CreateOrderRequest>>,
    next_id: AtomicU64,
}

impl FakeBackend {
    #[must_use]
    pub fn new(menu: Vec<MenuItem>, mode: PaymentMode) -> Self {
        Self {
            menu,
            mode,
            orders: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(100),
        }
    }

    /// Every `create_order` body received, including failed ones.
    #[must_use]
    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        lock(&self.requests).clone()
    }

    /// Orders as the backend holds them.
    #[must_use]
    pub fn stored_orders(&self) -> Vec<Order> {
        lock(&self.orders).clone()
    }

    /// Move an order along, as the kitchen would.
    pub fn set_status(&self, id: &OrderId, status: OrderStatus) {
        for order in lock(&self.orders).iter_mut() {
            if &order.id == id {
                order.status = status;
            }
        }
    }

    fn price_of(&self, request: &CreateOrderRequest) -> Price {
        request
            .items
            .iter()
            .filter_map(|line| {
                self.menu
                    .iter()
                    .find(|m| m.id == line.menu_id)
                    .map(|m| m.price.times(line.quantity))
            })
            .sum()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl OrderGateway for FakeBackend {
    async fn orders(&self) -> Result<Vec<Order>> {
        Ok(self.stored_orders())
    }

    async fn order(&self, id: &OrderId) -> Result<Order> {
        lock(&self.orders)
            .iter()
            .find(|order| &order.id == id)
            .cloned()
            .ok_or(ClientError::NotFound("Order"))
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderPlacement> {
        lock(&self.requests).push(request.clone());
        if matches!(self.mode, PaymentMode::Unavailable) {
            return Err(ClientError::Server);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let total = self.price_of(request);
        let method = request.payment_method.wire_code();
        let payment_url = match &self.mode {
            PaymentMode::Online { url } => Some(url.clone()),
            _ => None,
        };

        let order: Order = decode(json!({
            "id": id,
            "store_id": request.store_id.as_str(),
            "total_price": total,
            "final_price": total,
            "status": "pending",
            "payment_status": "unpaid",
            "payment_method": method,
            "payment_url": payment_url,
            "notes": request.notes,
        }));
        lock(&self.orders).push(order.clone());

        Ok(OrderPlacement {
            order,
            payment: Payment {
                payment_method: method,
                payment_url,
                status: PaymentStatus::Unpaid,
                reference: Some(format!("T{id}")),
                expired_time: None,
            },
        })
    }

    async fn cancel_order(&self, id: &OrderId) -> Result<Option<String>> {
        let mut orders = lock(&self.orders);
        let order = orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or(ClientError::NotFound("Order"))?;
        order.status = OrderStatus::Cancelled;
        Ok(Some("Order cancelled".to_string()))
    }
}

// =============================================================================
// Stub HTTP backend
// =============================================================================

/// A request as the stub server received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including any query string.
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The body parsed as JSON; `Null` when it is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// A canned reply for one method and endpoint.
#[derive(Debug, Clone)]
pub struct StubRoute {
    method: &'static str,
    path: String,
    status: u16,
    body: String,
}

impl StubRoute {
    /// Answer `method /api/v1/<endpoint>` with `status` and a JSON body.
    #[must_use]
    pub fn new(method: &'static str, endpoint: &str, status: u16, body: &serde_json::Value) -> Self {
        Self {
            method,
            path: format!("/api/v1/{endpoint}"),
            status,
            body: body.to_string(),
        }
    }
}

/// Local HTTP/1.1 server answering every connection with one canned reply.
///
/// Unknown routes answer 404. The listener stops when the server is dropped.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Bind an ephemeral port on loopback and start answering.
    ///
    /// # Panics
    ///
    /// Panics if no loopback port can be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start(routes: Vec<StubRoute>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let recorded = requests.clone();
        let task = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    // A client hanging up early only loses its own reply
                    let _ = answer(socket, &routes, &recorded).await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            requests,
            task,
        }
    }

    /// API client for this server, persisting into `dir`.
    ///
    /// # Panics
    ///
    /// Panics if the base URL does not parse.
    #[must_use]
    pub fn api(&self, dir: &Path) -> (ApiClient, Arc<FileStore>) {
        let store = Arc::new(FileStore::new(dir));
        let shared: Arc<dyn KeyValueStore> = store.clone();
        #[allow(clippy::unwrap_used)]
        let config = ClientConfig::for_base_url(&self.base_url).unwrap();
        (ApiClient::new(&config, shared), store)
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(
    mut socket: TcpStream,
    routes: &[StubRoute],
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let header_end = loop {
        if socket.read_buf(&mut buf).await? == 0 {
            return Ok(());
        }
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(buf.get(..header_end).unwrap_or_default()).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "content-length" => content_length = value.trim().parse().unwrap_or(0),
            "authorization" => authorization = Some(value.trim().to_string()),
            _ => {}
        }
    }

    while buf.len() < header_end + content_length {
        if socket.read_buf(&mut buf).await? == 0 {
            break;
        }
    }
    let body = String::from_utf8_lossy(buf.get(header_end..).unwrap_or_default()).into_owned();

    let endpoint = path.split('?').next().unwrap_or_default();
    let (status, reply) = routes
        .iter()
        .find(|route| route.method == method && route.path == endpoint)
        .map_or_else(
            || (404, json!({"success": false, "message": "Not found"}).to_string()),
            |route| (route.status, route.body.clone()),
        );

    lock(recorded).push(RecordedRequest {
        method,
        path,
        authorization,
        body,
    });

    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{reply}",
        reason = reason_phrase(status),
        len = reply.len(),
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
