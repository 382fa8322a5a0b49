//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use auth_proxy::credentials::CredentialHolder;
use auth_proxy::http::HttpServer;
use auth_proxy::lifecycle::Shutdown;
use auth_proxy::proxy::{Forwarder, HttpUpstreamClient, UpstreamBase};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned reply for the mock backend.
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
}

impl Reply {
    #[allow(dead_code)]
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }
}

#[derive(Clone)]
struct BackendState {
    seen: Arc<Mutex<Vec<Recorded>>>,
    reply: Reply,
}

/// Handle on a running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

/// Start a backend on an ephemeral port that records requests and replies with `reply`.
pub async fn start_mock_backend(reply: Reply) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/", any(record))
        .route("/{*path}", any(record))
        .with_state(BackendState {
            seen: seen.clone(),
            reply,
        });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, seen }
}

async fn record(State(state): State<BackendState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    state.seen.lock().unwrap().push(Recorded {
        method: parts.method,
        path_and_query: parts
            .uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_default(),
        headers: parts.headers,
        body,
    });

    let mut builder = Response::builder().status(StatusCode::from_u16(state.reply.status).unwrap());
    for (name, value) in &state.reply.headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(state.reply.body.clone())).unwrap()
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Build a forwarder with the production HTTP client.
#[allow(dead_code)]
pub fn forwarder(upstream: Option<&str>, token: Option<&str>) -> Forwarder {
    let credentials = match token {
        Some(token) => CredentialHolder::with_token(token).unwrap(),
        None => CredentialHolder::empty(),
    };
    Forwarder::new(
        upstream.map(|u| UpstreamBase::parse(u).unwrap()),
        Arc::new(credentials),
        Arc::new(HttpUpstreamClient::new().unwrap()),
    )
}

/// Serve `forwarder` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_proxy(forwarder: Forwarder) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = HttpServer::new(forwarder).run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

/// A client that talks to the proxy directly and never follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Read from `socket` until the end of the request head.
#[allow(dead_code)]
pub async fn read_head(socket: &mut TcpStream) -> Vec<u8> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    head
}

/// Start a raw TCP backend that answers every request with `response` verbatim.
#[allow(dead_code)]
pub async fn start_raw_backend(response: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        read_head(&mut socket).await;
                        let _ = socket.write_all(response).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that reads one request and never answers.
///
/// The receiver yields the outcome of the next read after the request head:
/// `Some(0)` once the proxy closes the connection, `None` if it stayed open.
#[allow(dead_code)]
pub async fn start_stalled_backend(wait: Duration) -> (SocketAddr, oneshot::Receiver<Option<usize>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_head(&mut socket).await;
        let mut buf = [0u8; 64];
        let outcome = match tokio::time::timeout(wait, socket.read(&mut buf)).await {
            Ok(Ok(n)) => Some(n),
            Ok(Err(_)) => Some(0),
            Err(_) => None,
        };
        let _ = tx.send(outcome);
    });

    (addr, rx)
}
