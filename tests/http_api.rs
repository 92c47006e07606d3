//! End-to-end tests against a real listener on an ephemeral port

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cats_server::cats::{CREATE_MESSAGE, FIND_ALL_MESSAGE};
use cats_server::config::{AppState, Config};
use cats_server::server::{create_listener, start_server_loop, SignalHandler};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1::{self, SendRequest};
use hyper::header::{ALLOW, CONTENT_TYPE, HOST};
use hyper::{HeaderMap, Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    signals: Arc<SignalHandler>,
    handle: JoinHandle<cats_server::Result<()>>,
}

impl TestServer {
    async fn start(extra_toml: &str) -> Self {
        let mut config = Config::from_toml(extra_toml).unwrap();
        config.logging.access_log = false;
        config.performance.shutdown_timeout = 2;

        let state = Arc::new(AppState::new(config).unwrap());
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());
        let handle = tokio::spawn(start_server_loop(listener, state, Arc::clone(&signals)));
        Self {
            addr,
            signals,
            handle,
        }
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: &str,
    ) -> (StatusCode, HeaderMap, Bytes) {
        request(self.addr, method, path, body).await
    }

    async fn shutdown(self) {
        self.signals.request_shutdown();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server loop should stop after shutdown")
            .expect("server task should not panic");
        assert!(result.is_ok());
    }
}

async fn connect(addr: SocketAddr) -> SendRequest<Full<Bytes>> {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(async move {
        let _ = conn.await;
    });
    sender
}

/// One request on a fresh connection, closed afterwards
async fn request(
    addr: SocketAddr,
    method: Method,
    path: &str,
    body: &str,
) -> (StatusCode, HeaderMap, Bytes) {
    let mut sender = connect(addr).await;
    send(&mut sender, addr, method, path, body).await
}

async fn send(
    sender: &mut SendRequest<Full<Bytes>>,
    addr: SocketAddr,
    method: Method,
    path: &str,
    body: &str,
) -> (StatusCode, HeaderMap, Bytes) {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .header(HOST, addr.to_string())
        .body(Full::new(Bytes::from(body.to_owned())))
        .unwrap();

    let resp = sender.send_request(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body)
}

#[tokio::test]
async fn list_cats_returns_placeholder() {
    let server = TestServer::start("").await;

    let (status, headers, body) = server.request(Method::GET, "/cats", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, FIND_ALL_MESSAGE);
    assert_eq!(headers[CONTENT_TYPE], "text/html; charset=utf-8");

    let (status, _, body) = server.request(Method::GET, "/cats?name=Tom&age=3", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, FIND_ALL_MESSAGE);

    server.shutdown().await;
}

#[tokio::test]
async fn create_cat_accepts_any_payload() {
    let server = TestServer::start("").await;

    for payload in [r#"{"name":"Whiskers"}"#, "{}", r#"{"age":"not a number"}"#, "{oops"] {
        let (status, _, body) = server.request(Method::POST, "/cats", payload).await;
        assert_eq!(status, StatusCode::OK, "payload {payload}");
        assert_eq!(body, CREATE_MESSAGE, "payload {payload}");
    }

    server.shutdown().await;
}

#[tokio::test]
async fn keep_alive_connection_serves_both_operations() {
    let server = TestServer::start("").await;
    let mut sender = connect(server.addr).await;

    let (_, _, body) = send(&mut sender, server.addr, Method::POST, "/cats", "{}").await;
    assert_eq!(body, CREATE_MESSAGE);
    let (_, _, body) = send(&mut sender, server.addr, Method::GET, "/cats", "").await;
    assert_eq!(body, FIND_ALL_MESSAGE);

    drop(sender);
    server.shutdown().await;
}

#[tokio::test]
async fn concurrent_requests_do_not_interfere() {
    let server = TestServer::start("").await;
    let addr = server.addr;

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            tokio::spawn(async move {
                let (method, expected) = if i % 2 == 0 {
                    (Method::GET, FIND_ALL_MESSAGE)
                } else {
                    (Method::POST, CREATE_MESSAGE)
                };
                let (status, _, body) = request(addr, method, "/cats", "{}").await;
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body, expected);
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    server.shutdown().await;
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let server = TestServer::start("").await;

    let (status, _, _) = server.request(Method::GET, "/dogs", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, headers, _) = server.request(Method::PUT, "/cats", "{}").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers[ALLOW], "POST, GET, HEAD, OPTIONS");

    let (status, _, body) = server.request(Method::HEAD, "/cats", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, _, body) = server.request(Method::GET, "/healthz", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    server.shutdown().await;
}

#[tokio::test]
async fn oversize_body_is_rejected() {
    let server = TestServer::start("[http]\nmax_body_size = 16").await;

    let (status, _, _) = server
        .request(Method::POST, "/cats", r#"{"name":"a rather long cat name"}"#)
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    server.shutdown().await;
}

#[tokio::test]
async fn connection_limit_drops_excess_connections() {
    let server = TestServer::start("[performance]\nmax_connections = 1").await;

    // Keep the first connection open after a completed request
    let mut first = connect(server.addr).await;
    let (status, _, _) = send(&mut first, server.addr, Method::GET, "/cats", "").await;
    assert_eq!(status, StatusCode::OK);

    let mut second = connect(server.addr).await;
    let req = Request::builder()
        .uri("/cats")
        .header(HOST, server.addr.to_string())
        .body(Full::new(Bytes::new()))
        .unwrap();
    assert!(second.send_request(req).await.is_err());

    drop(first);
    server.shutdown().await;
}

#[tokio::test]
async fn listener_closes_on_shutdown() {
    let server = TestServer::start("").await;
    let addr = server.addr;

    let (status, _, _) = server.request(Method::GET, "/cats", "").await;
    assert_eq!(status, StatusCode::OK);

    server.shutdown().await;
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn shutdown_closes_idle_keep_alive_connections() {
    let server = TestServer::start("").await;
    let addr = server.addr;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    let client_conn = tokio::spawn(conn);

    let (status, _, body) = send(&mut sender, addr, Method::GET, "/cats", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, FIND_ALL_MESSAGE);

    // The connection now sits idle with keep-alive; the grace period is 2s
    let started = Instant::now();
    server.shutdown().await;
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "shutdown waited {:?} on an idle connection",
        started.elapsed()
    );

    // Client side sees EOF and its connection task ends
    tokio::time::timeout(Duration::from_secs(1), client_conn)
        .await
        .expect("server should close the idle connection")
        .unwrap()
        .ok();
    drop(sender);
}
