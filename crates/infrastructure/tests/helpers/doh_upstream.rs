#![allow(dead_code)]
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const ANSWER_IP: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

pub const JSON_BODY: &str = r#"{
    "Status": 0, "TC": false, "RD": true, "RA": true, "AD": false, "CD": false,
    "Question": [{"name": "example.com.", "type": 1}],
    "Answer": [{"name": "example.com.", "type": 1, "TTL": 300, "data": "93.184.216.34"}],
    "Comment": "Response from 2001:db8::1."
}"#;

#[derive(Clone)]
pub enum Behavior {
    /// Decode the query and answer with one A record.
    Answer,
    /// Answer after a delay.
    SlowAnswer(Duration),
    /// Always reply with this status and an empty body.
    Status(StatusCode),
    /// Reply with `failures` 503s, then answer.
    FailThenAnswer(usize),
    /// 200 with a body that is not a DNS message.
    Garbage,
    /// Never reply.
    Hang,
    /// Reply with [`JSON_BODY`].
    Json,
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body_len: usize,
}

struct StubState {
    behavior: Behavior,
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<SeenRequest>>,
}

/// Minimal RFC 8484 upstream bound to an ephemeral localhost port.
pub struct StubUpstream {
    addr: SocketAddr,
    state: Arc<StubState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StubUpstream {
    pub async fn start(behavior: Behavior) -> Self {
        let state = Arc::new(StubState {
            behavior,
            hits: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/dns-query", get(handle).post(handle))
            .route("/resolve", get(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/dns-query", self.addr)
    }

    pub fn json_url(&self) -> String {
        format!("http://{}/resolve", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/dns-query", addr)
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    state.seen.lock().unwrap().push(SeenRequest {
        method: method.clone(),
        query: uri.query().map(str::to_string),
        content_type: header_text(&headers, header::CONTENT_TYPE),
        accept: header_text(&headers, header::ACCEPT),
        body_len: body.len(),
    });

    let current = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(current, Ordering::SeqCst);
    let response = respond(&state.behavior, hit, &method, &uri, &body).await;
    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    response
}

async fn respond(behavior: &Behavior, hit: usize, method: &Method, uri: &Uri, body: &Bytes) -> Response {
    match behavior {
        Behavior::Answer => answer(method, uri, body),
        Behavior::SlowAnswer(delay) => {
            tokio::time::sleep(*delay).await;
            answer(method, uri, body)
        }
        Behavior::Status(status) => (*status).into_response(),
        Behavior::FailThenAnswer(failures) if hit < *failures => {
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
        Behavior::FailThenAnswer(_) => answer(method, uri, body),
        Behavior::Garbage => (
            [(header::CONTENT_TYPE, "application/dns-message")],
            vec![0xde, 0xad],
        )
            .into_response(),
        Behavior::Hang => std::future::pending::<Response>().await,
        Behavior::Json => (
            [(header::CONTENT_TYPE, "application/dns-json")],
            JSON_BODY,
        )
            .into_response(),
    }
}

fn answer(method: &Method, uri: &Uri, body: &Bytes) -> Response {
    let wire = if method == Method::POST {
        body.to_vec()
    } else {
        let Some(encoded) = uri
            .query()
            .unwrap_or_default()
            .split('&')
            .find_map(|pair| pair.strip_prefix("dns="))
        else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        match URL_SAFE_NO_PAD.decode(encoded) {
            Ok(bytes) => bytes,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        }
    };

    let Ok(request) = Message::from_vec(&wire) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    for query in request.queries() {
        response.add_query(query.clone());
        response.add_answer(Record::from_rdata(
            query.name().clone(),
            300,
            RData::A(A(ANSWER_IP)),
        ));
    }

    (
        [(header::CONTENT_TYPE, "application/dns-message")],
        response.to_vec().unwrap(),
    )
        .into_response()
}
