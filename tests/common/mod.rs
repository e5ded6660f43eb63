//! In-process fake HTTP services for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const RERANK_PATH: &str = "/rerank";
pub const EMBEDDINGS_PATH: &str = "/v1/embeddings";

/// How a fake service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Well-formed response, results in reverse input order.
    Ok,
    /// Well-formed response missing the last input.
    Short,
    ServerError,
    /// 200 with a body that is not JSON.
    Garbage,
}

pub struct FakeService {
    pub addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    last_auth: Arc<Mutex<Option<String>>>,
    handle: JoinHandle<()>,
}

impl FakeService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    pub fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().clone()
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

type ScoreFn = Arc<dyn Fn(&str, &str) -> f32 + Send + Sync>;

#[derive(Clone)]
struct ServiceState {
    behavior: Behavior,
    score_fn: ScoreFn,
    requests: Arc<AtomicUsize>,
    last_auth: Arc<Mutex<Option<String>>>,
}

impl ServiceState {
    fn record(&self, headers: &HeaderMap) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.last_auth.lock() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }
}

#[derive(Deserialize)]
struct RerankRequest {
    query: String,
    documents: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

/// Cross-encoder fake at [`RERANK_PATH`], scoring each (query, document) with `score_fn`.
pub async fn spawn_reranker<F>(behavior: Behavior, score_fn: F) -> FakeService
where
    F: Fn(&str, &str) -> f32 + Send + Sync + 'static,
{
    let state = new_state(behavior, Arc::new(score_fn));
    let router = Router::new()
        .route(RERANK_PATH, post(rerank_handler))
        .with_state(state.clone());
    serve(router, state).await
}

/// Embeddings fake at [`EMBEDDINGS_PATH`]. Each vector is `[len(text), 1.0, 0.0]`.
pub async fn spawn_embedder(behavior: Behavior) -> FakeService {
    let state = new_state(behavior, Arc::new(|_, _| 0.0));
    let router = Router::new()
        .route(EMBEDDINGS_PATH, post(embeddings_handler))
        .with_state(state.clone());
    serve(router, state).await
}

fn new_state(behavior: Behavior, score_fn: ScoreFn) -> ServiceState {
    ServiceState {
        behavior,
        score_fn,
        requests: Arc::new(AtomicUsize::new(0)),
        last_auth: Arc::new(Mutex::new(None)),
    }
}

async fn serve(router: Router, state: ServiceState) -> FakeService {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake service");
    let addr = listener.local_addr().expect("no local addr");
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    FakeService {
        addr,
        requests: state.requests,
        last_auth: state.last_auth,
        handle,
    }
}

fn failure(behavior: Behavior) -> Option<Response> {
    match behavior {
        Behavior::ServerError => {
            Some((StatusCode::INTERNAL_SERVER_ERROR, "model not loaded").into_response())
        }
        Behavior::Garbage => Some((StatusCode::OK, "<html>oops</html>").into_response()),
        Behavior::Ok | Behavior::Short => None,
    }
}

async fn rerank_handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Json(request): Json<RerankRequest>,
) -> Response {
    state.record(&headers);
    if let Some(response) = failure(state.behavior) {
        return response;
    }

    let mut documents = request.documents;
    if state.behavior == Behavior::Short {
        documents.pop();
    }

    let results: Vec<Value> = documents
        .iter()
        .rev()
        .map(|doc| json!({ "document": doc, "score": (state.score_fn)(&request.query, doc.as_str()) }))
        .collect();
    Json(results).into_response()
}

async fn embeddings_handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Json(request): Json<EmbeddingsRequest>,
) -> Response {
    state.record(&headers);
    if let Some(response) = failure(state.behavior) {
        return response;
    }

    let mut input = request.input;
    if state.behavior == Behavior::Short {
        input.pop();
    }

    let data: Vec<Value> = input
        .iter()
        .enumerate()
        .rev()
        .map(|(index, text)| {
            json!({
                "object": "embedding",
                "index": index,
                "embedding": [text.len() as f32, 1.0, 0.0],
            })
        })
        .collect();
    Json(json!({ "object": "list", "data": data })).into_response()
}
