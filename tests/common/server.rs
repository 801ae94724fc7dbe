//! Test catalog endpoint lifecycle management
//!
//! Each test gets its own HTTP server on a random port serving a catalog
//! document whose status, body and latency can be changed at runtime.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use music_catalog::catalog::{HttpCatalogSource, TrackDefaults};
use music_catalog::{CatalogCache, CatalogFetcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

struct EndpointState {
    hits: AtomicUsize,
    response: Mutex<(StatusCode, String)>,
    delay: Mutex<Duration>,
}

async fn serve_catalog(State(state): State<Arc<EndpointState>>) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    state.response.lock().unwrap().clone()
}

/// Catalog endpoint for a single test.
///
/// When dropped, the server is shut down.
pub struct TestCatalogServer {
    /// URL of the catalog document (e.g., "http://127.0.0.1:12345/catalog")
    pub url: String,

    state: Arc<EndpointState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl TestCatalogServer {
    /// Spawns a server answering `200 OK` with `body`.
    pub async fn spawn(body: String) -> Self {
        let state = Arc::new(EndpointState {
            hits: AtomicUsize::new(0),
            response: Mutex::new((StatusCode::OK, body)),
            delay: Mutex::new(Duration::ZERO),
        });

        let app = Router::new()
            .route("/catalog", get(serve_catalog))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        Self {
            url: format!("http://127.0.0.1:{}/catalog", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn respond_with(&self, status: StatusCode, body: String) {
        *self.state.response.lock().unwrap() = (status, body);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// A fresh cache fetching from this server.
    pub fn cache(&self) -> CatalogCache {
        let source =
            HttpCatalogSource::new(self.url.clone(), 10).expect("Failed to build http source");
        let fetcher = CatalogFetcher::new(Arc::new(source), TrackDefaults::default());
        CatalogCache::new(Arc::new(fetcher))
    }
}

impl Drop for TestCatalogServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
