//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo; one task per accepted connection.

use bytes::Bytes;
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Args;
use crate::db::CarStore;
use crate::routes::{self, error_response, FullBody};
use crate::types::Result;

/// Shared application state
///
/// Built once at startup after the store is connected, then shared by every
/// request. Handlers only borrow the store; nothing replaces it.
pub struct AppState {
    pub store: Arc<dyn CarStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }
}

/// Bind the configured address and serve until the process exits
pub async fn run(args: &Args, state: Arc<AppState>) -> Result<()> {
    let addr = args.listen_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Carros API listening on {}", addr);
    serve(listener, state).await
}

/// Accept loop over an already-bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { Ok::<_, Infallible>(handle_request(state, addr, req).await) }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Path shapes the router understands
#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    Health,
    Carros,
    Carro(&'a str),
    Unknown,
}

fn match_route(path: &str) -> Route<'_> {
    let path = path.trim_end_matches('/');
    if path == "/health" {
        return Route::Health;
    }

    match path.strip_prefix("/carros") {
        Some("") => Route::Carros,
        Some(rest) => match rest.strip_prefix('/') {
            Some(id) if !id.is_empty() && !id.contains('/') => Route::Carro(id),
            _ => Route::Unknown,
        },
        None => Route::Unknown,
    }
}

/// Route incoming HTTP requests
pub async fn handle_request<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> Response<FullBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    match (method, match_route(&path)) {
        (Method::GET, Route::Health) => routes::health_check(),

        (Method::GET, Route::Carros) => routes::list_carros(&state).await,
        (Method::POST, Route::Carros) => routes::create_carro(&state, req).await,

        (Method::GET, Route::Carro(id)) => routes::get_carro(&state, id).await,
        (Method::PUT, Route::Carro(id)) => routes::update_carro(&state, id, req).await,
        (Method::DELETE, Route::Carro(id)) => routes::delete_carro(&state, id).await,

        _ => not_found_response(),
    }
}

fn not_found_response() -> Response<FullBody> {
    error_response(StatusCode::NOT_FOUND, "Rota não encontrada.")
}
