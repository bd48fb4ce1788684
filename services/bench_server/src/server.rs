//! Main benchmark WebSocket/HTTP server

use crate::connection::{parse_inbound, Connection, OutboundFrame, WsConnection};
use crate::error::{BenchError, Result};
use crate::etag::{EtagDemo, EtagReply};
use crate::registry::ConnectionRegistry;
use crate::router::{Action, EventRouter};
use crate::token::{TokenIssuer, TokenResponse};
use bench_config::BenchConfig;
use broker_client::BrokerClient;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use types::Dataset;
use warp::http::{header, StatusCode};
use warp::hyper::Body;
use warp::{Filter, Reply};

/// Main benchmark server
pub struct BenchServer {
    config: BenchConfig,
    router: Arc<EventRouter>,
    broker: Arc<BrokerClient>,
    tokens: Arc<TokenIssuer>,
    etag: Arc<EtagDemo>,
}

impl BenchServer {
    pub fn new(config: BenchConfig, dataset: Arc<Dataset>, broker: Arc<BrokerClient>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new(config.server.max_connections));
        let router = Arc::new(EventRouter::new(
            dataset,
            broker.clone(),
            config.broker.channel.clone(),
            registry,
        ));
        let tokens = Arc::new(TokenIssuer::new(&config.token));

        Self {
            config,
            router,
            broker,
            tokens,
            etag: Arc::new(EtagDemo::new()),
        }
    }

    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.server.bind_address, self.config.server.port)
            .parse()
            .map_err(|e| BenchError::Configuration {
                message: format!("Invalid bind address: {}", e),
            })
    }

    /// Serve until the listener fails or the task is cancelled
    pub async fn start(&self) -> Result<()> {
        let addr = self.bind_address()?;
        info!("Starting benchmark server on {}", addr);
        info!(
            "Dataset: {} records, broker channel: '{}'",
            self.router.dataset().len(),
            self.router.channel()
        );

        let routes = self.routes();
        if self.config.server.enable_cors {
            let cors = warp::cors()
                .allow_any_origin()
                .allow_methods(vec!["GET", "POST", "OPTIONS"])
                .allow_headers(vec!["content-type", "if-none-match"])
                .expose_headers(vec!["etag"]);
            let (_, server) = warp::serve(routes.with(cors)).try_bind_ephemeral(addr)?;
            server.await;
        } else {
            let (_, server) = warp::serve(routes).try_bind_ephemeral(addr)?;
            server.await;
        }

        Ok(())
    }

    /// All HTTP and WebSocket routes
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone + Send + Sync + 'static
    {
        // WebSocket upgrade handler (reused for both paths)
        let router = self.router.clone();
        let ws_handler = move |ws: warp::ws::Ws| {
            let router = router.clone();
            ws.on_upgrade(move |socket| Self::handle_websocket_connection(router, socket))
                .into_response()
        };
        let ws_route = warp::path("ws")
            .and(warp::path::end())
            .and(warp::ws())
            .map(ws_handler.clone());
        let socket_route = warp::path("socket")
            .and(warp::path::end())
            .and(warp::ws())
            .map(ws_handler);

        let health_route = warp::path("health")
            .and(warp::path::end())
            .map(|| warp::reply::with_status("OK", StatusCode::OK).into_response());

        let router = self.router.clone();
        let broker = self.broker.clone();
        let status_route = warp::path("status").and(warp::path::end()).map(move || {
            warp::reply::json(&serde_json::json!({
                "status": "running",
                "service": "fanout-bench-server",
                "version": env!("CARGO_PKG_VERSION"),
                "dataset_records": router.dataset().len(),
                "connections": router.registry().count(),
                "broker": broker.stats(),
            }))
            .into_response()
        });

        let tokens = self.tokens.clone();
        let token_route = warp::path!("api" / "centrifugo-token")
            .and(warp::get())
            .map(move || match tokens.issue() {
                Ok(token) => warp::reply::json(&TokenResponse { token }).into_response(),
                Err(e) => {
                    error!("Error generating token: {}", e);
                    warp::reply::with_status(
                        "Error generating token",
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response()
                }
            });

        let etag = self.etag.clone();
        let etag_route = warp::path!("api" / "etag-demo")
            .and(warp::get())
            .and(warp::header::optional::<String>("if-none-match"))
            .map(move |if_none_match: Option<String>| {
                let reply = etag.respond(if_none_match.as_deref());
                debug!("ETag demo request, client tag {:?}", if_none_match);
                Self::etag_response(etag.etag(), reply)
            });

        ws_route
            .or(socket_route)
            .unify()
            .or(health_route)
            .unify()
            .or(status_route)
            .unify()
            .or(token_route)
            .unify()
            .or(etag_route)
            .unify()
    }

    fn etag_response(tag: &str, reply: EtagReply) -> warp::reply::Response {
        match reply {
            EtagReply::NotModified => {
                let mut response = warp::reply::Response::new(Body::empty());
                *response.status_mut() = StatusCode::NOT_MODIFIED;
                response
            }
            EtagReply::Full { body } => {
                let mut response = warp::reply::Response::new(Body::from(body));
                let headers = response.headers_mut();
                if let Ok(value) = header::HeaderValue::from_str(tag) {
                    headers.insert(header::ETAG, value);
                }
                headers.insert(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static("text/plain"),
                );
                response
            }
        }
    }

    async fn handle_websocket_connection(router: Arc<EventRouter>, ws: warp::ws::WebSocket) {
        if let Err(e) = Self::handle_client_connection(router, ws).await {
            warn!("WebSocket connection error: {}", e);
        }
    }

    async fn handle_client_connection(
        router: Arc<EventRouter>,
        ws: warp::ws::WebSocket,
    ) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<OutboundFrame>();
        let handler = Arc::new(router.bind(WsConnection::new(tx))?);
        let client_id = handler.connection().id();
        info!("A user connected: {}", client_id);

        let (mut ws_sender, mut ws_receiver) = ws.split();

        loop {
            tokio::select! {
                // Outgoing frames queued by event handlers
                frame = rx.recv() => {
                    match frame {
                        Some(frame) => {
                            let len = frame.len();
                            if let Err(e) = ws_sender.send(frame.into()).await {
                                warn!("Failed to send {} bytes to client {}: {}", len, client_id, e);
                                break;
                            }
                        }
                        None => {
                            info!("Frame channel closed for client {}", client_id);
                            break;
                        }
                    }
                }

                // Incoming events
                ws_msg = ws_receiver.next() => {
                    match ws_msg {
                        Some(Ok(msg)) => {
                            if msg.is_close() {
                                break;
                            }
                            let Ok(text) = msg.to_str() else {
                                continue;
                            };
                            let Some(name) = parse_inbound(text) else {
                                debug!("Ignoring malformed frame from client {}", client_id);
                                continue;
                            };
                            match router.resolve(&name) {
                                Some(Action::Release) => break,
                                Some(action) => {
                                    info!("[{}] requested {}", client_id, name);
                                    let handler = handler.clone();
                                    tokio::spawn(async move { handler.handle(action).await });
                                }
                                None => {
                                    debug!("Ignoring unknown event '{}' from client {}", name, client_id);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error for client {}: {}", client_id, e);
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        handler.release();
        let _ = ws_sender.close().await;
        info!("User disconnected: {}", client_id);
        Ok(())
    }
}
