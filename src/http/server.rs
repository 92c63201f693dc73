//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all tool handlers
//! - Wire up middleware (tracing, limits, request ID, rate limiting)
//! - Bind the server to a listener, with or without TLS
//! - Spawn the rate-limit sweeper alongside the server
//! - Graceful shutdown via the shared [`Shutdown`] handle

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::AppConfig;
use crate::handlers;
use crate::http::request::MakeRequestUuid;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::security::rate_limit::{rate_limit_middleware, FixedWindowLimiter, Sweeper};
use crate::services::media::MediaClient;
use crate::services::pagespeed::PagespeedClient;
use crate::services::retry::RetryPolicy;

/// One limiter per endpoint class, shared between the router and the
/// sweeper.
#[derive(Clone)]
pub struct Limiters {
    pub tools: Arc<FixedWindowLimiter>,
    pub forms: Arc<FixedWindowLimiter>,
    pub external: Arc<FixedWindowLimiter>,
}

impl Limiters {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            tools: Arc::new(FixedWindowLimiter::from_config("tools", &config.rate_limit.tools)),
            forms: Arc::new(FixedWindowLimiter::from_config("forms", &config.rate_limit.forms)),
            external: Arc::new(FixedWindowLimiter::from_config(
                "external",
                &config.rate_limit.external,
            )),
        }
    }

    fn all(&self) -> Vec<Arc<FixedWindowLimiter>> {
        vec![self.tools.clone(), self.forms.clone(), self.external.clone()]
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub limiters: Limiters,
    pub pagespeed: Arc<PagespeedClient>,
    pub media: Arc<MediaClient>,
}

/// HTTP server for the toolbox API.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
    limiters: Limiters,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let config = Arc::new(config);
        let limiters = Limiters::from_config(&config);

        let http = crate::services::build_http_client(&config.services);
        let retry = RetryPolicy::from_config(&config.services);
        let pagespeed = Arc::new(PagespeedClient::new(
            http.clone(),
            &config.services.pagespeed,
            retry,
        ));
        let media = Arc::new(MediaClient::new(http, &config.services.media));

        let state = AppState {
            config: config.clone(),
            limiters: limiters.clone(),
            pagespeed,
            media,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            limiters,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let rate_limiting = config.rate_limit.enabled;

        let tools = limited(
            Router::new()
                .route("/hash", post(handlers::hash::digest))
                .route("/base64", post(handlers::encode::base64))
                .route("/json", post(handlers::json::process)),
            &state.limiters.tools,
            rate_limiting,
        );

        let forms = limited(
            Router::new().route("/contact", post(handlers::contact::submit)),
            &state.limiters.forms,
            rate_limiting,
        );

        let external = limited(
            Router::new()
                .route("/pagespeed", post(handlers::pagespeed::analyze))
                .route("/image-optimize", post(handlers::image::optimize)),
            &state.limiters.external,
            rate_limiting,
        );

        Router::new()
            .route("/api/health", get(handlers::health::status))
            .nest("/api/tools", tools)
            .nest("/api/forms", forms)
            .nest("/api/external", external)
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Spawns the rate-limit sweeper and serves until the shutdown handle
    /// fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if self.config.rate_limit.enabled {
            let sweeper = Sweeper::new(
                self.limiters.all(),
                Duration::from_secs(self.config.rate_limit.sweep_interval_secs),
            );
            let sweeper_shutdown = shutdown.subscribe();
            tokio::spawn(async move {
                sweeper.run(sweeper_shutdown).await;
            });
        }

        match &self.config.listener.tls {
            Some(tls) => {
                let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    &tls.cert_path,
                    &tls.key_path,
                )
                .await?;
                tracing::info!(cert = %tls.cert_path, "TLS enabled");

                let handle = axum_server::Handle::new();
                let mut rx = shutdown.subscribe();
                let drain_handle = handle.clone();
                tokio::spawn(async move {
                    let _ = rx.recv().await;
                    drain_handle.graceful_shutdown(Some(Duration::from_secs(30)));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                let mut rx = shutdown.subscribe();
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(async move {
                        let _ = rx.recv().await;
                    })
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn limited(
    routes: Router<AppState>,
    limiter: &Arc<FixedWindowLimiter>,
    enabled: bool,
) -> Router<AppState> {
    if enabled {
        routes.route_layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_middleware,
        ))
    } else {
        routes
    }
}

/// Record request count and latency for every completed request.
///
/// Uses the matched route template, not the raw path, to keep metric
/// cardinality bounded.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &path, response.status().as_u16(), started);
    response
}
