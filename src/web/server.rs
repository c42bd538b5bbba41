//! Web server for chanboard.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::media::MediaStorage;
use crate::{ChanError, Database, Result};

use super::handlers::AppState;
use super::middleware::{JwtState, RateLimitState};
use super::router::{create_router, RouterOptions};

/// Web server for the API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    options: RouterOptions,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.web.host, config.web.port)
            .parse()
            .map_err(|e| ChanError::Config(format!("invalid web server address: {e}")))?;

        let storage = MediaStorage::new(&config.media.root, config.media.max_upload_bytes())?;
        let jwt_state = Arc::new(JwtState::new(
            &config.web.jwt_secret,
            config.web.jwt_expiry_secs,
        ));

        let app_state = AppState::new(db, storage, jwt_state, &config.media.url_prefix);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            rate_limit: Arc::new(RateLimitState::new(config.web.login_rate_limit)),
            options: RouterOptions {
                cors_origins: config.web.cors_origins.clone(),
                max_upload_bytes: config.media.max_upload_bytes(),
            },
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn bind(self) -> Result<(TcpListener, axum::Router)> {
        let router = create_router(self.app_state, self.rate_limit.clone(), &self.options)
            .layer(CompressionLayer::new());

        let listener = TcpListener::bind(self.addr).await?;
        self.rate_limit.start_cleanup_task();

        tracing::info!("Web server listening on http://{}", listener.local_addr()?);
        Ok((listener, router))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            let service = router.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, service).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
