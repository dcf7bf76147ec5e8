//! API HTTP server lifecycle.

use std::future::Future;

use axum::Router;
use herald_common::tracing::info;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::api::{self, AppState};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind API server to {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("API server error: {0}")]
    Serve(std::io::Error),
}

/// The service's single HTTP listener.
pub struct ApiServer {
    listener: TcpListener,
    router: Router,
}

impl ApiServer {
    /// Bind the listener and assemble the router.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to `listen` fails.
    pub async fn bind(listen: &str, state: AppState) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(listen)
            .await
            .map_err(|source| ServerError::Bind {
                address: listen.to_string(),
                source,
            })?;

        info!(address = %listen, "API server bound");

        Ok(Self {
            listener,
            router: api::router(state),
        })
    }

    /// Serve until the shutdown future resolves, then stop accepting.
    ///
    /// In-flight dispatch ladders are not waited on here; the caller drains
    /// the dispatcher after this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a runtime error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        info!("API server stopped");
        Ok(())
    }
}
