//! HTTP surface of the relay: chat, server-side categorization and health.

mod cors;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::application::ChatRelayUseCase;
use crate::domain::DomainError;

use super::LlmCategorizer;

pub use cors::*;
pub use handlers::{CategorizeReply, ChatReply, NO_INPUT_REPLY, ONLY_POST};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct RelayState {
    pub chat: Arc<ChatRelayUseCase>,
    pub categorizer: Arc<LlmCategorizer>,
    pub cors: Arc<CorsPolicy>,
    pub model: String,
}

pub fn router(state: RelayState) -> Router {
    let cors = state.cors.clone();

    Router::new()
        .route("/", post(handlers::chat).fallback(handlers::only_post))
        .route("/chat", post(handlers::chat).fallback(handlers::only_post))
        .route(
            "/categorize",
            post(handlers::categorize).fallback(handlers::only_post),
        )
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(cors, cors_middleware))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: RelayState, addr: SocketAddr) -> Result<(), DomainError> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        "Chat relay listening on http://{} (allowed origins: {})",
        listener.local_addr()?,
        state.cors.allowed_origins().join(", ")
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Chat relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
}
