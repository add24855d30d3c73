//! Interaction webhook.

use crate::ServerConfig;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use pronouns_core::{
    GENERIC_ERROR, HandlerRegistry, InteractionContext, PronounServices, ephemeral_reply,
    guild_only_reply, rate_limited_reply,
};
use pronouns_discord::{DiscordRest, Interaction, InteractionResponse, InteractionType, RestClient};
use pronouns_error::PronounsResult;
use pronouns_rate_limit::{InteractionRateLimiter, RateLimitDecision};
use pronouns_store::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Shared state of the webhook.
#[derive(Clone)]
pub struct AppState {
    registry: HandlerRegistry,
    limiter: InteractionRateLimiter,
    application_id: Arc<str>,
}

impl AppState {
    /// Create the state from its parts.
    pub fn new(
        registry: HandlerRegistry,
        limiter: InteractionRateLimiter,
        application_id: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            registry,
            limiter,
            application_id: application_id.into(),
        }
    }

    /// Wire the bot over an existing Discord client and store.
    pub fn with_backends(
        discord: Arc<dyn DiscordRest>,
        store: Arc<dyn KeyValueStore>,
        config: &ServerConfig,
    ) -> PronounsResult<Self> {
        let application_id = config.require_application_id()?;
        let services = PronounServices::new(discord, store.clone());
        let limiter = InteractionRateLimiter::new(store, config.rate_limit().clone());
        Ok(Self::new(services.registry(), limiter, application_id))
    }

    /// Wire the bot against Discord, opening the configured store.
    pub async fn from_config(config: &ServerConfig) -> PronounsResult<Self> {
        let token = config.require_token()?;
        let store: Arc<dyn KeyValueStore> = match config.store_path() {
            Some(path) => Arc::new(MemoryStore::open(path).await?),
            None => {
                warn!("No store path configured, state is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        let discord = Arc::new(RestClient::new(config.discord_api_base(), token));
        Self::with_backends(discord, store, config)
    }
}

/// Routes of the webhook.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(heartbeat))
        .route("/interaction", post(interaction))
        .fallback(not_found)
        .with_state(state)
}

/// Listen on `bind` until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "Listening for interactions");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutting down");
}

async fn heartbeat() -> &'static str {
    "<3"
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn reply(response: InteractionResponse) -> Response {
    (StatusCode::OK, Json(response)).into_response()
}

async fn interaction(State(state): State<AppState>, Json(interaction): Json<Interaction>) -> Response {
    let kind = interaction.interaction_type();
    debug!(kind = interaction.kind, guild_id = ?interaction.guild_id, "Received interaction");
    if kind == InteractionType::Ping {
        return reply(InteractionResponse::pong());
    }

    let Some(ctx) = InteractionContext::from_interaction(interaction) else {
        debug!("Interaction outside a guild");
        return reply(guild_only_reply());
    };

    if ctx.application_id() != &*state.application_id {
        warn!(application_id = %ctx.application_id(), "Interaction for another application");
        return StatusCode::BAD_REQUEST.into_response();
    }

    match state.limiter.check(ctx.user_id()).await {
        Ok(RateLimitDecision::Allowed { .. }) => {}
        Ok(RateLimitDecision::Limited { retry_after_secs }) => {
            debug!(user_id = %ctx.user_id(), retry_after_secs, "Rate limited");
            return reply(rate_limited_reply(retry_after_secs));
        }
        Err(e) => {
            error!(error = %e, "Rate limit check failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    match kind {
        InteractionType::ApplicationCommand => dispatch_command(&state, ctx).await,
        InteractionType::MessageComponent => dispatch_component(&state, ctx).await,
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn dispatch_command(state: &AppState, ctx: InteractionContext) -> Response {
    let name = ctx.interaction().command_name().unwrap_or_default().to_string();
    let Some(handler) = state.registry.command(&name) else {
        warn!(command = %name, "Unknown command");
        return StatusCode::BAD_REQUEST.into_response();
    };

    match handler.handle(ctx).await {
        Ok(response) => reply(response),
        Err(e) => {
            error!(command = %name, error = %e, "Command failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn dispatch_component(state: &AppState, ctx: InteractionContext) -> Response {
    let custom_id = ctx.custom_id().unwrap_or_default().to_string();
    let Some(handler) = state.registry.component(&custom_id) else {
        warn!(custom_id = %custom_id, "Unknown component");
        return StatusCode::BAD_REQUEST.into_response();
    };

    match handler.handle(ctx).await {
        Ok(response) => reply(response),
        Err(e) => {
            error!(custom_id = %custom_id, error = %e, "Component failed");
            reply(ephemeral_reply(GENERIC_ERROR))
        }
    }
}
