//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but request-level
//! errors are `relay::RelayError` / `captcha::CaptchaError`.

use anyhow::Context;
use axum::{
    Router,
    http::{Method, header},
    middleware,
};
use captcha::{CaptchaConfig, CaptchaVerifier, captcha_router};
use platform::client::parse_trusted_proxies;
use platform::rate_limit::{RateLimitConfig, RateLimiter, SystemClock, spawn_idle_sweeper};
use relay::infra::telegram;
use relay::presentation::handlers::RelayAppState;
use relay::presentation::middleware::{RateLimitState, rate_limit};
use relay::{PgRelayRepository, RelayConfig, TelegramClient, control_router, public_router};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8030";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,relay=info,captcha=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Captcha configuration
    let captcha_config = match env::var("ALTCHA_HMAC_KEY") {
        Ok(key) if !key.is_empty() => CaptchaConfig::with_key(key),
        _ => {
            tracing::warn!("ALTCHA_HMAC_KEY not set, using a random key for this process");
            CaptchaConfig::with_random_key()
        }
    };
    let captcha_config = Arc::new(captcha_config);

    // Relay configuration
    let base_url = env::var("BASE_URL").context("BASE_URL must be set")?;
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

    // Both default to values only the bot token holder can compute
    let webhook_path = non_empty_env("TELEGRAM_WEBHOOK_PATH")
        .unwrap_or_else(|| telegram::webhook_path(&bot_token));
    let webhook_secret = non_empty_env("TELEGRAM_WEBHOOK_SECRET")
        .unwrap_or_else(|| telegram::webhook_secret(&bot_token));

    let relay_config = RelayConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        require_captcha: env_or("CAPTCHA_REQUIRED", false)?,
        max_concurrent_deliveries: env_or("MAX_CONCURRENT_DELIVERIES", 64)?,
        webhook_secret: Some(webhook_secret.clone()),
        ..RelayConfig::default()
    };

    // Telegram client
    let api_url = env::var("TELEGRAM_API_URL")
        .unwrap_or_else(|_| telegram::DEFAULT_API_URL.to_string());
    let telegram = TelegramClient::new(&api_url, &bot_token)
        .context("failed to build Telegram client")?;

    // Webhook registration failures should not prevent server startup
    match telegram.get_me().await {
        Ok(bot) => tracing::info!(bot_id = bot.id, bot_username = ?bot.username, "Bot authorized"),
        Err(e) => tracing::warn!(error = %e, "Bot identity check failed, continuing anyway"),
    }
    let webhook_url = format!("{}{}", relay_config.base_url, webhook_path);
    if let Err(e) = telegram.set_webhook(&webhook_url, Some(&webhook_secret)).await {
        tracing::warn!(error = %e, "Webhook registration failed, continuing anyway");
    }

    let state = RelayAppState::new(
        PgRelayRepository::new(pool),
        Arc::new(telegram),
        relay_config,
        CaptchaVerifier::new(captcha_config.clone()),
    );

    // Rate limiting
    let rate_limit_config = RateLimitConfig {
        max_tracked_clients: env_or("RATE_LIMIT_MAX_CLIENTS", 100_000)?,
        ..RateLimitConfig::new(
            env_or("RATE_LIMIT_MAX_REQUESTS", 30)?,
            env_or("RATE_LIMIT_WINDOW_SECS", 60)?,
        )
    };
    let sweep_every = rate_limit_config.window.max(Duration::from_secs(1));
    let limiter = Arc::new(RateLimiter::new(rate_limit_config));
    spawn_idle_sweeper(limiter.clone(), sweep_every);

    // X-Forwarded-For is ignored unless the peer is listed here
    let trusted_proxies =
        parse_trusted_proxies(&env::var("TRUSTED_PROXIES").unwrap_or_default())
            .context("invalid TRUSTED_PROXIES")?;
    if !trusted_proxies.is_empty() {
        tracing::info!(count = trusted_proxies.len(), "Trusting X-Forwarded-For from proxies");
    }

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]));

    // Build router
    let public = public_router(state.clone())
        .merge(captcha_router(captcha_config))
        .layer(middleware::from_fn_with_state(
            RateLimitState::new(limiter, trusted_proxies),
            rate_limit::<SystemClock>,
        ));

    let app = Router::new()
        .merge(control_router(state, &webhook_path))
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid BIND_ADDR: {bind_addr}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable, falling back to `default`
fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw}")),
        _ => Ok(default),
    }
}
