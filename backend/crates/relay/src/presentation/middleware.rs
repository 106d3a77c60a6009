//! Rate Limit Middleware

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::extract_client_ip;
use platform::rate_limit::{Clock, RateLimiter, SystemClock};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Bucket key for requests whose source address is unknown
const UNKNOWN_CLIENT: &str = "unknown";

/// State for [`rate_limit`]
pub struct RateLimitState<C: Clock = SystemClock> {
    pub limiter: Arc<RateLimiter<C>>,
    /// Peers whose `X-Forwarded-For` is believed
    pub trusted_proxies: Arc<[IpAddr]>,
}

impl<C: Clock> RateLimitState<C> {
    pub fn new(limiter: Arc<RateLimiter<C>>, trusted_proxies: Vec<IpAddr>) -> Self {
        Self {
            limiter,
            trusted_proxies: trusted_proxies.into(),
        }
    }
}

impl<C: Clock> Clone for RateLimitState<C> {
    fn clone(&self) -> Self {
        Self {
            limiter: self.limiter.clone(),
            trusted_proxies: self.trusted_proxies.clone(),
        }
    }
}

/// Admit or reject a request by client IP
///
/// Rejected requests get a bare 429 and never reach the handler.
pub async fn rate_limit<C>(
    State(state): State<RateLimitState<C>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    C: Clock + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let key = extract_client_ip(req.headers(), direct_ip, &state.trusted_proxies)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let result = state.limiter.check(&key);
    if !result.allowed {
        tracing::warn!(
            client_ip = %key,
            retry_after_secs = result.retry_after.as_secs_f64(),
            "Rate limit exceeded"
        );
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    next.run(req).await
}
