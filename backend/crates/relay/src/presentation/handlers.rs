//! HTTP Handlers

use crate::application::config::RelayConfig;
use crate::application::control::ControlChannelUseCase;
use crate::application::dispatch::Dispatcher;
use crate::application::submit_form::{SubmitFormInput, SubmitFormUseCase};
use crate::domain::repository::RelayRepository;
use crate::domain::transport::MessageTransport;
use crate::error::{MALFORMED_MESSAGE, RelayError};
use crate::infra::telegram::SECRET_TOKEN_HEADER;
use crate::presentation::dto::{HealthResponse, TelegramUpdate};
use crate::presentation::page::{SUCCESS_MESSAGE, render_page};
use axum::Json;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use captcha::CaptchaVerifier;
use platform::client::extract_origin_host;
use platform::crypto::constant_time_eq;
use std::sync::Arc;

/// Shared state for relay handlers
pub struct RelayAppState<R, T>
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub transport: Arc<T>,
    pub config: Arc<RelayConfig>,
    pub verifier: CaptchaVerifier,
    pub dispatcher: Dispatcher<R, T>,
}

impl<R, T> RelayAppState<R, T>
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    pub fn new(repo: R, transport: Arc<T>, config: RelayConfig, verifier: CaptchaVerifier) -> Self {
        let repo = Arc::new(repo);
        let config = Arc::new(config);
        let dispatcher = Dispatcher::new(repo.clone(), transport.clone(), config.clone());
        Self {
            repo,
            transport,
            config,
            verifier,
            dispatcher,
        }
    }
}

impl<R, T> Clone for RelayAppState<R, T>
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            transport: self.transport.clone(),
            config: self.config.clone(),
            verifier: self.verifier.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

/// POST /{token}
///
/// Always answers with a page or a redirect; delivery happens afterwards.
pub async fn submit_form<R, T>(
    State(state): State<RelayAppState<R, T>>,
    Path(token): Path<String>,
    headers: HeaderMap,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    let fields = match form {
        Ok(Form(fields)) => Some(fields),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Form body rejected");
            None
        }
    };

    let use_case = SubmitFormUseCase::new(
        state.repo.clone(),
        state.dispatcher.clone(),
        state.verifier.clone(),
        state.config.clone(),
    );

    let input = SubmitFormInput {
        token,
        origin_host: extract_origin_host(&headers),
        fields,
    };

    match use_case.execute(input).await {
        Ok(output) => match output.redirect {
            Some(target) => redirect_to(&target, &state.config.base_url),
            None => render_page(StatusCode::OK, SUCCESS_MESSAGE, &state.config.base_url),
        },
        Err(e) => error_page(e, &state.config.base_url),
    }
}

/// POST {webhook path}
///
/// Telegram retries non-2xx answers, so only callers without the secret
/// token and undecodable payloads get one.
pub async fn telegram_webhook<R, T>(
    State(state): State<RelayAppState<R, T>>,
    headers: HeaderMap,
    update: Result<Json<TelegramUpdate>, JsonRejection>,
) -> Response
where
    R: RelayRepository,
    T: MessageTransport + Send + Sync + 'static,
{
    if let Some(expected) = state.config.webhook_secret.as_deref() {
        let sent = headers
            .get(SECRET_TOKEN_HEADER)
            .map(HeaderValue::as_bytes)
            .unwrap_or_default();
        if !constant_time_eq(sent, expected.as_bytes()) {
            tracing::warn!("Webhook call without a valid secret token");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let Json(update) = match update {
        Ok(update) => update,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Failed to decode Telegram update");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Invalid request payload" })),
            )
                .into_response();
        }
    };

    let update_id = update.update_id;
    let Some(event) = update.into_event() else {
        tracing::debug!(update_id, "Ignoring Telegram update without a command or callback");
        return StatusCode::OK.into_response();
    };

    let use_case = ControlChannelUseCase::new(state.repo.clone(), state.transport.clone());
    if let Err(e) = use_case.handle(event).await {
        e.log();
    }

    StatusCode::OK.into_response()
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

fn redirect_to(target: &str, base_url: &str) -> Response {
    match HeaderValue::from_str(target) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            tracing::debug!("Redirect target is not a valid header value");
            render_page(StatusCode::BAD_REQUEST, MALFORMED_MESSAGE, base_url)
        }
    }
}

fn error_page(err: RelayError, base_url: &str) -> Response {
    err.log();
    render_page(err.status_code(), err.public_message(), base_url)
}
