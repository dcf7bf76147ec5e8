//! HTTP API surface: email submission and gateway settings.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use herald_common::{Credentials, FromAddress, Job, template, tracing::info};
use herald_dispatch::{Dispatcher, SettingsStore};
use serde::{Deserialize, Serialize};
use tower_http::timeout::TimeoutLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub settings: Arc<SettingsStore>,
}

/// Build the API router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/email", post(send_email))
        .route("/api/v1/settings", get(get_settings).patch(patch_settings))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub jobs: Vec<Job>,
    pub template: String,
    pub subject: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn unprocessable(message: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Accept a send request and hand it to the dispatcher.
///
/// Validation happens here, once, so the detached dispatch ladder only ever
/// sees well-formed work. The 202 means "accepted for processing"; outcomes
/// flow to the origin system, not back on this response.
async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Response {
    if request.jobs.is_empty() {
        return unprocessable("jobs must not be empty");
    }

    if let Some(job) = request
        .jobs
        .iter()
        .find(|job| !plausible_email(&job.email))
    {
        return unprocessable(format!(
            "job {} has an implausible email address",
            job.id
        ));
    }

    if let Err(err) = template::validate(&request.template, &request.jobs) {
        return unprocessable(format!("invalid template: {err}"));
    }

    info!(jobs = request.jobs.len(), "accepted send request");
    state
        .dispatcher
        .dispatch(request.jobs, request.template, request.subject)
        .await;

    StatusCode::ACCEPTED.into_response()
}

/// Cheap plausibility check, not RFC validation. The gateway is the
/// authority on deliverability; this only rejects obvious garbage early.
fn plausible_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.chars().any(char::is_whitespace)
}

/// Credentials are write-only: the view exposes everything else.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsView {
    email_from: Option<FromAddress>,
    headers: BTreeMap<String, String>,
}

async fn get_settings(State(state): State<AppState>) -> Response {
    let view = SettingsView {
        email_from: state.settings.from_address().await,
        headers: state.settings.headers().await,
    };

    Json(view).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPatch {
    auth: Option<Credentials>,
    email_from: Option<FromAddress>,
    headers: Option<BTreeMap<String, String>>,
}

impl SettingsPatch {
    const fn is_empty(&self) -> bool {
        self.auth.is_none() && self.email_from.is_none() && self.headers.is_none()
    }
}

/// Apply a partial settings update. An empty patch is a no-op answered with
/// 204; otherwise the updated view comes back.
async fn patch_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Response {
    if patch.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    if let Some(credentials) = patch.auth {
        state.settings.save_credentials(credentials).await;
    }
    if let Some(from) = patch.email_from {
        state.settings.save_from(from).await;
    }
    if let Some(headers) = patch.headers {
        state.settings.save_headers(headers).await;
    }

    get_settings(State(state)).await
}
