//! Routes for live operator sessions.
//!
//! A session wraps the navigation state machine and the renderer: every
//! response carries the current step already rendered with the session's
//! placeholder values, plus the annotations the operator should see.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use roteiro_navigation::{NavigationSession, TabulationCue};
use roteiro_render::{DEFAULT_BASE_PX, Placeholders, RenderNode, render};
use roteiro_script::{Button, ButtonId, ProductId, StepFormatting, Tabulation};

use crate::error::ApiError;
use crate::sessions::OperatorSession;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// The product whose script to run.
    pub product_id: String,
    /// Operator name substituted into the script text.
    #[serde(default)]
    pub operator_name: String,
    /// Customer first name substituted into the script text.
    #[serde(default)]
    pub customer_first_name: String,
    /// Accessibility base size in pixels.
    #[serde(default)]
    pub base_px: Option<f32>,
}

/// Request body for POST /{id}/advance.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    /// The button the operator clicked.
    pub button_id: String,
}

/// Where the session is, as seen by the console.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionView {
    /// At a step; `step` carries the rendered view.
    Step,
    /// Past a call-closing button.
    Terminal,
}

/// Alert as surfaced to the operator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    /// Title, defaulted for legacy alerts saved without one.
    pub title: String,
    /// Alert body.
    pub message: String,
}

/// The current step, rendered.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    /// Step id.
    pub id: String,
    /// Step title.
    pub title: String,
    /// Rendered content nodes.
    pub nodes: Vec<RenderNode>,
    /// The buttons the operator can click, in order.
    pub buttons: Vec<Button>,
    /// Step-level formatting, applied by the console when the content has
    /// no segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<StepFormatting>,
    /// Active alert, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertView>,
    /// Recommended tabulations.
    pub tabulations: Vec<Tabulation>,
    /// Whether the tabulation affordance should pulse right now.
    pub tabulation_pulse: bool,
}

/// Response body for every session route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Session handle.
    pub session_id: Uuid,
    /// Current position.
    pub position: PositionView,
    /// The rendered step; absent at terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepView>,
    /// Whether going back would move.
    pub can_go_back: bool,
}

fn build_view(
    session_id: Uuid,
    session: &OperatorSession,
    state: &AppState,
) -> Result<SessionView, ApiError> {
    let step = session.nav.resolve_current(state.repository.as_ref())?;

    let view = match step {
        None => SessionView {
            session_id,
            position: PositionView::Terminal,
            step: None,
            can_go_back: session.nav.can_go_back(),
        },
        Some(step) => {
            let nodes = render(
                &step.content,
                &step.segments,
                &session.placeholders,
                session.base_px,
            );
            let alert = step
                .alert
                .as_ref()
                .filter(|alert| alert.is_active())
                .map(|alert| AlertView {
                    title: alert.display_title().to_owned(),
                    message: alert.message.clone(),
                });
            let tabulation_pulse = !step.tabulations.is_empty()
                && session.cue.is_pulsing(state.clock.now());

            SessionView {
                session_id,
                position: PositionView::Step,
                step: Some(StepView {
                    id: step.id.to_string(),
                    title: step.title,
                    nodes,
                    buttons: step.buttons,
                    formatting: step.formatting,
                    alert,
                    tabulations: step.tabulations,
                    tabulation_pulse,
                }),
                can_go_back: session.nav.can_go_back(),
            }
        }
    };
    Ok(view)
}

/// POST / — open a product and start at its entry step.
#[instrument(skip(state, request), fields(product_id = %request.product_id))]
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let product_id = ProductId::from(request.product_id.as_str());
    let nav = NavigationSession::start(state.repository.as_ref(), &product_id)?;

    let mut cue = TabulationCue::new();
    cue.arrive(state.clock.now());

    let session = OperatorSession {
        nav,
        cue,
        placeholders: Placeholders {
            operator_name: request.operator_name,
            customer_first_name: request.customer_first_name,
        },
        base_px: request.base_px.unwrap_or(DEFAULT_BASE_PX),
    };

    let session_id = state.sessions.insert(session);
    info!(%session_id, "operator session started");

    let view = state
        .sessions
        .with(session_id, |session| build_view(session_id, session, &state))
        .ok_or(ApiError::SessionNotFound(session_id))??;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /{id}
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with(id, |session| build_view(id, session, &state))
        .ok_or(ApiError::SessionNotFound(id))??;
    Ok(Json(view))
}

/// POST /{id}/advance — apply the clicked button.
#[instrument(skip(state), fields(session_id = %id, button_id = %request.button_id))]
async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let button_id = ButtonId::from(request.button_id.as_str());
    let view = state
        .sessions
        .with(id, |session| {
            session.nav.advance(state.repository.as_ref(), &button_id)?;
            if session.nav.current_step_id().is_some() {
                session.cue.arrive(state.clock.now());
            }
            build_view(id, session, &state)
        })
        .ok_or(ApiError::SessionNotFound(id))??;
    Ok(Json(view))
}

/// POST /{id}/back — pop the history. A no-op on an empty history; the
/// console disables the affordance via `canGoBack`.
#[instrument(skip(state), fields(session_id = %id))]
async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with(id, |session| {
            if session.nav.go_back().is_some() {
                session.cue.arrive(state.clock.now());
            }
            build_view(id, session, &state)
        })
        .ok_or(ApiError::SessionNotFound(id))??;
    Ok(Json(view))
}

/// DELETE /{id} — the operator returned to the product list.
#[instrument(skip(state), fields(session_id = %id))]
async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id) {
        info!("operator session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// Returns the router for operator sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route(
            "/{id}",
            axum::routing::get(get_session).delete(end_session),
        )
        .route("/{id}/advance", post(advance))
        .route("/{id}/back", post(go_back))
}
