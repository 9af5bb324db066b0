//! JSON event ingress.
//!
//! The platform adapter posts each message or interaction and applies the
//! returned `Outcome`. Host failures come back as `{ "code", "msg" }`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use tiergate_core::{DenialCode, TierError};

use crate::app_state::AppState;
use crate::context::{InteractionEvent, MessageEvent};
use crate::dispatch::{handle_interaction, handle_message};

pub async fn message_event(State(app): State<AppState>, Json(event): Json<MessageEvent>) -> Response {
    match handle_message(&app, &event).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => error_response(&err),
    }
}

pub async fn interaction_event(
    State(app): State<AppState>,
    Json(event): Json<InteractionEvent>,
) -> Response {
    Json(handle_interaction(&app, &event).await).into_response()
}

fn status_for(code: DenialCode) -> StatusCode {
    match code {
        DenialCode::BadRequest | DenialCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        DenialCode::Forbidden => StatusCode::FORBIDDEN,
        DenialCode::NotFound => StatusCode::NOT_FOUND,
        DenialCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub fn error_response(err: &TierError) -> Response {
    let code = err.code();
    let body = json!({
        "code": code.as_str(),
        "msg": err.to_string(),
    });
    (status_for(code), Json(body)).into_response()
}
